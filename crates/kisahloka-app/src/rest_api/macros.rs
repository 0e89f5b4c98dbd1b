#[macro_export]
macro_rules! api_list {
    () => {
        pub async fn list(
            repository: EntityRepository,
            State(state): State<AppState>,
            Garde(Query(paging)): Garde<Query<Paging>>,
        ) -> ApiResult<impl IntoResponse> {
            let request = paging.into_request(state.config().default_page_size);
            let batch = repository.list(&request).await?;
            Ok(respond(StatusCode::OK, batch))
        }
    };
}

#[macro_export]
macro_rules! api_write {
    ($entity:ty) => {
        type CreateEntity = paste::paste! {[<Create $entity>]};
        type UpdateEntity = paste::paste! {[<Update $entity>]};

        pub async fn create(
            repository: EntityRepository,
            Garde(Json(payload)): Garde<Json<CreateEntity>>,
        ) -> ApiResult<impl IntoResponse> {
            let created = repository.create(payload).await?;
            Ok(respond(StatusCode::CREATED, created))
        }

        pub async fn update(
            Path(id): Path<i64>,
            repository: EntityRepository,
            Garde(Json(payload)): Garde<Json<UpdateEntity>>,
        ) -> ApiResult<impl IntoResponse> {
            let updated = repository.update(id, payload).await?;
            Ok(respond(StatusCode::OK, updated))
        }

        pub async fn delete(
            Path(id): Path<i64>,
            repository: EntityRepository,
        ) -> ApiResult<impl IntoResponse> {
            let deleted = repository.delete(id).await?;
            Ok(respond(StatusCode::OK, deleted))
        }
    };
}

/// List, detail, create, update and delete handlers in module `crud_api`.
/// With `NO_GET` the detail handler is left to the calling module.
#[macro_export]
macro_rules! crud_api {
    ($entity:ty) => {
        type EntityRepository = paste::paste! {[<$entity Repository>]};
        crate::repository_from_request!(EntityRepository);
        pub mod crud_api {
            use super::*;
            use crate::error::ApiResult;
            use crate::rest_api::{respond, Paging};
            use crate::state::AppState;
            use crate::validate::{Garde, Json, Path, Query};
            use axum::{extract::State, response::IntoResponse};
            use http::StatusCode;

            crate::api_list!();
            crate::api_write!($entity);

            pub async fn get(
                Path(id): Path<i64>,
                repository: EntityRepository,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.get(id).await?;
                Ok(respond(StatusCode::OK, record))
            }
        }
    };

    ($entity:ty, NO_GET) => {
        type EntityRepository = paste::paste! {[<$entity Repository>]};
        crate::repository_from_request!(EntityRepository);
        pub mod crud_api {
            use super::*;
            use crate::error::ApiResult;
            use crate::rest_api::{respond, Paging};
            use crate::state::AppState;
            use crate::validate::{Garde, Json, Path, Query};
            use axum::{extract::State, response::IntoResponse};
            use http::StatusCode;

            crate::api_list!();
            crate::api_write!($entity);
        }
    };
}

#[macro_export]
macro_rules! value_router {
    () => {
        pub fn router() -> axum::Router<crate::state::AppState> {
            use axum::routing::{get, post};
            axum::Router::new()
                .route("/", post(crud_api::create).get(crud_api::list))
                .route(
                    "/{id}",
                    get(crud_api::get)
                        .put(crud_api::update)
                        .delete(crud_api::delete),
                )
        }
    };
}
