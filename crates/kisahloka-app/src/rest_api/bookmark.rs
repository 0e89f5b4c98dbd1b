use crate::crud_api;
use crate::error::ApiResult;
use crate::rest_api::{respond, Paging};
use crate::state::AppState;
use crate::validate::{Garde, Path, Query};
use axum::{extract::State, response::IntoResponse};
use http::StatusCode;
use kisahloka_dal::bookmark::{BookmarkRepository, CreateBookmark, UpdateBookmark};

crud_api!(Bookmark);

pub async fn list_by_user(
    Path(user_id): Path<i64>,
    repository: EntityRepository,
    State(state): State<AppState>,
    Garde(Query(paging)): Garde<Query<Paging>>,
) -> ApiResult<impl IntoResponse> {
    let request = paging.into_request(state.config().default_page_size);
    let batch = repository.list_by_user(user_id, &request).await?;
    Ok(respond(StatusCode::OK, batch))
}

pub fn router() -> axum::Router<AppState> {
    use axum::routing::{get, post};
    axum::Router::new()
        .route("/", post(crud_api::create).get(crud_api::list))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
        .route("/user/{user_id}", get(list_by_user))
}
