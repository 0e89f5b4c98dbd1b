use crate::crud_api;
use crate::error::ApiResult;
use crate::rest_api::respond;
use crate::validate::Path;
use axum::response::IntoResponse;
use http::StatusCode;
use kisahloka_dal::user::{CreateUser, UpdateUser, UserRepository};

crud_api!(User);

pub async fn get_by_uid(
    Path(uid): Path<String>,
    repository: EntityRepository,
) -> ApiResult<impl IntoResponse> {
    let user = repository.get_by_uid(&uid).await?;
    Ok(respond(StatusCode::OK, user))
}

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
        .route("/uid/{uid}", get(get_by_uid))
}
