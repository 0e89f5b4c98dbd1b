use crate::error::ApiResult;
use crate::repository_from_request;
use crate::rest_api::respond;
use axum::response::IntoResponse;
use http::StatusCode;
use kisahloka_dal::home::HomeRepository;

repository_from_request!(HomeRepository);

pub async fn get(repository: HomeRepository) -> ApiResult<impl IntoResponse> {
    let home = repository.get().await?;
    Ok(respond(StatusCode::OK, home))
}
