use crate::crud_api;
use crate::error::ApiResult;
use crate::rest_api::{paging::lenient_number, respond, Paging};
use crate::state::AppState;
use crate::validate::{Garde, Path, Query};
use axum::{extract::State, response::IntoResponse};
use http::StatusCode;
use kisahloka_dal::{
    bookmark::BookmarkOwner,
    story::{CreateStory, StoryRepository, UpdateStory},
};
use serde::Deserialize;

pub const DEFAULT_RECOMMENDATIONS: i64 = 5;

crud_api!(Story, NO_GET);

#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    user_id: Option<String>,
    uid: Option<String>,
}

impl OwnerQuery {
    fn owner(self) -> Option<BookmarkOwner> {
        BookmarkOwner::from_parts(lenient_number(self.user_id.as_deref()), self.uid)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    type_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    limit: Option<String>,
}

pub async fn detail(
    Path(id): Path<i64>,
    repository: EntityRepository,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<impl IntoResponse> {
    let owner = query.owner();
    let story = repository.detail(id, owner.as_ref()).await?;
    Ok(respond(StatusCode::OK, story))
}

pub async fn contents(
    Path(id): Path<i64>,
    repository: EntityRepository,
) -> ApiResult<impl IntoResponse> {
    let contents = repository.contents(id).await?;
    Ok(respond(StatusCode::OK, contents))
}

pub async fn previews(
    repository: EntityRepository,
    State(state): State<AppState>,
    Garde(Query(paging)): Garde<Query<Paging>>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<impl IntoResponse> {
    let request = paging.into_request(state.config().default_page_size);
    let type_id = lenient_number(query.type_id.as_deref()).filter(|id| *id > 0);
    let batch = repository.list_previews(&request, type_id).await?;
    Ok(respond(StatusCode::OK, batch))
}

pub async fn recommend(
    Path(exclude_id): Path<i64>,
    repository: EntityRepository,
    Query(query): Query<RecommendQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = lenient_number(query.limit.as_deref())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_RECOMMENDATIONS);
    let stories = repository.recommend(exclude_id, limit).await?;
    Ok(respond(StatusCode::OK, stories))
}

pub fn router() -> axum::Router<AppState> {
    use axum::routing::{get, post};
    axum::Router::new()
        .route("/", post(crud_api::create).get(crud_api::list))
        .route("/preview", get(previews))
        .route("/recommendation/random/{exclude_id}", get(recommend))
        .route(
            "/{id}",
            get(detail).put(crud_api::update).delete(crud_api::delete),
        )
        .route("/{id}/contents", get(contents))
}
