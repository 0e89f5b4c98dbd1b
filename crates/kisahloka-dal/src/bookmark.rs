use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::OffsetDateTime;

use crate::{
    Batch, ChosenDB, Created, Deleted, Error, PageRequest, Updated,
    error::Result,
    paging::{Filter, Listing},
    update::{Changes, PartialUpdate, Table, apply_delete, apply_insert, apply_update},
};

const TABLE: Table = Table {
    name: "bookmark",
    id_column: "bookmark_id",
};

const SELECT: &str =
    "SELECT b.bookmark_id, b.user_id, b.uid, b.story_id, b.created_at, b.updated_at FROM bookmark b";

const LISTING: Listing = Listing {
    count: "SELECT count(*) FROM bookmark b",
    select: SELECT,
    group_by: None,
};

const USER_LISTING: Listing = Listing {
    count: "SELECT count(*) FROM bookmark b JOIN story s ON b.story_id = s.story_id",
    select: r#"
SELECT b.bookmark_id, b.user_id, b.uid, b.story_id, b.created_at, b.updated_at,
s.title, o.origin_name, s.thumbnail_image, s.total_content
FROM bookmark b
JOIN story s ON b.story_id = s.story_id
LEFT JOIN origin o ON s.origin_id = o.origin_id"#,
    group_by: None,
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    pub bookmark_id: i64,
    pub user_id: i64,
    pub uid: String,
    pub story_id: i64,
    #[serde(with = "crate::zoned")]
    pub created_at: OffsetDateTime,
    #[serde(with = "crate::zoned")]
    pub updated_at: OffsetDateTime,
}

/// Bookmark of one user together with the bookmarked story summary
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserBookmark {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub bookmark: Bookmark,
    pub title: String,
    pub origin_name: Option<String>,
    pub thumbnail_image: String,
    pub total_content: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookmark {
    #[garde(range(min = 1))]
    pub user_id: i64,
    #[garde(length(min = 1, max = 255))]
    pub uid: String,
    #[garde(range(min = 1))]
    pub story_id: i64,
}

impl PartialUpdate for CreateBookmark {
    fn into_changes(self) -> Changes {
        Changes::new()
            .set("user_id", self.user_id)
            .set("uid", self.uid)
            .set("story_id", self.story_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBookmark {
    #[garde(range(min = 1))]
    pub user_id: Option<i64>,
    #[garde(length(min = 1, max = 255))]
    pub uid: Option<String>,
    #[garde(range(min = 1))]
    pub story_id: Option<i64>,
}

impl PartialUpdate for UpdateBookmark {
    fn into_changes(self) -> Changes {
        Changes::new()
            .set_some("user_id", self.user_id)
            .set_some("uid", self.uid)
            .set_some("story_id", self.story_id)
    }
}

/// Who is asking for a story's bookmark state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkOwner {
    UserId(i64),
    Uid(String),
}

impl BookmarkOwner {
    /// Numeric user id wins over uid, empty uid is ignored
    pub fn from_parts(user_id: Option<i64>, uid: Option<String>) -> Option<Self> {
        match (user_id, uid) {
            (Some(user_id), _) => Some(BookmarkOwner::UserId(user_id)),
            (None, Some(uid)) if !uid.is_empty() => Some(BookmarkOwner::Uid(uid)),
            _ => None,
        }
    }
}

pub(crate) async fn find_for_story<'e, E>(
    executor: E,
    owner: &BookmarkOwner,
    story_id: i64,
) -> Result<Option<i64>>
where
    E: sqlx::Executor<'e, Database = ChosenDB>,
{
    let query = match owner {
        BookmarkOwner::UserId(user_id) => sqlx::query_scalar::<_, i64>(
            "SELECT bookmark_id FROM bookmark WHERE user_id = ? AND story_id = ? LIMIT 1",
        )
        .bind(*user_id),
        BookmarkOwner::Uid(uid) => sqlx::query_scalar::<_, i64>(
            "SELECT bookmark_id FROM bookmark WHERE uid = ? AND story_id = ? LIMIT 1",
        )
        .bind(uid.clone()),
    };
    let id = query.bind(story_id).fetch_optional(executor).await?;
    Ok(id)
}

pub type BookmarkRepository = BookmarkRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookmarkRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookmarkRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Keyword is matched against the user id rendered as text
    pub async fn list(&self, request: &PageRequest) -> Result<Batch<Bookmark>> {
        let filter = Filter::default().keyword(&["CAST(b.user_id AS TEXT)"], request.keyword());
        LISTING.fetch(&self.executor, request, &filter).await
    }

    pub async fn list_by_user(
        &self,
        user_id: i64,
        request: &PageRequest,
    ) -> Result<Batch<UserBookmark>> {
        let filter = Filter::default()
            .equals("b.user_id", user_id)
            .keyword(&["s.title"], request.keyword());
        USER_LISTING.fetch(&self.executor, request, &filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Bookmark> {
        let sql = format!("{SELECT} WHERE b.bookmark_id = ?");
        sqlx::query_as::<_, Bookmark>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Bookmark".to_string()))
    }

    pub async fn create(&self, payload: CreateBookmark) -> Result<Created> {
        apply_insert(&self.executor, TABLE, payload.into_changes()).await
    }

    pub async fn update(&self, id: i64, payload: UpdateBookmark) -> Result<Updated> {
        apply_update(&self.executor, TABLE, id, payload.into_changes()).await
    }

    pub async fn delete(&self, id: i64) -> Result<Deleted> {
        apply_delete(&self.executor, TABLE, id).await
    }
}
