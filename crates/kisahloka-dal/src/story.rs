use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, Row};
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::{
    Batch, ChosenDB, ChosenRow, Created, Deleted, Error, PageRequest, Updated,
    bookmark::{self, BookmarkOwner},
    error::Result,
    paging::{Filter, Listing},
    update::{Changes, PartialUpdate, Table, apply_delete, apply_insert, apply_update},
};

const TABLE: Table = Table {
    name: "story",
    id_column: "story_id",
};

/// Separator of aggregated genre values, cannot appear in a genre name typed by hand
const AGGREGATE_SEPARATOR: char = '\u{1f}';

const STORY_SELECT: &str = r#"
SELECT s.story_id, s.type_id, t.type_name, s.origin_id, o.origin_name, s.title, s.total_content,
s.released_date, s.synopsis, s.thumbnail_image, s.read_count, s.is_highlighted, s.is_favorited,
s.created_at, s.updated_at,
GROUP_CONCAT(g.genre_id, char(31)) AS genre_ids, GROUP_CONCAT(g.genre_name, char(31)) AS genre_names
FROM story s
LEFT JOIN type t ON s.type_id = t.type_id
LEFT JOIN origin o ON s.origin_id = o.origin_id
LEFT JOIN story_genre sg ON s.story_id = sg.story_id
LEFT JOIN genre g ON sg.genre_id = g.genre_id"#;

pub(crate) const PREVIEW_SELECT: &str = r#"
SELECT s.story_id, s.type_id, t.type_name, s.origin_id, o.origin_name, s.title, s.total_content,
s.released_date, s.thumbnail_image, s.read_count, s.is_highlighted, s.is_favorited,
GROUP_CONCAT(g.genre_name, char(31)) AS genre_names
FROM story s
LEFT JOIN type t ON s.type_id = t.type_id
LEFT JOIN origin o ON s.origin_id = o.origin_id
LEFT JOIN story_genre sg ON s.story_id = sg.story_id
LEFT JOIN genre g ON sg.genre_id = g.genre_id"#;

const COUNT: &str = "SELECT count(*) FROM story s";

const LISTING: Listing = Listing {
    count: COUNT,
    select: STORY_SELECT,
    group_by: Some("s.story_id"),
};

const PREVIEW_LISTING: Listing = Listing {
    count: COUNT,
    select: PREVIEW_SELECT,
    group_by: Some("s.story_id"),
};

const KEYWORD_COLUMNS: &[&str] = &["s.title"];

const CONTENTS_SELECT: &str = r#"SELECT "order", image, content_indo, content_eng
FROM story_content WHERE story_id = ? ORDER BY "order""#;

pub(crate) fn split_names(aggregate: Option<String>) -> Vec<String> {
    match aggregate {
        Some(value) if !value.is_empty() => value
            .split(AGGREGATE_SEPARATOR)
            .map(|s| s.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn split_ids(aggregate: Option<String>) -> std::result::Result<Vec<i64>, sqlx::Error> {
    split_names(aggregate)
        .iter()
        .map(|id| {
            id.parse::<i64>().map_err(|e| sqlx::Error::ColumnDecode {
                index: "genre_ids".to_string(),
                source: Box::new(e),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Validate)]
pub struct StoryContent {
    #[garde(range(min = 0))]
    pub order: i64,
    #[garde(length(max = 1023))]
    pub image: String,
    #[garde(skip)]
    pub content_indo: String,
    #[garde(skip)]
    pub content_eng: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub story_id: i64,
    pub type_id: i64,
    pub type_name: String,
    pub origin_id: i64,
    pub origin_name: String,
    pub title: String,
    pub total_content: i64,
    pub released_date: Date,
    pub synopsis: String,
    pub thumbnail_image: String,
    pub read_count: i64,
    pub is_highlighted: bool,
    pub is_favorited: bool,
    #[serde(rename = "genre_id")]
    pub genre_ids: Vec<i64>,
    #[serde(rename = "genre_name")]
    pub genre_names: Vec<String>,
    #[serde(rename = "story_content", skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<StoryContent>>,
    #[serde(with = "crate::zoned")]
    pub created_at: OffsetDateTime,
    #[serde(with = "crate::zoned")]
    pub updated_at: OffsetDateTime,
}

impl sqlx::FromRow<'_, ChosenRow> for Story {
    fn from_row(row: &ChosenRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Story {
            story_id: row.try_get("story_id")?,
            type_id: row.try_get("type_id")?,
            type_name: row
                .try_get::<Option<String>, _>("type_name")?
                .unwrap_or_default(),
            origin_id: row.try_get("origin_id")?,
            origin_name: row
                .try_get::<Option<String>, _>("origin_name")?
                .unwrap_or_default(),
            title: row.try_get("title")?,
            total_content: row.try_get("total_content")?,
            released_date: row.try_get("released_date")?,
            synopsis: row.try_get("synopsis")?,
            thumbnail_image: row.try_get("thumbnail_image")?,
            read_count: row.try_get("read_count")?,
            is_highlighted: row.try_get("is_highlighted")?,
            is_favorited: row.try_get("is_favorited")?,
            genre_ids: split_ids(row.try_get("genre_ids")?)?,
            genre_names: split_names(row.try_get("genre_names")?),
            contents: None,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Lighter list row, genre names only and no synopsis
#[derive(Debug, Clone, Serialize)]
pub struct StoryPreview {
    pub story_id: i64,
    pub type_id: i64,
    pub type_name: String,
    pub origin_id: i64,
    pub origin_name: String,
    pub title: String,
    pub total_content: i64,
    pub released_date: Date,
    pub thumbnail_image: String,
    pub read_count: i64,
    pub is_highlighted: bool,
    pub is_favorited: bool,
    #[serde(rename = "genre_name")]
    pub genre_names: Vec<String>,
}

impl sqlx::FromRow<'_, ChosenRow> for StoryPreview {
    fn from_row(row: &ChosenRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(StoryPreview {
            story_id: row.try_get("story_id")?,
            type_id: row.try_get("type_id")?,
            type_name: row
                .try_get::<Option<String>, _>("type_name")?
                .unwrap_or_default(),
            origin_id: row.try_get("origin_id")?,
            origin_name: row
                .try_get::<Option<String>, _>("origin_name")?
                .unwrap_or_default(),
            title: row.try_get("title")?,
            total_content: row.try_get("total_content")?,
            released_date: row.try_get("released_date")?,
            thumbnail_image: row.try_get("thumbnail_image")?,
            read_count: row.try_get("read_count")?,
            is_highlighted: row.try_get("is_highlighted")?,
            is_favorited: row.try_get("is_favorited")?,
            genre_names: split_names(row.try_get("genre_names")?),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub story: Story,
    pub is_bookmarked: i64,
    pub bookmark_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryContents {
    pub story_id: i64,
    pub title: String,
    #[serde(rename = "story_content")]
    pub contents: Vec<StoryContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStory {
    #[garde(range(min = 1))]
    pub type_id: i64,
    #[garde(range(min = 1))]
    pub origin_id: i64,
    #[garde(length(min = 1, max = 511))]
    pub title: String,
    #[garde(range(min = 0))]
    pub total_content: Option<i64>,
    #[garde(skip)]
    pub released_date: Date,
    #[garde(length(max = 5000))]
    #[serde(default)]
    pub synopsis: String,
    #[garde(length(max = 1023))]
    #[serde(default)]
    pub thumbnail_image: String,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub read_count: i64,
    #[garde(skip)]
    #[serde(default)]
    pub is_highlighted: bool,
    #[garde(skip)]
    #[serde(default)]
    pub is_favorited: bool,
    #[garde(inner(range(min = 1)))]
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[garde(dive)]
    #[serde(default)]
    pub contents: Vec<StoryContent>,
}

impl PartialUpdate for CreateStory {
    fn into_changes(self) -> Changes {
        let total_content = self
            .total_content
            .unwrap_or(self.contents.len() as i64);
        Changes::new()
            .set("type_id", self.type_id)
            .set("origin_id", self.origin_id)
            .set("title", self.title)
            .set("total_content", total_content)
            .set("released_date", self.released_date)
            .set("synopsis", self.synopsis)
            .set("thumbnail_image", self.thumbnail_image)
            .set("read_count", self.read_count)
            .set("is_highlighted", self.is_highlighted)
            .set("is_favorited", self.is_favorited)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStory {
    #[garde(range(min = 1))]
    pub type_id: Option<i64>,
    #[garde(range(min = 1))]
    pub origin_id: Option<i64>,
    #[garde(length(min = 1, max = 511))]
    pub title: Option<String>,
    #[garde(range(min = 0))]
    pub total_content: Option<i64>,
    #[garde(skip)]
    pub released_date: Option<Date>,
    #[garde(length(max = 5000))]
    pub synopsis: Option<String>,
    #[garde(length(max = 1023))]
    pub thumbnail_image: Option<String>,
    #[garde(range(min = 0))]
    pub read_count: Option<i64>,
    #[garde(skip)]
    pub is_highlighted: Option<bool>,
    #[garde(skip)]
    pub is_favorited: Option<bool>,
}

impl PartialUpdate for UpdateStory {
    fn into_changes(self) -> Changes {
        Changes::new()
            .set_some("type_id", self.type_id)
            .set_some("origin_id", self.origin_id)
            .set_some("title", self.title)
            .set_some("total_content", self.total_content)
            .set_some("released_date", self.released_date)
            .set_some("synopsis", self.synopsis)
            .set_some("thumbnail_image", self.thumbnail_image)
            .set_some("read_count", self.read_count)
            .set_some("is_highlighted", self.is_highlighted)
            .set_some("is_favorited", self.is_favorited)
    }
}

async fn fetch_contents<'e, E>(executor: E, story_id: i64) -> Result<Vec<StoryContent>>
where
    E: Executor<'e, Database = ChosenDB>,
{
    let contents = sqlx::query_as::<_, StoryContent>(CONTENTS_SELECT)
        .bind(story_id)
        .fetch_all(executor)
        .await?;
    Ok(contents)
}

pub type StoryRepository = StoryRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct StoryRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> StoryRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Complete stories, each with its ordered content items
    pub async fn list(&self, request: &PageRequest) -> Result<Batch<Story>> {
        let filter = Filter::default().keyword(KEYWORD_COLUMNS, request.keyword());
        let mut batch: Batch<Story> = LISTING.fetch(&self.executor, request, &filter).await?;
        for story in batch.rows.iter_mut() {
            story.contents = Some(fetch_contents(&self.executor, story.story_id).await?);
        }
        Ok(batch)
    }

    pub async fn list_previews(
        &self,
        request: &PageRequest,
        type_id: Option<i64>,
    ) -> Result<Batch<StoryPreview>> {
        let filter = Filter::default()
            .keyword(KEYWORD_COLUMNS, request.keyword())
            .equals_opt("s.type_id", type_id);
        PREVIEW_LISTING.fetch(&self.executor, request, &filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Story> {
        let sql = format!("{STORY_SELECT} WHERE s.story_id = ? GROUP BY s.story_id");
        sqlx::query_as::<_, Story>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Story".to_string()))
    }

    pub async fn detail(&self, id: i64, owner: Option<&BookmarkOwner>) -> Result<StoryDetail> {
        let story = self.get(id).await?;
        let bookmark_id = match owner {
            Some(owner) => bookmark::find_for_story(&self.executor, owner, id).await?,
            None => None,
        };
        debug!("Story {id} bookmark for {owner:?}: {bookmark_id:?}");
        Ok(StoryDetail {
            story,
            is_bookmarked: bookmark_id.map(|_| 1).unwrap_or(0),
            bookmark_id: bookmark_id.unwrap_or(0),
        })
    }

    pub async fn contents(&self, id: i64) -> Result<StoryContents> {
        let (story_id, title): (i64, String) =
            sqlx::query_as("SELECT story_id, title FROM story WHERE story_id = ?")
                .bind(id)
                .fetch_optional(&self.executor)
                .await?
                .ok_or_else(|| Error::RecordNotFound("Story".to_string()))?;
        let contents = fetch_contents(&self.executor, story_id).await?;
        Ok(StoryContents {
            story_id,
            title,
            contents,
        })
    }

    /// Random previews of other stories
    pub async fn recommend(&self, exclude_id: i64, limit: i64) -> Result<Vec<StoryPreview>> {
        let sql = format!(
            "{PREVIEW_SELECT} WHERE s.story_id != ? GROUP BY s.story_id ORDER BY RANDOM() LIMIT ?"
        );
        let rows = sqlx::query_as::<_, StoryPreview>(&sql)
            .bind(exclude_id)
            .bind(limit.max(0))
            .fetch_all(&self.executor)
            .await?;
        Ok(rows)
    }

    pub async fn update(&self, id: i64, payload: UpdateStory) -> Result<Updated> {
        apply_update(&self.executor, TABLE, id, payload.into_changes()).await
    }

    /// Genre links, content items and bookmarks go with the story
    pub async fn delete(&self, id: i64) -> Result<Deleted> {
        apply_delete(&self.executor, TABLE, id).await
    }
}

impl<'c, E> StoryRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub async fn create(&self, payload: CreateStory) -> Result<Created> {
        let genre_ids = payload.genre_ids.clone();
        let contents = payload.contents.clone();
        let mut tx = self.executor.begin().await?;

        let created = apply_insert(&mut *tx, TABLE, payload.into_changes()).await?;
        for genre_id in genre_ids {
            sqlx::query("INSERT OR IGNORE INTO story_genre (story_id, genre_id) VALUES (?, ?)")
                .bind(created.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }
        for content in contents {
            sqlx::query(
                r#"INSERT INTO story_content (story_id, "order", image, content_indo, content_eng)
VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(created.id)
            .bind(content.order)
            .bind(content.image)
            .bind(content.content_indo)
            .bind(content.content_eng)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        debug!("Created story {}", created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty_aggregate() {
        assert!(split_names(None).is_empty());
        assert!(split_names(Some(String::new())).is_empty());
        assert!(split_ids(None).unwrap().is_empty());
    }

    #[test]
    fn test_split_aggregate() {
        let names = split_names(Some("Legend\u{1f}Fable, Myth".to_string()));
        assert_eq!(names, ["Legend", "Fable, Myth"]);
        let ids = split_ids(Some("3\u{1f}12".to_string())).unwrap();
        assert_eq!(ids, [3, 12]);
        assert!(split_ids(Some("3\u{1f}x".to_string())).is_err());
    }

    #[test]
    fn test_create_story_total_content_default() {
        let story = CreateStory {
            type_id: 1,
            origin_id: 1,
            title: "Bawang Merah Bawang Putih".to_string(),
            total_content: None,
            released_date: time::macros::date!(2024 - 01 - 05),
            synopsis: String::new(),
            thumbnail_image: String::new(),
            read_count: 0,
            is_highlighted: false,
            is_favorited: true,
            genre_ids: vec![1],
            contents: vec![StoryContent {
                order: 1,
                image: "page1.png".to_string(),
                content_indo: "Pada zaman dahulu".to_string(),
                content_eng: "Once upon a time".to_string(),
            }],
        };
        let changes = story.into_changes();
        assert_eq!(
            changes.get("total_content"),
            Some(&crate::update::FieldValue::Int(1))
        );
        assert!(changes.get("genre_ids").is_none());
    }
}
