//! Landing page aggregate.
//!
//! The three reads run one after another without a transaction, so a write
//! landing between them can show up in one list and not in another.

use serde::Serialize;
use sqlx::{Executor, Pool};
use time::OffsetDateTime;
use tracing::debug;

use crate::{ChosenDB, error::Result};

const STORY_HOME_SELECT: &str = r#"
SELECT s.story_id, s.type_id, t.type_name, s.origin_id, o.origin_name, s.title, s.thumbnail_image,
s.is_highlighted, s.is_favorited, s.created_at, s.updated_at
FROM story s
JOIN type t ON s.type_id = t.type_id
JOIN origin o ON s.origin_id = o.origin_id"#;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoryHome {
    pub story_id: i64,
    pub type_id: i64,
    pub type_name: String,
    pub origin_id: i64,
    pub origin_name: String,
    pub title: String,
    pub thumbnail_image: String,
    pub is_highlighted: bool,
    pub is_favorited: bool,
    #[serde(with = "crate::zoned")]
    pub created_at: OffsetDateTime,
    #[serde(with = "crate::zoned")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TypeSummary {
    pub type_id: i64,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Home {
    pub highlight_stories: Vec<StoryHome>,
    pub favorite_stories: Vec<StoryHome>,
    pub story_types: Vec<TypeSummary>,
}

pub type HomeRepository = HomeRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct HomeRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> HomeRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    async fn stories_where(&self, flag_column: &str) -> Result<Vec<StoryHome>> {
        let sql = format!("{STORY_HOME_SELECT} WHERE s.{flag_column} = ?");
        let stories = sqlx::query_as::<_, StoryHome>(&sql)
            .bind(true)
            .fetch_all(&self.executor)
            .await?;
        Ok(stories)
    }

    pub async fn get(&self) -> Result<Home> {
        let highlight_stories = self.stories_where("is_highlighted").await?;
        let favorite_stories = self.stories_where("is_favorited").await?;
        let story_types = sqlx::query_as::<_, TypeSummary>("SELECT type_id, type_name FROM type")
            .fetch_all(&self.executor)
            .await?;
        debug!(
            highlighted = highlight_stories.len(),
            favorited = favorite_stories.len(),
            types = story_types.len(),
            "Home composed"
        );
        Ok(Home {
            highlight_stories,
            favorite_stories,
            story_types,
        })
    }
}
