#![allow(dead_code)]

use kisahloka_dal::{
    Pool, genre::{CreateGenre, GenreRepositoryImpl}, origin::{CreateOrigin, OriginRepositoryImpl},
    role::{CreateRole, RoleRepositoryImpl}, story::{CreateStory, StoryContent, StoryRepositoryImpl},
    story_type::{CreateStoryType, StoryTypeRepositoryImpl},
    user::{CreateUser, UserRepositoryImpl},
};
use sqlx::Executor as _;
use time::macros::date;

pub async fn init_db() -> Pool {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    kisahloka_dal::MIGRATOR.run(&conn).await.unwrap();
    conn
}

/// Ids of the rows every story needs
pub struct Catalog {
    pub type_id: i64,
    pub origin_id: i64,
    pub genre_ids: Vec<i64>,
    pub role_id: i64,
}

pub async fn seed_catalog(conn: &Pool) -> Catalog {
    let type_id = StoryTypeRepositoryImpl::new(conn.clone())
        .create(CreateStoryType {
            type_name: "Fable".to_string(),
        })
        .await
        .unwrap()
        .id;
    let origin_id = OriginRepositoryImpl::new(conn.clone())
        .create(CreateOrigin {
            origin_name: "Jawa Timur".to_string(),
        })
        .await
        .unwrap()
        .id;
    let genres = GenreRepositoryImpl::new(conn.clone());
    let mut genre_ids = Vec::new();
    for name in ["Legend", "Myth"] {
        let created = genres
            .create(CreateGenre {
                genre_name: name.to_string(),
            })
            .await
            .unwrap();
        genre_ids.push(created.id);
    }
    let role_id = RoleRepositoryImpl::new(conn.clone())
        .create(CreateRole {
            role_name: "reader".to_string(),
        })
        .await
        .unwrap()
        .id;
    Catalog {
        type_id,
        origin_id,
        genre_ids,
        role_id,
    }
}

pub fn new_story(catalog: &Catalog, title: &str, genre_ids: Vec<i64>) -> CreateStory {
    CreateStory {
        type_id: catalog.type_id,
        origin_id: catalog.origin_id,
        title: title.to_string(),
        total_content: None,
        released_date: date!(2023 - 08 - 17),
        synopsis: format!("Synopsis of {title}"),
        thumbnail_image: "thumb.png".to_string(),
        read_count: 0,
        is_highlighted: false,
        is_favorited: false,
        genre_ids,
        contents: vec![
            StoryContent {
                order: 2,
                image: "p2.png".to_string(),
                content_indo: "Akhirnya".to_string(),
                content_eng: "Finally".to_string(),
            },
            StoryContent {
                order: 1,
                image: "p1.png".to_string(),
                content_indo: "Pada suatu hari".to_string(),
                content_eng: "One day".to_string(),
            },
        ],
    }
}

pub async fn create_story(conn: &Pool, story: CreateStory) -> i64 {
    StoryRepositoryImpl::new(conn.clone())
        .create(story)
        .await
        .unwrap()
        .id
}

pub async fn create_user(conn: &Pool, catalog: &Catalog, uid: &str) -> i64 {
    UserRepositoryImpl::new(conn.clone())
        .create(CreateUser {
            uid: uid.to_string(),
            role_id: catalog.role_id,
            email: format!("{uid}@example.com").parse().unwrap(),
            name: format!("User {uid}"),
            birth_date: None,
            gender: None,
        })
        .await
        .unwrap()
        .id
}
