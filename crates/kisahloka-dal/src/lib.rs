pub mod bookmark;
pub mod error;
pub mod genre;
pub mod home;
mod macros;
pub mod origin;
pub mod paging;
pub mod role;
pub mod story;
pub mod story_type;
pub mod update;
pub mod user;
pub mod zoned;

use std::str::FromStr as _;

pub use error::Error;
pub use paging::{Batch, PageMeta, PageRequest};
pub use sqlx::Error as SqlxError;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::debug;
pub use update::{Changes, Created, Deleted, PartialUpdate, Updated};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    debug!("Database schema is up to date");
    Ok(())
}
