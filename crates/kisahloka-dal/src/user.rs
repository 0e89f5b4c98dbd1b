use garde::Validate;
use kisahloka_types::general::{Gender, ValidEmail};
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::{Date, OffsetDateTime};

use crate::{
    Batch, Created, Deleted, Error, PageRequest, Updated,
    error::Result,
    paging::{Filter, Listing},
    update::{Changes, PartialUpdate, Table, apply_delete, apply_insert, apply_update},
};

const TABLE: Table = Table {
    name: "users",
    id_column: "user_id",
};

const SELECT: &str = r#"
SELECT u.user_id, u.uid, u.role_id, r.role_name, u.email, u.name, u.birth_date, u.gender,
u.created_at, u.updated_at
FROM users u
LEFT JOIN role r ON u.role_id = r.role_id"#;

const LISTING: Listing = Listing {
    count: "SELECT count(*) FROM users u",
    select: SELECT,
    group_by: None,
};

const KEYWORD_COLUMNS: &[&str] = &["u.email", "u.name"];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub uid: String,
    pub role_id: i64,
    pub role_name: Option<String>,
    pub email: String,
    pub name: String,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
    #[serde(with = "crate::zoned")]
    pub created_at: OffsetDateTime,
    #[serde(with = "crate::zoned")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[garde(length(min = 1, max = 255))]
    pub uid: String,
    #[garde(range(min = 1))]
    pub role_id: i64,
    #[garde(dive)]
    pub email: ValidEmail,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(skip)]
    pub birth_date: Option<Date>,
    #[garde(skip)]
    pub gender: Option<Gender>,
}

impl PartialUpdate for CreateUser {
    fn into_changes(self) -> Changes {
        Changes::new()
            .set("uid", self.uid)
            .set("role_id", self.role_id)
            .set("email", String::from(self.email))
            .set("name", self.name)
            .set("birth_date", self.birth_date)
            .set("gender", self.gender.map(|g| g.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    #[garde(length(min = 1, max = 255))]
    pub uid: Option<String>,
    #[garde(range(min = 1))]
    pub role_id: Option<i64>,
    #[garde(dive)]
    pub email: Option<ValidEmail>,
    #[garde(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[garde(skip)]
    pub birth_date: Option<Date>,
    #[garde(skip)]
    pub gender: Option<Gender>,
}

impl PartialUpdate for UpdateUser {
    fn into_changes(self) -> Changes {
        Changes::new()
            .set_some("uid", self.uid)
            .set_some("role_id", self.role_id)
            .set_some("email", self.email.map(String::from))
            .set_some("name", self.name)
            .set_some("birth_date", self.birth_date)
            .set_some("gender", self.gender.map(|g| g.to_string()))
    }
}

pub type UserRepository = UserRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct UserRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> UserRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Batch<User>> {
        let filter = Filter::default().keyword(KEYWORD_COLUMNS, request.keyword());
        LISTING.fetch(&self.executor, request, &filter).await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        let sql = format!("{SELECT} WHERE u.user_id = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("User".to_string()))
    }

    pub async fn get_by_uid(&self, uid: &str) -> Result<User> {
        let sql = format!("{SELECT} WHERE u.uid = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(uid)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("User".to_string()))
    }

    pub async fn create(&self, payload: CreateUser) -> Result<Created> {
        apply_insert(&self.executor, TABLE, payload.into_changes()).await
    }

    pub async fn update(&self, id: i64, payload: UpdateUser) -> Result<Updated> {
        apply_update(&self.executor, TABLE, id, payload.into_changes()).await
    }

    pub async fn delete(&self, id: i64) -> Result<Deleted> {
        apply_delete(&self.executor, TABLE, id).await
    }
}
