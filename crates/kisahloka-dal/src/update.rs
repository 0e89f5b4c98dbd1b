use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::{ChosenDB, error::Result, zoned};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bool(bool),
    Date(Date),
    Timestamp(OffsetDateTime),
    Null,
}

impl FieldValue {
    fn push_bind(self, query: &mut QueryBuilder<'_, ChosenDB>) {
        match self {
            FieldValue::Int(v) => query.push_bind(v),
            FieldValue::Text(v) => query.push_bind(v),
            FieldValue::Bool(v) => query.push_bind(v),
            FieldValue::Date(v) => query.push_bind(v),
            FieldValue::Timestamp(v) => query.push_bind(v),
            FieldValue::Null => query.push_bind(None::<String>),
        };
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Date> for FieldValue {
    fn from(value: Date) -> Self {
        FieldValue::Date(value)
    }
}

impl From<OffsetDateTime> for FieldValue {
    fn from(value: OffsetDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Ordered column assignments, later `set` of the same column wins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
        self
    }

    /// Sets column only when value is present
    pub fn set_some<V: Into<FieldValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }
}

/// Typed payloads which know their column assignments
pub trait PartialUpdate {
    fn into_changes(self) -> Changes;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Table {
    pub name: &'static str,
    pub id_column: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
    pub id: i64,
    #[serde(with = "crate::zoned")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Updated {
    pub rows_affected: u64,
    #[serde(with = "crate::zoned")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deleted {
    pub rows_affected: u64,
    pub deleted_id: i64,
}

pub(crate) fn update_statement(
    table: Table,
    id: i64,
    changes: Changes,
) -> QueryBuilder<'static, ChosenDB> {
    let mut query = QueryBuilder::new(format!("UPDATE {} SET ", table.name));
    for (i, (column, value)) in changes.fields.into_iter().enumerate() {
        if i > 0 {
            query.push(", ");
        }
        query.push(column).push(" = ");
        value.push_bind(&mut query);
    }
    query
        .push(" WHERE ")
        .push(table.id_column)
        .push(" = ")
        .push_bind(id);
    query
}

pub(crate) fn insert_statement(table: Table, changes: Changes) -> QueryBuilder<'static, ChosenDB> {
    let mut query = QueryBuilder::new(format!("INSERT INTO {} (", table.name));
    let columns = changes.columns().collect::<Vec<_>>().join(", ");
    query.push(columns).push(") VALUES (");
    for (i, (_, value)) in changes.fields.into_iter().enumerate() {
        if i > 0 {
            query.push(", ");
        }
        value.push_bind(&mut query);
    }
    query.push(")");
    query
}

/// Always refreshes `updated_at`, zero affected rows means no match, not an error
pub(crate) async fn apply_update<'e, E>(
    executor: E,
    table: Table,
    id: i64,
    changes: Changes,
) -> Result<Updated>
where
    E: sqlx::Executor<'e, Database = ChosenDB>,
{
    let updated_at = zoned::now();
    let changes = changes.set("updated_at", updated_at);
    let mut statement = update_statement(table, id, changes);
    debug!(sql = statement.sql(), "Updating {} {id}", table.name);
    let result = statement.build().execute(executor).await?;
    Ok(Updated {
        rows_affected: result.rows_affected(),
        updated_at,
    })
}

pub(crate) async fn apply_insert<'e, E>(executor: E, table: Table, changes: Changes) -> Result<Created>
where
    E: sqlx::Executor<'e, Database = ChosenDB>,
{
    let created_at = zoned::now();
    let changes = changes
        .set("created_at", created_at)
        .set("updated_at", created_at);
    let mut statement = insert_statement(table, changes);
    let result = statement.build().execute(executor).await?;
    Ok(Created {
        id: result.last_insert_rowid(),
        created_at,
    })
}

pub(crate) async fn apply_delete<'e, E>(executor: E, table: Table, id: i64) -> Result<Deleted>
where
    E: sqlx::Executor<'e, Database = ChosenDB>,
{
    let mut statement = QueryBuilder::<ChosenDB>::new(format!(
        "DELETE FROM {} WHERE {} = ",
        table.name, table.id_column
    ));
    statement.push_bind(id);
    let result = statement.build().execute(executor).await?;
    Ok(Deleted {
        rows_affected: result.rows_affected(),
        deleted_id: id,
    })
}
