/// Generates record, payloads and repository for a named value entity
/// (`<x>_id`, `<x>_name` and timestamps), as used for types, origins, genres and roles.
macro_rules! value_entity {
    ($entity:ident, table = $table:literal, id = $id:ident, name = $name:ident) => {
        paste::paste! {
            #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
            pub struct $entity {
                pub $id: i64,
                pub $name: String,
                #[serde(with = "crate::zoned")]
                pub created_at: time::OffsetDateTime,
                #[serde(with = "crate::zoned")]
                pub updated_at: time::OffsetDateTime,
            }

            #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, garde::Validate)]
            pub struct [<Create $entity>] {
                #[garde(length(min = 1, max = 255))]
                pub $name: String,
            }

            #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, garde::Validate)]
            pub struct [<Update $entity>] {
                #[garde(length(min = 1, max = 255))]
                pub $name: Option<String>,
            }

            impl crate::update::PartialUpdate for [<Create $entity>] {
                fn into_changes(self) -> crate::update::Changes {
                    crate::update::Changes::new().set(stringify!($name), self.$name)
                }
            }

            impl crate::update::PartialUpdate for [<Update $entity>] {
                fn into_changes(self) -> crate::update::Changes {
                    crate::update::Changes::new().set_some(stringify!($name), self.$name)
                }
            }

            const TABLE: crate::update::Table = crate::update::Table {
                name: $table,
                id_column: stringify!($id),
            };
            const KEYWORD_COLUMNS: &[&str] = &[stringify!($name)];
            const LISTING: crate::paging::Listing = crate::paging::Listing {
                count: concat!("SELECT count(*) FROM ", $table),
                select: concat!(
                    "SELECT ", stringify!($id), ", ", stringify!($name),
                    ", created_at, updated_at FROM ", $table
                ),
                group_by: None,
            };
            const SELECT_ONE: &str = concat!(
                "SELECT ", stringify!($id), ", ", stringify!($name),
                ", created_at, updated_at FROM ", $table, " WHERE ", stringify!($id), " = ?"
            );

            pub type [<$entity Repository>] = [<$entity RepositoryImpl>]<sqlx::Pool<crate::ChosenDB>>;

            pub struct [<$entity RepositoryImpl>]<E> {
                executor: E,
            }

            impl<'c, E> [<$entity RepositoryImpl>]<E>
            where
                for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
            {
                pub fn new(executor: E) -> Self {
                    Self { executor }
                }

                pub async fn list(
                    &self,
                    request: &crate::PageRequest,
                ) -> crate::error::Result<crate::Batch<$entity>> {
                    let filter = crate::paging::Filter::default()
                        .keyword(KEYWORD_COLUMNS, request.keyword());
                    LISTING.fetch(&self.executor, request, &filter).await
                }

                pub async fn get(&self, id: i64) -> crate::error::Result<$entity> {
                    sqlx::query_as::<_, $entity>(SELECT_ONE)
                        .bind(id)
                        .fetch_optional(&self.executor)
                        .await?
                        .ok_or_else(|| crate::Error::RecordNotFound(stringify!($entity).to_string()))
                }

                pub async fn create(
                    &self,
                    payload: [<Create $entity>],
                ) -> crate::error::Result<crate::Created> {
                    use crate::update::PartialUpdate as _;
                    crate::update::apply_insert(&self.executor, TABLE, payload.into_changes()).await
                }

                pub async fn update(
                    &self,
                    id: i64,
                    payload: [<Update $entity>],
                ) -> crate::error::Result<crate::Updated> {
                    use crate::update::PartialUpdate as _;
                    crate::update::apply_update(&self.executor, TABLE, id, payload.into_changes())
                        .await
                }

                pub async fn delete(&self, id: i64) -> crate::error::Result<crate::Deleted> {
                    crate::update::apply_delete(&self.executor, TABLE, id).await
                }
            }
        }
    };
}

pub(crate) use value_entity;
