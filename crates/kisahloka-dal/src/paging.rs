use serde::Serialize;
use sqlx::QueryBuilder;
use tracing::debug;

use crate::{ChosenDB, ChosenRow, Error, error::Result};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Number of pages needed for `total_items`, `0` for zero page size
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
    keyword: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            keyword: None,
        }
    }
}

impl PageRequest {
    /// Values below 1 fall back to first page and default page size
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1),
            page_size: u64::try_from(page_size)
                .ok()
                .filter(|s| *s >= 1)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: Option<impl Into<String>>) -> Self {
        self.keyword = keyword.map(Into::into).filter(|k| !k.is_empty());
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) * self.page_size) as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct PageMeta {
    pub limit: u64,
    pub page: u64,
    #[serde(rename = "total_page")]
    pub total_pages: u64,
    pub total_items: u64,
}

impl PageMeta {
    pub fn resolve(request: &PageRequest, total_items: u64) -> Result<Self> {
        let total_pages = total_pages(total_items, request.page_size);
        if total_items > 0 && request.page > total_pages {
            return Err(Error::PageOutOfRange {
                page: request.page,
                total_pages,
            });
        }
        Ok(PageMeta {
            limit: request.page_size,
            page: request.page,
            total_pages,
            total_items,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Batch<T> {
    pub rows: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone)]
pub(crate) enum Condition {
    Equals(&'static str, i64),
    NotEquals(&'static str, i64),
    Contains(&'static [&'static str], String),
}

/// WHERE clause with bound values only, column names are static
#[derive(Debug, Clone, Default)]
pub(crate) struct Filter {
    conditions: Vec<Condition>,
}

fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Filter {
    pub fn keyword(mut self, columns: &'static [&'static str], keyword: Option<&str>) -> Self {
        if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
            self.conditions
                .push(Condition::Contains(columns, like_pattern(keyword)));
        }
        self
    }

    pub fn equals(mut self, column: &'static str, value: i64) -> Self {
        self.conditions.push(Condition::Equals(column, value));
        self
    }

    pub fn equals_opt(self, column: &'static str, value: Option<i64>) -> Self {
        match value {
            Some(value) => self.equals(column, value),
            None => self,
        }
    }

    pub fn not_equals(mut self, column: &'static str, value: i64) -> Self {
        self.conditions.push(Condition::NotEquals(column, value));
        self
    }

    pub fn push_where<'args>(&self, query: &mut QueryBuilder<'args, ChosenDB>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            query.push(if i == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::Equals(column, value) => {
                    query.push(*column).push(" = ").push_bind(*value);
                }
                Condition::NotEquals(column, value) => {
                    query.push(*column).push(" != ").push_bind(*value);
                }
                Condition::Contains(columns, pattern) => {
                    query.push("(");
                    for (j, column) in columns.iter().enumerate() {
                        if j > 0 {
                            query.push(" OR ");
                        }
                        query
                            .push(*column)
                            .push(" LIKE ")
                            .push_bind(pattern.clone())
                            .push(" ESCAPE '\\'");
                    }
                    query.push(")");
                }
            }
        }
    }
}

/// Count and select statements of one paginated list.
/// Both must use the same table aliases as the filter columns.
pub(crate) struct Listing {
    pub count: &'static str,
    pub select: &'static str,
    pub group_by: Option<&'static str>,
}

impl Listing {
    pub(crate) async fn fetch<'e, E, T>(
        &self,
        executor: E,
        request: &PageRequest,
        filter: &Filter,
    ) -> Result<Batch<T>>
    where
        E: sqlx::Executor<'e, Database = ChosenDB> + Copy,
        T: for<'r> sqlx::FromRow<'r, ChosenRow> + Send + Unpin,
    {
        let mut count = QueryBuilder::<ChosenDB>::new(self.count);
        filter.push_where(&mut count);
        let total_items = count.build_query_scalar::<i64>().fetch_one(executor).await?;
        let meta = PageMeta::resolve(request, total_items as u64)?;
        if total_items == 0 {
            return Ok(Batch {
                rows: Vec::new(),
                meta,
            });
        }

        let mut select = QueryBuilder::<ChosenDB>::new(self.select);
        filter.push_where(&mut select);
        if let Some(group_by) = self.group_by {
            select.push(" GROUP BY ").push(group_by);
        }
        select
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());
        debug!(sql = select.sql(), "Listing page {} of {}", meta.page, meta.total_pages);
        let rows = select.build_query_as::<T>().fetch_all(executor).await?;
        Ok(Batch { rows, meta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(25, 0), 0);
        for items in 0..200_u64 {
            for size in 1..30_u64 {
                let expected = (items as f64 / size as f64).ceil() as u64;
                assert_eq!(total_pages(items, size), expected);
            }
        }
    }

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::new(0, -5);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);

        let request = PageRequest::new(3, 10).with_keyword(Some(""));
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.keyword(), None);
    }

    #[test]
    fn test_meta_resolution() {
        let meta = PageMeta::resolve(&PageRequest::new(3, 10), 25).unwrap();
        assert_eq!(
            meta,
            PageMeta {
                limit: 10,
                page: 3,
                total_pages: 3,
                total_items: 25
            }
        );

        let err = PageMeta::resolve(&PageRequest::new(4, 10), 25).unwrap_err();
        assert!(matches!(
            err,
            Error::PageOutOfRange {
                page: 4,
                total_pages: 3
            }
        ));

        let empty = PageMeta::resolve(&PageRequest::new(7, 10), 0).unwrap();
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.total_items, 0);
    }

    #[test]
    fn test_meta_wire_names() {
        let meta = PageMeta::resolve(&PageRequest::new(1, 10), 5).unwrap();
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["total_page"], 1);
        assert_eq!(json["total_items"], 5);
        assert_eq!(json["limit"], 10);
    }

    #[test]
    fn test_filter_sql() {
        let filter = Filter::default()
            .keyword(&["u.email", "u.name"], Some("ann"))
            .equals("u.role_id", 2);
        let mut query = QueryBuilder::<ChosenDB>::new("SELECT count(*) FROM users u");
        filter.push_where(&mut query);
        assert_eq!(
            query.sql(),
            "SELECT count(*) FROM users u WHERE (u.email LIKE ? ESCAPE '\\' OR u.name LIKE ? ESCAPE '\\') AND u.role_id = ?"
        );
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("Legend"), "%Legend%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
