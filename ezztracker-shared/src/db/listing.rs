/// Generic list queries for the admin views
///
/// Every entity list in the admin supports the same operations: free-text
/// search over a declared set of columns, equality filters on another set,
/// sorting on a whitelist, and pagination. Column names only ever come from
/// the static [`ListSpec`]; user input is bound, never interpolated.

use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeMap;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on rows per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Static description of how a table may be listed
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListSpec {
    /// Table name
    pub table: &'static str,

    /// Columns matched with `LIKE %term%` when a search term is given
    pub searchable: &'static [&'static str],

    /// Columns that accept an equality filter
    pub filterable: &'static [&'static str],

    /// Columns the list may be ordered by
    pub sortable: &'static [&'static str],

    /// Default ordering: column and whether it is descending
    pub default_sort: (&'static str, bool),
}

/// A request for one page of rows
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub desc: bool,
    pub filters: BTreeMap<String, String>,
    pub page: u32,
    pub page_size: u32,
}

impl ListQuery {
    /// Page number clamped to at least 1
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size with defaults and bounds applied
    pub fn page_size(&self) -> u32 {
        match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.page_size())
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl ListSpec {
    /// Resolves the requested sort against the whitelist
    ///
    /// Unknown columns fall back to the default ordering.
    fn order_by(&self, query: &ListQuery) -> (&'static str, bool) {
        query
            .sort
            .as_deref()
            .and_then(|wanted| self.sortable.iter().find(|c| **c == wanted))
            .map(|column| (*column, query.desc))
            .unwrap_or(self.default_sort)
    }

    fn push_conditions<'a>(&self, qb: &mut QueryBuilder<'a, Sqlite>, query: &ListQuery) {
        let mut has_where = false;

        let term = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty());
        if let (Some(term), false) = (term, self.searchable.is_empty()) {
            qb.push(" WHERE (");
            let mut clauses = qb.separated(" OR ");
            for column in self.searchable {
                clauses.push(*column);
                clauses.push_unseparated(" LIKE ");
                clauses.push_bind_unseparated(format!("%{}%", escape_like(term)));
                clauses.push_unseparated(" ESCAPE '\\'");
            }
            qb.push(")");
            has_where = true;
        }

        for (name, value) in &query.filters {
            let Some(column) = self.filterable.iter().find(|c| **c == name.as_str()) else {
                continue;
            };
            qb.push(if has_where { " AND " } else { " WHERE " });
            qb.push(*column);
            qb.push(" = ");
            qb.push_bind(value.clone());
            has_where = true;
        }
    }
}

/// Escapes `LIKE` wildcards so a search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Fetches one page of rows described by `spec` and `query`
///
/// # Errors
///
/// Returns an error if either the count or the select query fails.
pub async fn fetch_page<T>(
    pool: &SqlitePool,
    spec: &ListSpec,
    query: &ListQuery,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
    count.push(spec.table);
    spec.push_conditions(&mut count, query);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let (column, desc) = spec.order_by(query);

    let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM ");
    select.push(spec.table);
    spec.push_conditions(&mut select, query);
    select.push(" ORDER BY ");
    select.push(column);
    select.push(if desc { " DESC" } else { " ASC" });
    // Stable pagination when the sort column has duplicates
    if column != "id" {
        select.push(", id ASC");
    }
    select.push(" LIMIT ");
    select.push_bind(i64::from(query.page_size()));
    select.push(" OFFSET ");
    select.push_bind(query.offset());

    let items = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page {
        items,
        total,
        page: query.page(),
        page_size: query.page_size(),
    })
}
