use rusqlite::types::Value as SqlValue;

use crate::query::{ItemQuery, LocationFilter, SortKey};
use crate::sqlite_store::FOLD_CASE_FN;

/// Compiled SQL query fragments with bound parameters.
///
/// `where_clause` and `params` are shared by the count and the page query so
/// both see exactly the same rows.
pub(crate) struct CompiledQuery {
    pub where_clause: String,
    pub params: Vec<SqlValue>,
    pub order_clause: String,
    pub limit: i64,
    pub offset: i64,
}

/// Translate an ItemQuery into SQL fragments over `items i`.
pub(crate) fn compile_query(q: &ItemQuery) -> CompiledQuery {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(search) = q.search.as_deref().filter(|s| !s.is_empty()) {
        // Both sides are folded so non-ASCII letters match regardless of case
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        conditions.push(format!(
            "({f}(i.name) LIKE ? ESCAPE '\\' OR {f}(i.description) LIKE ? ESCAPE '\\')",
            f = FOLD_CASE_FN
        ));
        params.push(SqlValue::Text(pattern.clone()));
        params.push(SqlValue::Text(pattern));
    }

    if let LocationFilter::Only(location) = &q.location {
        conditions.push("i.location_id = ?".to_string());
        params.push(SqlValue::Text(location.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    CompiledQuery {
        where_clause,
        params,
        order_clause: compile_sort(q),
        limit: i64::from(q.limit),
        offset: i64::try_from(q.offset()).unwrap_or(i64::MAX),
    }
}

fn compile_sort(q: &ItemQuery) -> String {
    let collate = if q.sort == SortKey::Name {
        " COLLATE NOCASE"
    } else {
        ""
    };
    format!(
        "ORDER BY i.{}{} {}, i.id ASC",
        q.sort.column(),
        collate,
        q.direction.keyword()
    )
}

/// Escape LIKE wildcards so the search text matches literally.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
