use crate::models::internal::ReportListItem;
use crate::storage::RepositoryError;

/// Opaque pagination cursor: the decimal form of a report's `snowflake_id`.
/// Pages continue strictly below the supplied value, so rows created after a
/// page was fetched can never appear in it or shift later pages.
pub fn encode(snowflake_id: i64) -> String {
    snowflake_id.to_string()
}

pub fn decode(cursor: &str) -> Result<i64, RepositoryError> {
    cursor
        .trim()
        .parse::<i64>()
        .map_err(|_| RepositoryError::InvalidInput(format!("Invalid cursor: {cursor}")))
}

/// Cursor for the page after `items`, or `None` when the page was short.
/// A full page cannot tell "more rows exist" from "exactly limit rows were
/// left", so callers may see one empty follow-up page; that matches the wire
/// contract clients already rely on.
pub fn page_cursor(items: &[ReportListItem], limit: u64) -> Option<String> {
    if items.len() as u64 >= limit {
        items.last().map(|item| encode(item.snowflake_id))
    } else {
        None
    }
}
