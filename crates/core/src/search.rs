//! Substring search and list pagination helpers.
//!
//! Lives in `core` so the repository layer and the admin console share the
//! same matching and clamping rules.

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Escape character used in every `LIKE ... ESCAPE` clause built from
/// [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Build a `LIKE` pattern matching `needle` anywhere in a column.
///
/// `%`, `_` and the escape character itself are escaped so user input is
/// matched literally.
///
/// # Examples
///
/// ```
/// use expense_core::search::contains_pattern;
/// assert_eq!(contains_pattern("food"), "%food%");
/// assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
