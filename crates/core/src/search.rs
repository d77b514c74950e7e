//! Free-text search and pagination helpers shared by list endpoints.

/// Split user input into search tokens.
///
/// Tokens are whitespace separated; each one must match at least one of the
/// searched columns (AND across tokens, OR across columns).
pub fn tokenize(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Wrap a token for a substring `LIKE` match.
pub fn like_term(token: &str) -> String {
    format!("%{token}%")
}

/// Total number of pages for `total` rows, never less than one.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// Clamp a requested page number into `[1, total_pages]`.
pub fn clamp_page(requested: Option<i64>, total_pages: i64) -> i64 {
    requested.unwrap_or(1).min(total_pages).max(1)
}

/// Row offset of a 1-based page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1) * per_page
}
