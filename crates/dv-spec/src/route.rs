//! Route path normalization.

/// Root of all documentation routes.
pub const DOCS_ROUTE_PREFIX: &str = "/docs";

/// Normalize a route path by stripping trailing slashes.
///
/// The root route stays `/`, and an empty string is treated as the root.
/// Registry insertion and lookup both go through this function, so
/// `/docs/x` and `/docs/x/` always resolve to the same document.
#[must_use]
pub fn normalize_route(route: &str) -> &str {
    let trimmed = route.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
