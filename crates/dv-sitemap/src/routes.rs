use std::collections::BTreeSet;

use dv_spec::normalize_route;

use crate::hidden::HiddenRoutes;

/// Sorted, de-duplicated set of public routes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteSet {
    routes: Vec<String>,
}

impl RouteSet {
    /// Merge declared, documentation and bundle routes.
    ///
    /// Each route goes through [`normalize_route`] before de-duplication by
    /// exact string, so `/x/` and `/x` are one entry. The result is sorted.
    /// Hidden routes are dropped unless `include_hidden` is set.
    pub fn compile<'a>(
        declared: impl IntoIterator<Item = &'a str>,
        doc_routes: impl IntoIterator<Item = &'a str>,
        bundle_routes: impl IntoIterator<Item = &'a str>,
        hidden: &HiddenRoutes,
        include_hidden: bool,
    ) -> Self {
        let unique: BTreeSet<&str> = declared
            .into_iter()
            .chain(doc_routes)
            .chain(bundle_routes)
            .map(normalize_route)
            .filter(|route| include_hidden || !hidden.is_hidden(route))
            .collect();

        Self {
            routes: unique.into_iter().map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, route: &str) -> bool {
        self.routes
            .binary_search_by(|r| r.as_str().cmp(normalize_route(route)))
            .is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
