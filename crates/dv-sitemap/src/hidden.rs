//! Routes kept out of the public route set.

use regex::RegexSet;

use crate::error::SitemapError;

/// Development-only pages.
pub const DEFAULT_HIDDEN_PATTERNS: &[&str] = &[r"^/dev(/.*)?$"];

/// Predicate matching routes that must not be published.
#[derive(Clone, Debug)]
pub struct HiddenRoutes {
    patterns: RegexSet,
}

impl HiddenRoutes {
    /// Compile hidden route patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, SitemapError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: RegexSet::new(patterns)?,
        })
    }

    /// The [`DEFAULT_HIDDEN_PATTERNS`].
    pub fn standard() -> Result<Self, SitemapError> {
        Self::new(DEFAULT_HIDDEN_PATTERNS)
    }

    /// Hide nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            patterns: RegexSet::empty(),
        }
    }

    #[must_use]
    pub fn is_hidden(&self, route: &str) -> bool {
        self.patterns.is_match(route)
    }
}
