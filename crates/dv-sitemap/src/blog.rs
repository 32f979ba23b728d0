//! Blog post dates used for `<lastmod>`.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::SitemapError;

/// Route of the blog listing page.
pub const BLOG_ROUTE: &str = "/blog";

/// One entry of the blog index (`[{slug, date, lastUpdated}]`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
}

impl BlogPost {
    /// Last update, falling back to the publication date.
    #[must_use]
    pub fn lastmod(&self) -> NaiveDate {
        self.last_updated.unwrap_or(self.date)
    }
}

/// Per-post `lastmod` lookup.
#[derive(Clone, Debug, Default)]
pub struct BlogDates {
    posts: HashMap<String, NaiveDate>,
    latest: Option<NaiveDate>,
}

impl BlogDates {
    #[must_use]
    pub fn new(posts: &[BlogPost]) -> Self {
        Self {
            posts: posts
                .iter()
                .map(|p| (p.slug.clone(), p.lastmod()))
                .collect(),
            latest: posts.iter().map(BlogPost::lastmod).max(),
        }
    }

    /// Read a blog index JSON file.
    pub fn load(path: &Path) -> Result<Self, SitemapError> {
        let json = std::fs::read_to_string(path).map_err(|source| SitemapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let posts: Vec<BlogPost> =
            serde_json::from_str(&json).map_err(|source| SitemapError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), posts = posts.len(), "Loaded blog index");
        Ok(Self::new(&posts))
    }

    /// `lastmod` of a post by slug.
    #[must_use]
    pub fn post(&self, slug: &str) -> Option<NaiveDate> {
        self.posts.get(slug).copied()
    }

    /// Most recent `lastmod` of any post.
    #[must_use]
    pub fn latest(&self) -> Option<NaiveDate> {
        self.latest
    }

    /// `/blog/<slug>` for every post, sorted.
    ///
    /// The route manifest only declares the dynamic `/blog/$slug` route, so
    /// post routes come from here.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = self
            .posts
            .keys()
            .map(|slug| format!("{BLOG_ROUTE}/{slug}"))
            .collect();
        routes.sort();
        routes
    }
}
