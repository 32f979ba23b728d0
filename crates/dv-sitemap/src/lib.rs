//! Route compilation and sitemap generation for dv.
//!
//! The public route set is the union of three sources:
//! - routes declared by the site (a [`RouteManifest`])
//! - documentation routes from the registry
//! - LLM bundle routes
//!
//! [`RouteSet::compile`] merges them, drops hidden routes and sorts the
//! result; [`Sitemap`] renders it as `sitemap.xml`.

mod blog;
mod error;
mod hidden;
mod manifest;
mod routes;
mod sitemap;

pub use blog::{BLOG_ROUTE, BlogDates, BlogPost};
pub use error::SitemapError;
pub use hidden::{DEFAULT_HIDDEN_PATTERNS, HiddenRoutes};
pub use manifest::{REDIRECT_ROUTES, RouteManifest, RouteTreeManifest, StaticRoutes};
pub use routes::RouteSet;
pub use sitemap::{ChangeFreq, SITEMAP_NAMESPACE, Sitemap, SitemapEntry};
