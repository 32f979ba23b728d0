//! Static build pipeline for dv.
//!
//! [`SiteBuilder::build`] turns a content directory into publishable
//! artifacts:
//!
//! ```text
//! <out>/static/docs-spec.json              validated docs spec
//! <out>/<bundle route>.txt                 LLM bundle text
//! <out>/static/content/<bundle route>.json LLM bundle tree
//! <out>/sitemap.xml                        every public route
//! ```
//!
//! Every build starts from a fresh registry; nothing is carried over from a
//! previous run.

mod builder;
mod config;
mod error;

pub use builder::{BuildReport, BundleSummary, SiteBuilder};
pub use config::BuildConfig;
pub use error::BuildError;
