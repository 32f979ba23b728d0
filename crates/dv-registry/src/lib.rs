//! Documentation registry for dv.
//!
//! [`DocRegistry`] indexes every document of a validated spec by content path
//! and by public route, and answers product and section queries. It is built
//! once and never mutated; a changed spec produces a new registry.
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dv_registry::DocRegistry;
//!
//! let registry = DocRegistry::from_json(
//!     r#"[{"product": "mirascope", "sections": [
//!         {"slug": "index", "label": "Docs", "children": [
//!             {"slug": "calls", "label": "Calls"}
//!         ]}
//!     ]}]"#,
//! )?;
//!
//! let doc = registry.get_by_route("/docs/mirascope/calls/").unwrap();
//! assert_eq!(doc.path, "mirascope/calls");
//! # Ok(())
//! # }
//! ```

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::DocRegistry;
