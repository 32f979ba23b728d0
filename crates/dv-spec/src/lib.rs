//! Documentation spec model for dv.
//!
//! This crate provides:
//! - [`FullDocsSpec`] and friends: the authored product/section/document tree
//! - [`validate_value`] / [`validate_spec`]: structural and semantic validation
//!   producing a [`ValidatedSpec`]
//! - [`flatten_spec`] / [`flatten_section`]: resolution of the tree into
//!   ordered [`DocInfo`] records
//! - [`normalize_route`]: the single trailing-slash normalization rule
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dv_spec::{flatten_spec, parse_and_validate};
//!
//! let spec = parse_and_validate(
//!     r#"[{"product": "mirascope", "sections": [
//!         {"slug": "index", "label": "Docs", "children": [
//!             {"slug": "calls", "label": "Calls"}
//!         ]}
//!     ]}]"#,
//! )?;
//!
//! let docs = flatten_spec(&spec);
//! assert_eq!(docs[0].path, "mirascope/calls");
//! assert_eq!(docs[0].route_path, "/docs/mirascope/calls");
//! # Ok(())
//! # }
//! ```

mod flatten;
mod model;
mod route;
mod validate;

pub use flatten::{flatten_section, flatten_spec, section_prefix};
pub use model::{
    DocInfo, DocKind, DocSpec, FullDocsSpec, INDEX_SLUG, ProductName, ProductSpec, SectionSpec,
    UnknownProductError, ValidatedSpec,
};
pub use route::{DOCS_ROUTE_PREFIX, normalize_route};
pub use validate::{
    SpecError, ValidationError, ValidationErrors, parse_and_validate, validate_spec,
    validate_value,
};
