//! LLM text bundles for dv.
//!
//! A bundle ([`LlmContent`]) is a tree whose leaves are document bodies and
//! whose parents concatenate their children. Bundles are declared with
//! [`BundleSpec`]s, resolved against a [`DocRegistry`](dv_registry::DocRegistry)
//! by [`compile_bundles`], and written to disk by [`write_bundle`].

mod builder;
mod bundle;
mod content;
mod error;
mod tokens;
mod writer;

pub use builder::LlmContentBuilder;
pub use bundle::{BundleSource, BundleSpec, compile_bundles};
pub use content::{ContentMeta, LlmContent};
pub use error::LlmError;
pub use tokens::estimate_tokens;
pub use writer::{BundleArtifacts, write_bundle};
