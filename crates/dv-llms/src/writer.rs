//! Bundle artifacts on disk.
//!
//! A bundle with route `/docs/mirascope/llms-full` produces:
//! - `<out>/docs/mirascope/llms-full.txt`: the flat text
//! - `<out>/static/content/docs/mirascope/llms-full.json`: the structured tree

use std::fs;
use std::path::{Path, PathBuf};

use dv_spec::normalize_route;

use crate::content::LlmContent;
use crate::error::LlmError;

/// Directory (under the output root) holding structured bundle JSON.
const JSON_DIR: &str = "static/content";

/// Files written for one bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleArtifacts {
    pub text_path: PathBuf,
    pub json_path: PathBuf,
}

/// Write the text and JSON artifacts of a bundle.
///
/// # Errors
///
/// Returns [`LlmError::InvalidRoute`] if the route can't be mapped to a file
/// inside `out_dir`, or a write/serialization error.
pub fn write_bundle(content: &LlmContent, out_dir: &Path) -> Result<BundleArtifacts, LlmError> {
    let rel = route_to_relative(content.route())?;
    let text_path = out_dir.join(format!("{rel}.txt"));
    let json_path = out_dir.join(JSON_DIR).join(format!("{rel}.json"));

    write_file(&text_path, content.text())?;
    write_file(&json_path, &content.to_json()?)?;

    tracing::info!(
        bundle = %content.slug(),
        path = %text_path.display(),
        tokens = content.tokens(),
        "Wrote bundle"
    );
    Ok(BundleArtifacts {
        text_path,
        json_path,
    })
}

/// `/docs/mirascope/llms-full/` -> `docs/mirascope/llms-full`.
fn route_to_relative(route: &str) -> Result<&str, LlmError> {
    let rel = normalize_route(route).trim_start_matches('/');
    let valid = route.starts_with('/')
        && !rel.is_empty()
        && rel
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(rel)
    } else {
        Err(LlmError::InvalidRoute(route.to_owned()))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), LlmError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };
    write().map_err(|source| LlmError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::content::ContentMeta;

    fn bundle(route: &str) -> LlmContent {
        let leaf = LlmContent::from_text(ContentMeta::new("a", "A", "", "/a"), "Alpha\n");
        let leaf2 = LlmContent::from_text(ContentMeta::new("b", "B", "", "/b"), "Beta\n");
        LlmContent::from_children(ContentMeta::new("all", "All", "Everything", route), vec![leaf, leaf2])
    }

    #[test]
    fn test_write_bundle_paths_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let content = bundle("/docs/mirascope/llms-full");

        let artifacts = write_bundle(&content, dir.path()).unwrap();

        assert_eq!(artifacts.text_path, dir.path().join("docs/mirascope/llms-full.txt"));
        assert_eq!(
            artifacts.json_path,
            dir.path().join("static/content/docs/mirascope/llms-full.json")
        );
        assert_eq!(fs::read_to_string(&artifacts.text_path).unwrap(), "Alpha\nBeta\n");

        let restored =
            LlmContent::from_json(&fs::read_to_string(&artifacts.json_path).unwrap()).unwrap();
        let leaf_text: String = restored.leaves().iter().map(|l| l.text()).collect();
        assert_eq!(leaf_text, fs::read_to_string(&artifacts.text_path).unwrap());
    }

    #[test]
    fn test_top_level_route() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = write_bundle(&bundle("/llms-full/"), dir.path()).unwrap();
        assert_eq!(artifacts.text_path, dir.path().join("llms-full.txt"));
    }

    #[test]
    fn test_invalid_routes() {
        for route in ["", "/", "llms-full", "/docs/../etc", "/docs//x"] {
            assert!(
                matches!(route_to_relative(route), Err(LlmError::InvalidRoute(_))),
                "{route}"
            );
        }
    }
}
