//! Bundle tree.
//!
//! The flat text of a parent is always the in-order concatenation of its
//! children's texts, and every node's token count is computed from its own
//! flat text. Both are fixed at construction.

use dv_spec::DocInfo;
use serde::{Deserialize, Serialize};

use crate::tokens::estimate_tokens;

/// Descriptive fields shared by every bundle node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Public route of the artifact (e.g. `/docs/mirascope/llms-full`).
    pub route: String,
}

impl ContentMeta {
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: description.into(),
            route: route.into(),
        }
    }
}

/// Immutable bundle node: a leaf with text or a parent with children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireContent", try_from = "WireContent")]
pub struct LlmContent {
    meta: ContentMeta,
    text: String,
    tokens: usize,
    children: Option<Vec<LlmContent>>,
}

impl LlmContent {
    /// Leaf holding `text` verbatim.
    #[must_use]
    pub fn from_text(meta: ContentMeta, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tokens: estimate_tokens(&text),
            meta,
            text,
            children: None,
        }
    }

    /// Parent concatenating `children` in list order.
    ///
    /// Tokens are estimated on the joined text, not summed.
    #[must_use]
    pub fn from_children(meta: ContentMeta, children: Vec<Self>) -> Self {
        let text: String = children.iter().map(|c| c.text.as_str()).collect();
        Self {
            tokens: estimate_tokens(&text),
            meta,
            text,
            children: Some(children),
        }
    }

    /// Leaf for one document, framed with its label and route:
    ///
    /// ```text
    /// # {label}
    ///
    /// Source: {route}
    ///
    /// {body}
    ///
    /// ```
    #[must_use]
    pub fn from_document(doc: &DocInfo, body: &str) -> Self {
        let text = format!(
            "# {}\n\nSource: {}\n\n{}\n\n",
            doc.label,
            doc.route_path,
            body.trim()
        );
        let meta = ContentMeta::new(&doc.path, &doc.label, "", &doc.route_path);
        Self::from_text(meta, text)
    }

    #[must_use]
    pub fn meta(&self) -> &ContentMeta {
        &self.meta
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.meta.route
    }

    /// Flat text of this node.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn tokens(&self) -> usize {
        self.tokens
    }

    /// Children of a parent; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Leaves in depth-first order. Their texts concatenate to [`text`](Self::text).
    #[must_use]
    pub fn leaves(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Self>) {
        match &self.children {
            None => out.push(self),
            Some(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Pretty-printed structured form.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rebuild a bundle from its structured form.
    ///
    /// Texts and token counts of parents are recomputed from the leaves.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error for malformed JSON or a node that has
    /// both or neither of `text` and `children`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// JSON shape: `{slug, title, description, route, tokens, text | children}`.
#[derive(Serialize, Deserialize)]
struct WireContent {
    #[serde(flatten)]
    meta: ContentMeta,
    #[serde(default)]
    tokens: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<WireContent>>,
}

impl From<LlmContent> for WireContent {
    fn from(content: LlmContent) -> Self {
        match content.children {
            Some(children) => Self {
                meta: content.meta,
                tokens: content.tokens,
                text: None,
                children: Some(children.into_iter().map(Self::from).collect()),
            },
            None => Self {
                meta: content.meta,
                tokens: content.tokens,
                text: Some(content.text),
                children: None,
            },
        }
    }
}

impl TryFrom<WireContent> for LlmContent {
    type Error = String;

    fn try_from(wire: WireContent) -> Result<Self, Self::Error> {
        match (wire.text, wire.children) {
            (Some(text), None) => Ok(Self::from_text(wire.meta, text)),
            (None, Some(children)) => {
                let children = children
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::from_children(wire.meta, children))
            }
            (Some(_), Some(_)) => Err(format!(
                "bundle node `{}` has both `text` and `children`",
                wire.meta.slug
            )),
            (None, None) => Err(format!(
                "bundle node `{}` has neither `text` nor `children`",
                wire.meta.slug
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use dv_spec::ProductName;
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(super::LlmContent: Send, Sync);

    fn meta(slug: &str) -> ContentMeta {
        ContentMeta::new(slug, slug.to_uppercase(), "", format!("/{slug}"))
    }

    fn leaf(slug: &str, text: &str) -> LlmContent {
        LlmContent::from_text(meta(slug), text)
    }

    #[test]
    fn test_from_children_concatenates_in_order() {
        let parent = LlmContent::from_children(
            meta("all"),
            vec![leaf("a", "A"), leaf("b", "B"), leaf("c", "C")],
        );

        assert_eq!(parent.text(), "ABC");
        assert_eq!(parent.tokens(), estimate_tokens("ABC"));
        assert_eq!(parent.children().len(), 3);
        assert!(!parent.is_leaf());
    }

    #[test]
    fn test_parent_tokens_are_not_summed() {
        // Each leaf rounds up to 1 token; the joined text is 3 chars = 1 token
        let parent =
            LlmContent::from_children(meta("all"), vec![leaf("a", "A"), leaf("b", "B"), leaf("c", "C")]);
        let summed: usize = parent.children().iter().map(LlmContent::tokens).sum();

        assert_eq!(summed, 3);
        assert_eq!(parent.tokens(), 1);
    }

    #[test]
    fn test_empty_parent() {
        let parent = LlmContent::from_children(meta("empty"), Vec::new());
        assert_eq!(parent.text(), "");
        assert_eq!(parent.tokens(), 0);
        assert!(parent.leaves().is_empty());
    }

    #[test]
    fn test_nested_leaves_match_text() {
        let inner = LlmContent::from_children(meta("inner"), vec![leaf("b", "B"), leaf("c", "C")]);
        let outer = LlmContent::from_children(meta("outer"), vec![leaf("a", "A"), inner, leaf("d", "D")]);

        let joined: String = outer.leaves().iter().map(|l| l.text()).collect();
        assert_eq!(joined, outer.text());
        assert_eq!(outer.text(), "ABCD");
    }

    #[test]
    fn test_from_document_framing() {
        let doc = DocInfo {
            label: "Calls".to_owned(),
            slug: "calls".to_owned(),
            product: ProductName::Mirascope,
            section: "index".to_owned(),
            path: "mirascope/calls".to_owned(),
            route_path: "/docs/mirascope/calls".to_owned(),
            weight: 0.0,
            has_children: false,
        };
        let content = LlmContent::from_document(&doc, "\nMake a call.\n\n");

        assert_eq!(
            content.text(),
            "# Calls\n\nSource: /docs/mirascope/calls\n\nMake a call.\n\n"
        );
        assert_eq!(content.slug(), "mirascope/calls");
        assert_eq!(content.route(), "/docs/mirascope/calls");
        assert!(content.is_leaf());
    }

    #[test]
    fn test_json_shape() {
        let parent = LlmContent::from_children(meta("all"), vec![leaf("a", "Hello")]);
        let value: serde_json::Value = serde_json::from_str(&parent.to_json().unwrap()).unwrap();

        assert_eq!(value["slug"], "all");
        assert_eq!(value["route"], "/all");
        assert_eq!(value["tokens"], 2);
        assert!(value.get("text").is_none());
        assert_eq!(value["children"][0]["text"], "Hello");
        assert!(value["children"][0].get("children").is_none());
    }

    #[test]
    fn test_from_json_recomputes_tokens() {
        let json = r#"{
            "slug": "all", "title": "All", "route": "/all", "tokens": 999,
            "children": [{"slug": "a", "title": "A", "route": "/a", "text": "ABCDE"}]
        }"#;
        let content = LlmContent::from_json(json).unwrap();

        assert_eq!(content.text(), "ABCDE");
        assert_eq!(content.tokens(), 2);
        assert_eq!(content.meta().description, "");
    }

    #[test]
    fn test_from_json_rejects_ambiguous_node() {
        let both = r#"{"slug": "x", "title": "X", "route": "/x", "text": "", "children": []}"#;
        let neither = r#"{"slug": "x", "title": "X", "route": "/x"}"#;

        assert!(LlmContent::from_json(both).is_err());
        assert!(LlmContent::from_json(neither).is_err());
    }

    #[test]
    fn test_json_preserves_structure() {
        let inner = LlmContent::from_children(meta("inner"), vec![leaf("b", "B")]);
        let outer = LlmContent::from_children(meta("outer"), vec![leaf("a", "A"), inner]);

        let restored = LlmContent::from_json(&outer.to_json().unwrap()).unwrap();
        assert_eq!(restored, outer);
    }
}
