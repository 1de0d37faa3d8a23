use serde::{Deserialize, Serialize};

/// Category prefix used by era tags (`era:<value>`).
pub const ERA_CATEGORY: &str = "era";

/// A topic label attached to content nodes.
///
/// Identifiers are namespaced by category, e.g. `actor:russia`. The category
/// is advisory: nothing checks that a prefix belongs to a known set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub label: String,
    /// Hex color, only used by visualizations.
    pub color: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }

    /// Category prefix before the first `:`, if any.
    pub fn category(&self) -> Option<&str> {
        split_tag_id(&self.id).0
    }

    /// Freeform part after the category prefix (the whole id when unprefixed).
    pub fn value(&self) -> &str {
        split_tag_id(&self.id).1
    }
}

/// Split a tag identifier into `(category, value)` on the first `:`.
pub fn split_tag_id(id: &str) -> (Option<&str>, &str) {
    match id.split_once(':') {
        Some((category, value)) => (Some(category), value),
        None => (None, id),
    }
}

/// Tag definition as it appears in a content document, keyed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDefinition {
    pub label: String,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_category_on_first_colon() {
        let tag = Tag::new("actor:russia:state", "Russian state", "#c0392b");
        assert_eq!(tag.category(), Some("actor"));
        assert_eq!(tag.value(), "russia:state");
    }

    #[test]
    fn unprefixed_tag_has_no_category() {
        let tag = Tag::new("misc", "Misc", "#000000");
        assert_eq!(tag.category(), None);
        assert_eq!(tag.value(), "misc");
    }
}
