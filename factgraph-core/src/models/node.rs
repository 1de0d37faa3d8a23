use serde::{Deserialize, Serialize};

/// Classification of a content node.
///
/// The three kinds the site publishes are named variants; anything else is
/// kept verbatim in `Other` so new content types load without a code change.
/// Consumers must handle `Other` rather than assume the list is exhaustive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Long-form fact-check report
    Report,
    /// Timeline event
    ExperienceNode,
    /// Glossary entry
    Glossary,
    /// Unrecognized kind, preserved as written
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Report => "report",
            Self::ExperienceNode => "experience-node",
            Self::Glossary => "glossary",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "report" => Self::Report,
            "experience-node" => Self::ExperienceNode,
            "glossary" => Self::Glossary,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of published content with outbound connection references.
///
/// Connections are slugs of other nodes, declared one way only. A reference
/// to a slug that is not in the registry is kept here as written; every
/// derived view drops it when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
    pub year: Option<i32>,
    pub era: Option<String>,
    pub connections: Vec<String>,
}

impl ContentNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: format!("/{}", id),
            id,
            kind,
            title: title.into(),
            tags: Vec::new(),
            year: None,
            era: None,
            connections: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_connections<I, S>(mut self, connections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connections = connections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_era(mut self, era: impl Into<String>) -> Self {
        self.era = Some(era.into());
        self
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t == tag_id)
    }
}

/// Node definition as it appears in a content document, keyed by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    #[serde(rename = "type", alias = "kind")]
    pub kind: NodeKind,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(default)]
    pub connections: Vec<String>,
}

impl NodeDefinition {
    pub fn into_node(self, id: String) -> ContentNode {
        ContentNode {
            id,
            kind: self.kind,
            title: self.title,
            url: self.url,
            tags: self.tags,
            year: self.year,
            era: self.era,
            connections: self.connections,
        }
    }
}
