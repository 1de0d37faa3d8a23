//! Consistency check for a loaded graph.
//!
//! Queries tolerate dangling references and unknown tags by design, which
//! also means a typo in a slug never surfaces on its own. This report lists
//! them so a loader can log or refuse a broken content set at startup.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::graph::ContentGraph;
use crate::models::ERA_CATEGORY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// A connection names a node that does not exist.
    DanglingConnection { node: String, target: String },
    /// A node carries a tag with no definition.
    UnknownTag { node: String, tag: String },
    /// A node's era has no matching `era:<value>` tag.
    UnknownEra { node: String, era: String },
    /// A node lists itself as a connection.
    SelfConnection { node: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingConnection { node, target } => {
                write!(f, "{}: connection to missing node '{}'", node, target)
            }
            Self::UnknownTag { node, tag } => write!(f, "{}: undefined tag '{}'", node, tag),
            Self::UnknownEra { node, era } => {
                write!(f, "{}: era '{}' has no {}:{} tag", node, era, ERA_CATEGORY, era)
            }
            Self::SelfConnection { node } => write!(f, "{}: connects to itself", node),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn dangling(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, ValidationIssue::DanglingConnection { .. }))
    }
}

impl ContentGraph {
    /// Walk every node and report inconsistencies, in node order.
    pub fn validate(&self) -> ValidationReport {
        let eras: HashSet<&str> = self
            .tags()
            .iter()
            .filter(|t| t.category() == Some(ERA_CATEGORY))
            .map(|t| t.value())
            .collect();

        let mut issues = Vec::new();
        for node in self.nodes() {
            let mut seen_tags = HashSet::new();
            for tag in &node.tags {
                if seen_tags.insert(tag.as_str()) && self.tag(tag).is_none() {
                    issues.push(ValidationIssue::UnknownTag {
                        node: node.id.clone(),
                        tag: tag.clone(),
                    });
                }
            }

            if let Some(era) = &node.era {
                if !eras.contains(era.as_str()) {
                    issues.push(ValidationIssue::UnknownEra {
                        node: node.id.clone(),
                        era: era.clone(),
                    });
                }
            }

            for target in &node.connections {
                if *target == node.id {
                    issues.push(ValidationIssue::SelfConnection {
                        node: node.id.clone(),
                    });
                } else if !self.contains(target) {
                    issues.push(ValidationIssue::DanglingConnection {
                        node: node.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        ValidationReport { issues }
    }
}
