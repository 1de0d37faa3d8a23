use serde::{Deserialize, Serialize};

/// Descriptive vocabulary for typed relationships.
///
/// Connection references on nodes are untyped, so nothing attaches these to
/// edges yet. They are loaded and served so front ends can render a legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionType {
    pub id: String,
    pub label: String,
    pub color: String,
    pub description: String,
}

/// Connection type definition as it appears in a content document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTypeDefinition {
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl ConnectionTypeDefinition {
    pub fn into_connection_type(self, id: String) -> ConnectionType {
        ConnectionType {
            id,
            label: self.label,
            color: self.color,
            description: self.description,
        }
    }
}
