//! Read-side index over an immutable set of tags and content nodes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::ContentConfig;
use crate::models::{split_tag_id, ConnectionType, ContentNode, NodeKind, Tag, ERA_CATEGORY};

/// Number of related nodes returned when the caller gives no usable limit.
pub const DEFAULT_RELATED_LIMIT: usize = 5;

/// Vertex color for nodes without a resolvable era tag.
pub const FALLBACK_COLOR: &str = "#95a5a6";

/// Relation label on exported edges. Base connections are untyped.
pub const DEFAULT_RELATION: &str = "related";

/// A requested result count, normalized so bad input falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedLimit(usize);

impl RelatedLimit {
    /// Non-finite or below-one values become the default; others are floored.
    pub fn from_raw(raw: f64) -> Self {
        if !raw.is_finite() || raw < 1.0 {
            return Self::default();
        }
        if raw >= usize::MAX as f64 {
            return Self(usize::MAX);
        }
        Self(raw.floor() as usize)
    }

    pub fn parse(s: &str) -> Self {
        s.trim()
            .parse::<f64>()
            .map(Self::from_raw)
            .unwrap_or_default()
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RelatedLimit {
    fn default() -> Self {
        Self(DEFAULT_RELATED_LIMIT)
    }
}

impl From<usize> for RelatedLimit {
    fn from(n: usize) -> Self {
        if n == 0 {
            Self::default()
        } else {
            Self(n)
        }
    }
}

/// A related node together with the number of tags it shares with the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Related<'a> {
    pub node: &'a ContentNode,
    pub score: usize,
}

/// Vertex of the visualization export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphVertex {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    pub tags: Vec<String>,
    pub url: String,
    pub color: String,
}

/// Edge of the visualization export. Only resolvable connections appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphVertex>,
    pub edges: Vec<GraphEdge>,
}

/// Immutable content graph.
///
/// Built once from tags and nodes, then only queried. Every lookup is total:
/// an unknown identifier or a dangling connection yields an empty result,
/// never an error, so a renamed slug cannot break a page that links to it.
#[derive(Debug, Clone, Default)]
pub struct ContentGraph {
    tags: Vec<Tag>,
    tag_index: HashMap<String, usize>,
    nodes: Vec<ContentNode>,
    node_index: HashMap<String, usize>,
    /// tag id -> positions of nodes carrying it, ascending.
    nodes_by_tag: HashMap<String, Vec<usize>>,
    /// era value -> color of its `era:<value>` tag.
    era_colors: HashMap<String, String>,
    connection_types: Vec<ConnectionType>,
}

impl ContentGraph {
    /// Build a graph from tags and nodes in declaration order.
    ///
    /// A repeated identifier replaces the earlier definition but keeps the
    /// earlier position.
    pub fn from_parts<T, N>(tags: T, nodes: N) -> Self
    where
        T: IntoIterator<Item = Tag>,
        N: IntoIterator<Item = ContentNode>,
    {
        let mut graph = Self::default();

        for tag in tags {
            match graph.tag_index.get(&tag.id) {
                Some(&pos) => {
                    tracing::warn!("Duplicate tag {}, keeping the later definition", tag.id);
                    graph.tags[pos] = tag;
                }
                None => {
                    graph.tag_index.insert(tag.id.clone(), graph.tags.len());
                    graph.tags.push(tag);
                }
            }
        }

        for node in nodes {
            match graph.node_index.get(&node.id) {
                Some(&pos) => {
                    tracing::warn!("Duplicate node {}, keeping the later definition", node.id);
                    graph.nodes[pos] = node;
                }
                None => {
                    graph.node_index.insert(node.id.clone(), graph.nodes.len());
                    graph.nodes.push(node);
                }
            }
        }

        graph.build_indexes();
        tracing::debug!(
            "Content graph built: {} tags, {} nodes",
            graph.tags.len(),
            graph.nodes.len()
        );
        graph
    }

    pub fn from_config(config: ContentConfig) -> Self {
        let tags: Vec<Tag> = config
            .tags
            .into_iter()
            .map(|(id, def)| Tag {
                id,
                label: def.label,
                color: def.color,
            })
            .collect();
        let nodes: Vec<ContentNode> = config
            .nodes
            .into_iter()
            .map(|(id, def)| def.into_node(id))
            .collect();
        let connection_types = config
            .connection_types
            .into_iter()
            .map(|(id, def)| def.into_connection_type(id))
            .collect();

        Self::from_parts(tags, nodes).with_connection_types(connection_types)
    }

    pub fn with_connection_types(mut self, connection_types: Vec<ConnectionType>) -> Self {
        self.connection_types = connection_types;
        self
    }

    fn build_indexes(&mut self) {
        self.nodes_by_tag.clear();
        for (pos, node) in self.nodes.iter().enumerate() {
            for tag in &node.tags {
                let positions = self.nodes_by_tag.entry(tag.clone()).or_default();
                // A node listing a tag twice is indexed once.
                if positions.last() != Some(&pos) {
                    positions.push(pos);
                }
            }
        }

        self.era_colors = self
            .tags
            .iter()
            .filter_map(|tag| match split_tag_id(&tag.id) {
                (Some(ERA_CATEGORY), era) => Some((era.to_string(), tag.color.clone())),
                _ => None,
            })
            .collect();
    }

    // ============================================================
    // Lookups
    // ============================================================

    pub fn node(&self, id: &str) -> Option<&ContentNode> {
        self.node_index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tag_index.get(id).map(|&pos| &self.tags[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn connection_types(&self) -> &[ConnectionType] {
        &self.connection_types
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes_of_kind(&self, kind: &NodeKind) -> Vec<&ContentNode> {
        self.nodes.iter().filter(|n| &n.kind == kind).collect()
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Nodes carrying `tag_id`, in declaration order.
    pub fn find_by_tag(&self, tag_id: &str) -> Vec<&ContentNode> {
        self.nodes_by_tag
            .get(tag_id)
            .map(|positions| positions.iter().map(|&pos| &self.nodes[pos]).collect())
            .unwrap_or_default()
    }

    /// Nodes referenced by `node_id`'s connection list, in declared order.
    /// Dangling references are skipped.
    pub fn resolve_connections(&self, node_id: &str) -> Vec<&ContentNode> {
        let Some(node) = self.node(node_id) else {
            return Vec::new();
        };
        node.connections
            .iter()
            .filter_map(|target| self.node(target))
            .collect()
    }

    /// Nodes whose connection lists reference `node_id`, each listed once.
    pub fn backlinks(&self, node_id: &str) -> Vec<&ContentNode> {
        if !self.contains(node_id) {
            return Vec::new();
        }
        self.nodes
            .iter()
            .filter(|n| n.connections.iter().any(|c| c == node_id))
            .collect()
    }

    /// Nodes ranked by how many tags they share with `node_id`.
    pub fn related_by_tag_overlap(
        &self,
        node_id: &str,
        limit: usize,
    ) -> Vec<&ContentNode> {
        self.related_with_scores(node_id, limit)
            .into_iter()
            .map(|r| r.node)
            .collect()
    }

    /// Ranked related nodes with their overlap scores.
    ///
    /// Zero-score nodes and the source itself are excluded. Ties keep
    /// declaration order. A `limit` of 0 means [`DEFAULT_RELATED_LIMIT`].
    pub fn related_with_scores(&self, node_id: &str, limit: usize) -> Vec<Related<'_>> {
        let limit = RelatedLimit::from(limit).get();
        let Some(source) = self.node(node_id) else {
            return Vec::new();
        };
        let source_tags: HashSet<&str> = source.tags.iter().map(String::as_str).collect();
        if source_tags.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<Related<'_>> = self
            .nodes
            .iter()
            .filter(|n| n.id != source.id)
            .filter_map(|n| {
                let own: HashSet<&str> = n.tags.iter().map(String::as_str).collect();
                let score = own.intersection(&source_tags).count();
                (score > 0).then_some(Related { node: n, score })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    /// Nodes with a year, oldest first. Same-year nodes keep declaration order.
    pub fn timeline(&self) -> Vec<&ContentNode> {
        let mut dated: Vec<&ContentNode> = self.nodes.iter().filter(|n| n.year.is_some()).collect();
        dated.sort_by_key(|n| n.year);
        dated
    }

    /// Display color for a node: its era tag's color, or the fallback.
    pub fn vertex_color(&self, node: &ContentNode) -> &str {
        node.era
            .as_deref()
            .and_then(|era| self.era_colors.get(era))
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Visualization-ready vertex/edge lists. Recomputed on every call.
    pub fn export_graph(&self) -> GraphExport {
        let nodes = self
            .nodes
            .iter()
            .map(|n| GraphVertex {
                id: n.id.clone(),
                name: n.title.clone(),
                kind: n.kind.clone(),
                year: n.year,
                era: n.era.clone(),
                tags: n.tags.clone(),
                url: n.url.clone(),
                color: self.vertex_color(n).to_string(),
            })
            .collect();

        let edges = self
            .nodes
            .iter()
            .flat_map(|n| {
                n.connections
                    .iter()
                    .filter(|target| self.contains(target))
                    .map(move |target| GraphEdge {
                        source: n.id.clone(),
                        target: target.clone(),
                        relation: DEFAULT_RELATION.to_string(),
                    })
            })
            .collect();

        GraphExport { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, tags: &[&str], connections: &[&str]) -> ContentNode {
        ContentNode::new(id, NodeKind::Report, id.to_uppercase())
            .with_tags(tags.iter().copied())
            .with_connections(connections.iter().copied())
    }

    fn ids(nodes: &[&ContentNode]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn limit_normalization() {
        assert_eq!(RelatedLimit::from_raw(0.0).get(), DEFAULT_RELATED_LIMIT);
        assert_eq!(RelatedLimit::from_raw(-3.0).get(), DEFAULT_RELATED_LIMIT);
        assert_eq!(RelatedLimit::from_raw(f64::NAN).get(), DEFAULT_RELATED_LIMIT);
        assert_eq!(RelatedLimit::from_raw(f64::INFINITY).get(), DEFAULT_RELATED_LIMIT);
        assert_eq!(RelatedLimit::from_raw(2.9).get(), 2);
        assert_eq!(RelatedLimit::parse("abc").get(), DEFAULT_RELATED_LIMIT);
        assert_eq!(RelatedLimit::parse(" 3 ").get(), 3);
        assert_eq!(RelatedLimit::from(0).get(), DEFAULT_RELATED_LIMIT);
    }

    #[test]
    fn duplicate_tag_in_node_counts_once() {
        let graph = ContentGraph::from_parts(
            vec![],
            vec![node("a", &["x", "x", "y"], &[]), node("b", &["x"], &[])],
        );
        assert_eq!(ids(&graph.find_by_tag("x")), vec!["a", "b"]);
        let related = graph.related_with_scores("a", 5);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].score, 1);
    }

    #[test]
    fn duplicate_node_keeps_first_position_later_value() {
        let graph = ContentGraph::from_parts(
            vec![],
            vec![
                node("a", &["x"], &[]),
                node("b", &["x"], &[]),
                node("a", &["y"], &[]),
            ],
        );
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[0].id, "a");
        assert_eq!(graph.nodes()[0].tags, vec!["y"]);
        assert_eq!(ids(&graph.find_by_tag("x")), vec!["b"]);
    }

    #[test]
    fn ties_keep_declaration_order() {
        let graph = ContentGraph::from_parts(
            vec![],
            vec![
                node("src", &["x", "y"], &[]),
                node("c", &["x"], &[]),
                node("b", &["x", "y"], &[]),
                node("a", &["y"], &[]),
            ],
        );
        assert_eq!(
            ids(&graph.related_by_tag_overlap("src", 5)),
            vec!["b", "c", "a"]
        );
        assert_eq!(ids(&graph.related_by_tag_overlap("src", 2)), vec!["b", "c"]);
    }

    #[test]
    fn era_color_join_with_fallback() {
        let graph = ContentGraph::from_parts(
            vec![
                Tag::new("era:cold-war", "Cold War", "#34495e"),
                Tag::new("actor:cold-war", "Not an era", "#ffffff"),
            ],
            vec![
                node("a", &[], &[]).with_era("cold-war"),
                node("b", &[], &[]).with_era("post-soviet"),
                node("c", &[], &[]),
            ],
        );
        let export = graph.export_graph();
        let colors: Vec<_> = export.nodes.iter().map(|v| v.color.as_str()).collect();
        assert_eq!(colors, vec!["#34495e", FALLBACK_COLOR, FALLBACK_COLOR]);
    }

    #[test]
    fn backlinks_list_each_source_once() {
        let graph = ContentGraph::from_parts(
            vec![],
            vec![
                node("a", &[], &["c", "c"]),
                node("b", &[], &["c"]),
                node("c", &[], &[]),
            ],
        );
        assert_eq!(ids(&graph.backlinks("c")), vec!["a", "b"]);
        assert!(graph.backlinks("missing").is_empty());
    }

    #[test]
    fn timeline_orders_by_year_stably() {
        let graph = ContentGraph::from_parts(
            vec![],
            vec![
                node("late", &[], &[]).with_year(2016),
                node("undated", &[], &[]),
                node("early", &[], &[]).with_year(1959),
                node("also-late", &[], &[]).with_year(2016),
            ],
        );
        assert_eq!(
            ids(&graph.timeline()),
            vec!["early", "late", "also-late"]
        );
    }

    #[test]
    fn export_vertex_serializes_expected_keys() {
        let graph = ContentGraph::from_parts(vec![], vec![node("a", &["x"], &[])]);
        let json = serde_json::to_value(graph.export_graph()).unwrap();
        let vertex = &json["nodes"][0];
        assert_eq!(vertex["id"], "a");
        assert_eq!(vertex["name"], "A");
        assert_eq!(vertex["kind"], "report");
        assert_eq!(vertex["url"], "/a");
        assert!(vertex.get("year").is_none());
        assert_eq!(json["edges"], serde_json::json!([]));
    }
}
