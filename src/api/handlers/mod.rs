use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use factgraph_core::models::{ConnectionType, ContentNode, NodeKind, Tag};
use factgraph_core::{CachedGraph, GraphExport, RelatedLimit, ValidationReport};

// List routes answer unknown ids with an empty list: a renamed slug must
// not break the page asking for its links. Only single-node lookup 404s.

fn owned(nodes: Vec<&ContentNode>) -> Vec<ContentNode> {
    nodes.into_iter().cloned().collect()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tags
// ============================================================

pub async fn list_tags(State(graph): State<CachedGraph>) -> Json<Vec<Tag>> {
    Json(graph.tags().to_vec())
}

pub async fn list_tag_nodes(
    State(graph): State<CachedGraph>,
    Path(id): Path<String>,
) -> Json<Vec<ContentNode>> {
    Json(owned(graph.find_by_tag(&id)))
}

// ============================================================
// Nodes
// ============================================================

/// Query parameters for listing nodes.
#[derive(Debug, Deserialize)]
pub struct ListNodesQuery {
    /// Only nodes of this kind (any string; unknown kinds match verbatim).
    pub kind: Option<String>,
}

pub async fn list_nodes(
    State(graph): State<CachedGraph>,
    Query(query): Query<ListNodesQuery>,
) -> Json<Vec<ContentNode>> {
    match query.kind {
        Some(kind) => Json(owned(graph.nodes_of_kind(&NodeKind::from(kind)))),
        None => Json(graph.nodes().to_vec()),
    }
}

pub async fn get_node(
    State(graph): State<CachedGraph>,
    Path(id): Path<String>,
) -> Result<Json<ContentNode>, (StatusCode, String)> {
    graph
        .node(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Node not found".to_string()))
}

pub async fn list_connections(
    State(graph): State<CachedGraph>,
    Path(id): Path<String>,
) -> Json<Vec<ContentNode>> {
    Json(owned(graph.resolve_connections(&id)))
}

pub async fn list_backlinks(
    State(graph): State<CachedGraph>,
    Path(id): Path<String>,
) -> Json<Vec<ContentNode>> {
    Json(owned(graph.backlinks(&id)))
}

/// Query parameters for related content.
#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    /// Maximum results. Kept as text so junk values fall back to the default
    /// instead of rejecting the request.
    pub limit: Option<String>,
}

/// A related node with its shared-tag count.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelatedNode {
    #[serde(flatten)]
    pub node: ContentNode,
    pub score: usize,
}

pub async fn list_related(
    State(graph): State<CachedGraph>,
    Path(id): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Json<Vec<RelatedNode>> {
    let limit = query
        .limit
        .as_deref()
        .map(RelatedLimit::parse)
        .unwrap_or_default();

    let related = graph
        .related_with_scores(&id, limit.get())
        .into_iter()
        .map(|r| RelatedNode {
            node: r.node.clone(),
            score: r.score,
        })
        .collect();
    Json(related)
}

// ============================================================
// Whole-graph views
// ============================================================

pub async fn export_graph(State(graph): State<CachedGraph>) -> Json<GraphExport> {
    Json(graph.export().clone())
}

pub async fn timeline(State(graph): State<CachedGraph>) -> Json<Vec<ContentNode>> {
    Json(owned(graph.timeline()))
}

pub async fn list_connection_types(
    State(graph): State<CachedGraph>,
) -> Json<Vec<ConnectionType>> {
    Json(graph.connection_types().to_vec())
}

pub async fn validation(State(graph): State<CachedGraph>) -> Json<ValidationReport> {
    Json(graph.validate())
}
