//! Content relationship graph for a fact-checking site.
//!
//! This crate provides:
//! - Tag, content node and connection-type models
//! - Parsing and merging of JSON content documents
//! - A read-only graph index: tag lookup, connection traversal, tag-overlap
//!   ranking and a vertex/edge export for visualizations
//! - A consistency report for dangling references and undefined tags

pub mod cache;
pub mod config;
pub mod graph;
pub mod models;
pub mod validate;

pub use cache::CachedGraph;
pub use config::{ConfigError, ContentConfig};
pub use graph::{ContentGraph, GraphEdge, GraphExport, GraphVertex, Related, RelatedLimit};
pub use validate::{ValidationIssue, ValidationReport};
