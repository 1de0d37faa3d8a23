use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use crate::graph::{ContentGraph, GraphExport};

/// Memoizes [`ContentGraph::export_graph`] for long-lived consumers.
///
/// The graph is immutable, so the export never goes stale. All other
/// queries pass straight through via `Deref`.
#[derive(Debug, Clone)]
pub struct CachedGraph {
    graph: Arc<ContentGraph>,
    export: Arc<OnceLock<GraphExport>>,
}

impl CachedGraph {
    pub fn new(graph: impl Into<Arc<ContentGraph>>) -> Self {
        Self {
            graph: graph.into(),
            export: Arc::new(OnceLock::new()),
        }
    }

    pub fn export(&self) -> &GraphExport {
        self.export.get_or_init(|| {
            tracing::debug!("Computing graph export for {} nodes", self.graph.len());
            self.graph.export_graph()
        })
    }

    pub fn graph(&self) -> &Arc<ContentGraph> {
        &self.graph
    }
}

impl Deref for CachedGraph {
    type Target = ContentGraph;

    fn deref(&self) -> &ContentGraph {
        &self.graph
    }
}
