//! Reads content documents from disk and merges them into one graph.

use std::path::{Path, PathBuf};

use factgraph_core::{ConfigError, ContentConfig, ContentGraph, ValidationReport};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No content files given")]
    NoSources,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Content set has {} consistency issue(s)", .0.issues.len())]
    Inconsistent(ValidationReport),
}

/// Parse one content document.
pub fn read_document(path: &Path) -> Result<ContentConfig, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ContentConfig::from_json_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every document in order and merge them; later files win on
/// identifier clashes.
pub fn load_config<P: AsRef<Path>>(paths: &[P]) -> Result<ContentConfig, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoSources);
    }
    let mut merged = ContentConfig::default();
    for path in paths {
        let path = path.as_ref();
        let doc = read_document(path)?;
        tracing::debug!(
            "Loaded {}: {} tags, {} nodes",
            path.display(),
            doc.tags.len(),
            doc.nodes.len()
        );
        merged.merge(doc);
    }
    Ok(merged)
}

/// Load, merge and index the content set, returning its consistency report
/// without logging it. For callers that present the issues themselves.
pub fn load_checked<P: AsRef<Path>>(
    paths: &[P],
) -> Result<(ContentGraph, ValidationReport), LoadError> {
    let graph = ContentGraph::from_config(load_config(paths)?);
    let report = graph.validate();
    Ok((graph, report))
}

/// Load, merge and index the content set.
///
/// Consistency issues are logged. With `strict` set they are returned as
/// [`LoadError::Inconsistent`] instead.
pub fn load_graph<P: AsRef<Path>>(paths: &[P], strict: bool) -> Result<ContentGraph, LoadError> {
    let (graph, report) = load_checked(paths)?;

    if strict && !report.is_clean() {
        return Err(LoadError::Inconsistent(report));
    }
    for issue in &report.issues {
        tracing::warn!("Content issue: {}", issue);
    }

    tracing::info!(
        "Content graph ready: {} nodes, {} tags from {} file(s)",
        graph.len(),
        graph.tags().len(),
        paths.len()
    );
    Ok(graph)
}
