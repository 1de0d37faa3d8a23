//! Plain-text rendering of a node's neighborhood for the CLI.

use factgraph_core::models::{ContentNode, NodeKind};
use factgraph_core::ContentGraph;

const REPORT: char = '■';
const EXPERIENCE: char = '●';
const GLOSSARY: char = '◆';
const OTHER: char = '○';

/// Get the symbol for a node kind.
fn kind_symbol(kind: &NodeKind) -> char {
    match kind {
        NodeKind::Report => REPORT,
        NodeKind::ExperienceNode => EXPERIENCE,
        NodeKind::Glossary => GLOSSARY,
        NodeKind::Other(_) => OTHER,
    }
}

/// One line of a rendered tree and the lines nested under it.
#[derive(Debug, Clone)]
pub struct TreeLine {
    pub label: String,
    pub children: Vec<TreeLine>,
}

impl TreeLine {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }

    fn node(node: &ContentNode, suffix: Option<String>) -> Self {
        let mut label = format!("{} {}", kind_symbol(&node.kind), node.title);
        if let Some(suffix) = suffix {
            label.push(' ');
            label.push_str(&suffix);
        }
        Self::leaf(label)
    }
}

/// Build the neighborhood tree for `node_id`: resolved connections, related
/// nodes with their shared-tag counts, and backlinks. Empty sections are
/// left out. Unknown ids yield `None`.
pub fn neighborhood(graph: &ContentGraph, node_id: &str, limit: usize) -> Option<TreeLine> {
    let node = graph.node(node_id)?;

    let mut sections = Vec::new();
    let connections: Vec<_> = graph
        .resolve_connections(node_id)
        .into_iter()
        .map(|n| TreeLine::node(n, None))
        .collect();
    if !connections.is_empty() {
        sections.push(TreeLine {
            label: "connections".to_string(),
            children: connections,
        });
    }

    let related: Vec<_> = graph
        .related_with_scores(node_id, limit)
        .into_iter()
        .map(|r| TreeLine::node(r.node, Some(format!("[{}]", r.score))))
        .collect();
    if !related.is_empty() {
        sections.push(TreeLine {
            label: "related".to_string(),
            children: related,
        });
    }

    let backlinks: Vec<_> = graph
        .backlinks(node_id)
        .into_iter()
        .map(|n| TreeLine::node(n, None))
        .collect();
    if !backlinks.is_empty() {
        sections.push(TreeLine {
            label: "backlinks".to_string(),
            children: backlinks,
        });
    }

    Some(TreeLine {
        label: format!("{} ({})", node.title, node.id),
        children: sections,
    })
}

/// Render trees as ASCII art.
///
/// Example output:
/// ```text
/// Inside the troll farm (troll-farm)
/// ├── connections
/// │   └── ● 2016 election
/// └── related
///     ├── ● 2016 election [2]
///     └── ◆ Botnet [1]
/// ```
pub fn render_tree(roots: &[TreeLine]) -> String {
    let mut output = String::new();
    for (i, root) in roots.iter().enumerate() {
        let is_last = i == roots.len() - 1;
        render_line(&mut output, root, "", is_last, true);
    }
    output
}

/// Render a flat list of nodes, one per line.
pub fn render_list(nodes: &[&ContentNode]) -> String {
    let mut output = String::new();
    for node in nodes {
        output.push(kind_symbol(&node.kind));
        output.push(' ');
        output.push_str(&node.title);
        output.push_str(" (");
        output.push_str(&node.url);
        output.push_str(")\n");
    }
    output
}

fn render_line(output: &mut String, line: &TreeLine, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&line.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&line.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in line.children.iter().enumerate() {
        let child_is_last = i == line.children.len() - 1;
        render_line(output, child, &child_prefix, child_is_last, false);
    }
}
