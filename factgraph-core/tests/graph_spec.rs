use factgraph_core::models::*;
use factgraph_core::{ContentConfig, ContentGraph};
use speculate2::speculate;

fn ids(nodes: &[&ContentNode]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

/// A: tags [x, y], connections [B, Z]; B: tags [y]; Z is never defined.
fn scenario() -> ContentGraph {
    ContentGraph::from_parts(
        vec![Tag::new("x", "X", "#111111"), Tag::new("y", "Y", "#222222")],
        vec![
            ContentNode::new("A", NodeKind::Report, "Report A")
                .with_tags(["x", "y"])
                .with_connections(["B", "Z"]),
            ContentNode::new("B", NodeKind::ExperienceNode, "Event B").with_tags(["y"]),
        ],
    )
}

fn newsroom() -> ContentGraph {
    let config = ContentConfig::from_json_str(
        r##"{
            "tags": {
                "actor:russia": { "label": "Russia", "color": "#c0392b" },
                "topic:elections": { "label": "Elections", "color": "#2980b9" },
                "topic:bots": { "label": "Bots", "color": "#8e44ad" },
                "era:post-soviet": { "label": "Post-Soviet", "color": "#16a085" }
            },
            "connectionTypes": {
                "causal": { "label": "Caused", "color": "#e67e22", "description": "One event led to another" }
            },
            "nodes": {
                "troll-farm": {
                    "type": "report", "title": "Troll farm", "url": "/reports/troll-farm.html",
                    "tags": ["actor:russia", "topic:elections", "topic:bots"],
                    "connections": ["election-2016", "missing-report"]
                },
                "election-2016": {
                    "type": "experience-node", "title": "2016 election", "url": "/timeline#2016",
                    "tags": ["topic:elections", "actor:russia"], "year": 2016, "era": "post-soviet",
                    "connections": ["troll-farm"]
                },
                "botnet": {
                    "type": "glossary", "title": "Botnet", "url": "/glossary#botnet",
                    "tags": ["topic:bots"]
                },
                "explainer": {
                    "type": "video", "title": "Explainer", "url": "/videos/explainer",
                    "tags": ["topic:elections"]
                },
                "about": {
                    "type": "report", "title": "About us", "url": "/about.html"
                }
            }
        }"##,
    )
    .expect("Failed to parse content document");
    ContentGraph::from_config(config)
}

speculate! {
    before {
        let graph = scenario();
    }

    describe "find_by_tag" {
        it "returns nodes carrying the tag" {
            assert_eq!(ids(&graph.find_by_tag("x")), vec!["A"]);
            assert_eq!(ids(&graph.find_by_tag("y")), vec!["A", "B"]);
        }

        it "returns empty for an unknown tag" {
            assert!(graph.find_by_tag("actor:nobody").is_empty());
            assert!(graph.find_by_tag("").is_empty());
        }

        it "is sound and complete for every tag in use" {
            let graph = newsroom();
            for tag in graph.nodes().iter().flat_map(|n| n.tags.iter()) {
                let found = ids(&graph.find_by_tag(tag));
                for node in graph.nodes() {
                    assert_eq!(found.contains(&node.id), node.has_tag(tag));
                }
            }
        }
    }

    describe "resolve_connections" {
        it "drops dangling references" {
            assert_eq!(ids(&graph.resolve_connections("A")), vec!["B"]);
        }

        it "returns empty for a node without connections" {
            assert!(graph.resolve_connections("B").is_empty());
        }

        it "returns empty for an unknown node" {
            assert!(graph.resolve_connections("Z").is_empty());
        }

        it "preserves declared order" {
            let graph = ContentGraph::from_parts(vec![], vec![
                ContentNode::new("hub", NodeKind::Report, "Hub").with_connections(["c", "a", "b"]),
                ContentNode::new("a", NodeKind::Report, "A"),
                ContentNode::new("b", NodeKind::Report, "B"),
                ContentNode::new("c", NodeKind::Report, "C"),
            ]);
            assert_eq!(ids(&graph.resolve_connections("hub")), vec!["c", "a", "b"]);
        }

        it "does not symmetrize connections" {
            let graph = newsroom();
            assert!(graph.resolve_connections("botnet").is_empty());
            assert_eq!(ids(&graph.backlinks("troll-farm")), vec!["election-2016"]);
        }
    }

    describe "related_by_tag_overlap" {
        it "ranks nodes sharing tags" {
            assert_eq!(ids(&graph.related_by_tag_overlap("A", 5)), vec!["B"]);
        }

        it "reports overlap scores" {
            let graph = newsroom();
            let related = graph.related_with_scores("troll-farm", 5);
            let scored: Vec<_> = related.iter().map(|r| (r.node.id.as_str(), r.score)).collect();
            assert_eq!(scored, vec![("election-2016", 2), ("botnet", 1), ("explainer", 1)]);
        }

        it "never includes the source, zero overlap, or more than the limit" {
            let graph = newsroom();
            for node in graph.nodes() {
                for limit in 1..4 {
                    let related = graph.related_with_scores(&node.id, limit);
                    assert!(related.len() <= limit);
                    for r in &related {
                        assert_ne!(r.node.id, node.id);
                        assert!(r.node.tags.iter().any(|t| node.has_tag(t)));
                    }
                    assert!(related.windows(2).all(|w| w[0].score >= w[1].score));
                }
            }
        }

        it "returns empty for an unknown or untagged node" {
            let graph = newsroom();
            assert!(graph.related_by_tag_overlap("nope", 5).is_empty());
            assert!(graph.related_by_tag_overlap("about", 5).is_empty());
        }

        it "treats a zero limit as the default" {
            let graph = newsroom();
            assert_eq!(graph.related_by_tag_overlap("troll-farm", 0).len(), 3);
        }
    }

    describe "export_graph" {
        it "emits one vertex per node and one edge per resolvable connection" {
            let export = graph.export_graph();
            let vertex_ids: Vec<_> = export.nodes.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(vertex_ids, vec!["A", "B"]);
            assert_eq!(export.edges.len(), 1);
            assert_eq!(export.edges[0].source, "A");
            assert_eq!(export.edges[0].target, "B");
            assert_eq!(export.edges[0].relation, "related");
        }

        it "colors vertices by era" {
            let graph = newsroom();
            let export = graph.export_graph();
            let election = export.nodes.iter().find(|v| v.id == "election-2016").unwrap();
            assert_eq!(election.color, "#16a085");
            assert_eq!(election.year, Some(2016));
            let botnet = export.nodes.iter().find(|v| v.id == "botnet").unwrap();
            assert_eq!(botnet.color, "#95a5a6");
        }

        it "keeps unknown kinds" {
            let graph = newsroom();
            let export = graph.export_graph();
            let explainer = export.nodes.iter().find(|v| v.id == "explainer").unwrap();
            assert_eq!(explainer.kind, NodeKind::Other("video".to_string()));
            assert_eq!(graph.nodes_of_kind(&NodeKind::Report).len(), 2);
        }

        it "orders edges by node then connection order" {
            let graph = newsroom();
            let edges: Vec<_> = graph
                .export_graph()
                .edges
                .into_iter()
                .map(|e| (e.source, e.target))
                .collect();
            assert_eq!(
                edges,
                vec![
                    ("troll-farm".to_string(), "election-2016".to_string()),
                    ("election-2016".to_string(), "troll-farm".to_string()),
                ]
            );
        }
    }

    describe "idempotence" {
        it "returns identical results on repeated calls" {
            let graph = newsroom();
            assert_eq!(graph.export_graph(), graph.export_graph());
            assert_eq!(
                ids(&graph.related_by_tag_overlap("troll-farm", 2)),
                ids(&graph.related_by_tag_overlap("troll-farm", 2))
            );
            assert_eq!(
                ids(&graph.find_by_tag("topic:bots")),
                ids(&graph.find_by_tag("topic:bots"))
            );
        }
    }

    describe "validate" {
        it "reports the dangling reference" {
            let graph = newsroom();
            let report = graph.validate();
            assert_eq!(report.dangling().count(), 1);
            assert!(!report.is_clean());
        }

        it "loads connection type vocabulary" {
            let graph = newsroom();
            assert_eq!(graph.connection_types().len(), 1);
            assert_eq!(graph.connection_types()[0].id, "causal");
        }
    }
}
