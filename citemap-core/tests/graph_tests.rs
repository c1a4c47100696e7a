// Tests for graph queries: neighbors, year filter, search, stats

use citemap_core::citation::Paper;
use citemap_core::error::LoadError;
use citemap_core::graph::{BibGraph, MatchKind};
use citemap_core::model::{Edge, Node, NodeKind};
use std::collections::BTreeSet;

fn paper(authors: &str, year: &str, title: &str) -> Paper {
    Paper {
        authors: authors.to_string(),
        year: year.to_string(),
        title: title.to_string(),
        venue: "Journal of Graphs".to_string(),
        ..Paper::default()
    }
}

fn node(id: &str, label: &str, kind: NodeKind, papers: Vec<Paper>) -> Node {
    Node {
        id: id.to_string(),
        label: label.to_string(),
        node_type: kind.as_str().to_string(),
        kind,
        papers,
        x: 0.0,
        y: 0.0,
        radius: 5.0,
        font_size: 8,
        color: "#000000".to_string(),
    }
}

fn edge(source: &str, target: &str) -> Edge {
    Edge {
        source: source.to_string(),
        target: target.to_string(),
        relation: None,
        weight: None,
    }
}

// a - b - c, a - s, plus a self loop on c and an isolated node d
fn sample_graph() -> BibGraph {
    let nodes = vec![
        node(
            "a",
            "Ada Lovelace",
            NodeKind::Author,
            vec![paper("Lovelace, Ada", "1843", "Sketch of the Analytical Engine")],
        ),
        node(
            "b",
            "Charles Babbage",
            NodeKind::Author,
            vec![
                paper("Babbage, Charles", "1822", "Difference Engine"),
                paper("Babbage, Charles", "1864", "Passages from the Life of a Philosopher"),
            ],
        ),
        node(
            "c",
            "Alan Turing",
            NodeKind::Author,
            vec![paper("Turing, Alan", "1936", "On Computable Numbers")],
        ),
        node("s", "Mechanical Computation", NodeKind::Subtopic, vec![]),
        node("d", "Loner", NodeKind::Other, vec![paper("Nobody", "n.d.", "Undated")]),
    ];
    let edges = vec![edge("a", "b"), edge("b", "c"), edge("a", "s"), edge("c", "c")];
    BibGraph::new(nodes, edges, false).unwrap()
}

fn ids<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> BTreeSet<&'a str> {
    nodes.into_iter().map(|n| n.id.as_str()).collect()
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_new_rejects_dangling_edge() {
    let nodes = vec![node("a", "A", NodeKind::Author, vec![])];
    let result = BibGraph::new(nodes, vec![edge("a", "X")], false);
    match result {
        Err(LoadError::UnknownEndpoint { from, to, missing }) => {
            assert_eq!(from, "a");
            assert_eq!(to, "X");
            assert_eq!(missing, "X");
        }
        other => panic!("expected UnknownEndpoint, got {:?}", other.map(|g| g.node_count())),
    }
}

#[test]
fn test_new_rejects_duplicate_ids() {
    let nodes = vec![
        node("a", "A", NodeKind::Author, vec![]),
        node("a", "A again", NodeKind::Author, vec![]),
    ];
    assert!(matches!(
        BibGraph::new(nodes, vec![], false),
        Err(LoadError::DuplicateNode(_))
    ));
}

#[test]
fn test_nodes_keep_insertion_order() {
    let graph = sample_graph();
    let order: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c", "s", "d"]);
}

// ============================================================================
// Neighbor Tests
// ============================================================================

#[test]
fn test_neighbors_are_direct_only() {
    let graph = sample_graph();
    assert_eq!(graph.neighbors("a"), BTreeSet::from(["b", "s"]));
    assert_eq!(graph.neighbors("b"), BTreeSet::from(["a", "c"]));
}

#[test]
fn test_neighbors_exclude_self_loop() {
    let graph = sample_graph();
    let neighbors = graph.neighbors("c");
    assert!(!neighbors.contains("c"));
    assert_eq!(neighbors, BTreeSet::from(["b"]));
}

#[test]
fn test_neighbors_match_edge_list_for_every_node() {
    let graph = sample_graph();
    for n in graph.nodes() {
        let expected: BTreeSet<&str> = graph
            .edges()
            .iter()
            .filter(|e| e.source != e.target)
            .filter_map(|e| {
                if e.source == n.id {
                    Some(e.target.as_str())
                } else if e.target == n.id {
                    Some(e.source.as_str())
                } else {
                    None
                }
            })
            .collect();
        assert_eq!(graph.neighbors(&n.id), expected, "node {}", n.id);
    }
}

#[test]
fn test_neighbors_of_isolated_and_unknown() {
    let graph = sample_graph();
    assert!(graph.neighbors("d").is_empty());
    assert!(graph.neighbors("missing").is_empty());
}

#[test]
fn test_directed_edges_are_neighbors_both_ways() {
    let nodes = vec![
        node("x", "X", NodeKind::Author, vec![]),
        node("y", "Y", NodeKind::Subtopic, vec![]),
    ];
    let graph = BibGraph::new(nodes, vec![edge("x", "y")], true).unwrap();
    assert_eq!(graph.neighbors("y"), BTreeSet::from(["x"]));
}

#[test]
fn test_incident_edges() {
    let graph = sample_graph();
    assert_eq!(graph.incident_edges("a").len(), 2);
    assert_eq!(graph.incident_edges("c").len(), 2);
    assert!(graph.incident_edges("d").is_empty());
}

// ============================================================================
// Year Filter Tests
// ============================================================================

#[test]
fn test_year_filter_requires_a_paper_in_range() {
    let graph = sample_graph();
    // b has papers in 1822 and 1864 but none in 1830..=1850
    let visible = ids(graph.visible_in_years(1830, 1850));
    assert_eq!(visible, BTreeSet::from(["a", "s", "d"]));
}

#[test]
fn test_year_filter_is_inclusive() {
    let graph = sample_graph();
    let visible = ids(graph.visible_in_years(1936, 1936));
    assert!(visible.contains("c"));
    assert!(!visible.contains("a"));
}

#[test]
fn test_undated_nodes_always_visible() {
    let graph = sample_graph();
    for (from, to) in [(1000, 1001), (1800, 2000), (3000, 2000)] {
        let visible = ids(graph.visible_in_years(from, to));
        assert!(visible.contains("s"));
        assert!(visible.contains("d"));
    }
}

#[test]
fn test_full_range_shows_everything() {
    let graph = sample_graph();
    let (min, max) = graph.year_range().unwrap();
    assert_eq!((min, max), (1822, 1936));
    assert_eq!(graph.visible_in_years(min, max).len(), graph.node_count());
}

// ============================================================================
// Search Tests
// ============================================================================

#[test]
fn test_search_by_label_case_insensitive() {
    let graph = sample_graph();
    let hits = graph.search("  TURING ");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].node.id, "c");
    assert_eq!(hits[0].matched, MatchKind::Label);
}

#[test]
fn test_search_by_paper_title() {
    let graph = sample_graph();
    let hits = graph.search("computable");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].node.id, "c");
    assert!(matches!(&hits[0].matched, MatchKind::Paper(line) if line.contains("On Computable Numbers")));
}

#[test]
fn test_search_by_paper_author() {
    let graph = sample_graph();
    let hits = graph.search("babbage, charles");
    assert_eq!(ids(hits.iter().map(|h| h.node)), BTreeSet::from(["b"]));
}

#[test]
fn test_search_label_match_takes_precedence() {
    let graph = sample_graph();
    // "Engine" appears in papers of a and b; "Ada" only in a's label
    let hits = graph.search("engine");
    assert_eq!(ids(hits.iter().map(|h| h.node)), BTreeSet::from(["a", "b"]));
    let hits = graph.search("ada");
    assert_eq!(hits[0].matched, MatchKind::Label);
}

#[test]
fn test_search_no_match_and_blank_query() {
    let graph = sample_graph();
    assert!(graph.search("quantum chromodynamics").is_empty());
    assert!(graph.search("").is_empty());
    assert!(graph.search("   ").is_empty());
}

// ============================================================================
// Stats Tests
// ============================================================================

#[test]
fn test_stats_counts() {
    let stats = sample_graph().stats();
    assert_eq!(stats.node_count, 5);
    assert_eq!(stats.edge_count, 4);
    assert_eq!(stats.authors, 3);
    assert_eq!(stats.subtopics, 1);
    assert_eq!(stats.others, 1);
    assert_eq!(stats.papers, 5);
    assert_eq!(stats.year_range, Some((1822, 1936)));
}

#[test]
fn test_empty_graph_has_no_year_range() {
    let graph = BibGraph::new(vec![], vec![], false).unwrap();
    assert_eq!(graph.year_range(), None);
    assert_eq!(graph.stats().node_count, 0);
}
