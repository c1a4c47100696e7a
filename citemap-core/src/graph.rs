// In-memory bibliometric graph and the queries the page performs client-side

use crate::error::LoadError;
use crate::model::{Edge, Node, NodeKind};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Immutable node/edge collection. Nodes and edges keep file order so the
/// emitted payload is stable across runs.
#[derive(Debug, Clone)]
pub struct BibGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    directed: bool,
    index: HashMap<String, NodeIndex>,
    // Node weights are positions in `nodes`
    topology: UnGraph<usize, ()>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Label,
    /// Matched a paper; carries the matching search line
    Paper(String),
}

#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub node: &'a Node,
    pub matched: MatchKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub authors: usize,
    pub subtopics: usize,
    pub others: usize,
    pub papers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_range: Option<(i32, i32)>,
}

impl BibGraph {
    /// Build a graph, rejecting duplicate node ids and dangling edges
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, directed: bool) -> Result<Self, LoadError> {
        let mut topology = UnGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for (pos, node) in nodes.iter().enumerate() {
            if index.contains_key(&node.id) {
                return Err(LoadError::DuplicateNode(node.id.clone()));
            }
            index.insert(node.id.clone(), topology.add_node(pos));
        }

        for edge in &edges {
            let lookup = |id: &str| {
                index.get(id).copied().ok_or_else(|| LoadError::UnknownEndpoint {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    missing: id.to_string(),
                })
            };
            let a = lookup(&edge.source)?;
            let b = lookup(&edge.target)?;
            topology.add_edge(a, b, ());
        }

        Ok(Self {
            nodes,
            edges,
            directed,
            index,
            topology,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.nodes[self.topology[*idx]])
    }

    /// Ids of nodes sharing an edge with `id`, never `id` itself.
    /// Edge direction is ignored.
    pub fn neighbors(&self, id: &str) -> BTreeSet<&str> {
        let Some(&idx) = self.index.get(id) else {
            return BTreeSet::new();
        };

        self.topology
            .neighbors(idx)
            .filter(|other| *other != idx)
            .map(|other| self.nodes[self.topology[other]].id.as_str())
            .collect()
    }

    /// Edges left undimmed when `id` is selected in neighbor mode
    pub fn incident_edges(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.touches(id)).collect()
    }

    /// Nodes shown under an inclusive year filter. Undated nodes are always
    /// shown; dated nodes need at least one paper inside the range.
    pub fn visible_in_years(&self, from: i32, to: i32) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| !n.is_dated() || n.has_paper_in(from, to))
            .collect()
    }

    /// Case-insensitive substring search over labels, then paper metadata.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.nodes
            .iter()
            .filter_map(|node| {
                if node.label.to_lowercase().contains(&query) {
                    return Some(SearchHit {
                        node,
                        matched: MatchKind::Label,
                    });
                }
                node.papers
                    .iter()
                    .map(|p| p.search_text())
                    .find(|line| line.to_lowercase().contains(&query))
                    .map(|line| SearchHit {
                        node,
                        matched: MatchKind::Paper(line),
                    })
            })
            .collect()
    }

    /// Min and max paper year across the whole graph
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let years: Vec<i32> = self.nodes.iter().flat_map(|n| n.years()).collect();
        let min = years.iter().min()?;
        let max = years.iter().max()?;
        Some((*min, *max))
    }

    pub fn stats(&self) -> GraphStats {
        let count = |kind: NodeKind| self.nodes.iter().filter(|n| n.kind == kind).count();
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            authors: count(NodeKind::Author),
            subtopics: count(NodeKind::Subtopic),
            others: count(NodeKind::Other),
            papers: self.nodes.iter().map(|n| n.papers.len()).sum(),
            year_range: self.year_range(),
        }
    }
}
