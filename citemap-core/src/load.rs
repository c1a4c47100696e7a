// Graph loading: GraphML document -> BibGraph

use crate::citation::parse_bibtex;
use crate::config::RenderConfig;
use crate::error::LoadError;
use crate::graph::BibGraph;
use crate::model::{Edge, Node, NodeKind};
use citemap_graphml::{Attributes, GraphmlDocument, GraphmlEdge, GraphmlError, GraphmlNode};
use std::path::Path;
use tracing::{debug, info};

pub const ATTR_LABEL: &[&str] = &["label", "Label", "name", "Name"];
pub const ATTR_TYPE: &[&str] = &["type", "Type", "node_type", "category"];
pub const ATTR_BIBTEX: &[&str] = &["bibtex", "Bibtex", "BIBTEX"];
pub const ATTR_SIZE: &[&str] = &["SizeGephi", "size", "Size", "viz:size", "viz_size"];
pub const ATTR_RELATION: &[&str] = &["type", "relation", "relationship", "label"];
pub const ATTR_WEIGHT: &[&str] = &["weight", "Weight"];

const POSITION_PAIRS: &[(&str, &str)] = &[
    ("x", "y"),
    ("X", "Y"),
    ("viz:position.x", "viz:position.y"),
    ("pos_x", "pos_y"),
];

/// Load a GraphML file into a validated `BibGraph`
pub fn load_graph(path: &Path, config: &RenderConfig) -> Result<BibGraph, LoadError> {
    let doc = citemap_graphml::read_graphml(path).map_err(|source| match source {
        GraphmlError::IoError(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
            LoadError::NotFound(path.to_path_buf())
        }
        source => LoadError::Graphml {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let graph = build_graph(&doc, config)?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

/// Interpret a parsed GraphML document as authors, subtopics and papers
pub fn build_graph(doc: &GraphmlDocument, config: &RenderConfig) -> Result<BibGraph, LoadError> {
    let nodes = doc.nodes.iter().map(|n| build_node(n, config)).collect();
    let edges = doc.edges.iter().map(build_edge).collect();
    BibGraph::new(nodes, edges, doc.directed)
}

/// Look an attribute up by a list of aliases: exact names first, then
/// case-insensitively. Empty values count as missing.
pub fn pick_attr<'a>(attrs: &'a Attributes, candidates: &[&str]) -> Option<&'a str> {
    let non_empty = |v: &'a String| Some(v.as_str()).filter(|s| !s.trim().is_empty());

    candidates
        .iter()
        .find_map(|c| attrs.get(*c).and_then(non_empty))
        .or_else(|| {
            candidates.iter().find_map(|c| {
                attrs
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(c))
                    .and_then(|(_, v)| non_empty(v))
            })
        })
}

/// Parse a number, accepting a decimal comma
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim().replace(',', ".");
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Layout position from the first complete coordinate pair
pub fn extract_position(attrs: &Attributes) -> Option<(f64, f64)> {
    POSITION_PAIRS.iter().find_map(|(kx, ky)| {
        let x = attrs.get(*kx).and_then(|v| parse_number(v))?;
        let y = attrs.get(*ky).and_then(|v| parse_number(v))?;
        Some((x, y))
    })
}

fn build_node(node: &GraphmlNode, config: &RenderConfig) -> Node {
    let attrs = &node.attributes;
    let label = pick_attr(attrs, ATTR_LABEL).unwrap_or(&node.id).to_string();
    let node_type = pick_attr(attrs, ATTR_TYPE).unwrap_or_default().to_string();
    let kind = NodeKind::classify(&node_type);

    let radius = config.radius_for(pick_attr(attrs, ATTR_SIZE).and_then(parse_number));
    let font_size = config.font_size_for(radius);

    // Screen y grows downward
    let (x, y) = extract_position(attrs)
        .map(|(x, y)| (x, -y))
        .unwrap_or((0.0, 0.0));

    let color = match kind {
        NodeKind::Subtopic => config.palette.subtopic.clone(),
        NodeKind::Author => config.palette.author.clone(),
        NodeKind::Other => config.palette.other.clone(),
    };

    let papers = pick_attr(attrs, ATTR_BIBTEX)
        .map(parse_bibtex)
        .unwrap_or_default();

    debug!(
        "Node {} ({}) with {} papers",
        node.id,
        kind.as_str(),
        papers.len()
    );

    Node {
        id: node.id.clone(),
        label,
        node_type,
        kind,
        papers,
        x,
        y,
        radius,
        font_size,
        color,
    }
}

fn build_edge(edge: &GraphmlEdge) -> Edge {
    let attrs = &edge.attributes;
    Edge {
        source: edge.source.clone(),
        target: edge.target.clone(),
        relation: pick_attr(attrs, ATTR_RELATION).map(str::to_string),
        weight: pick_attr(attrs, ATTR_WEIGHT).and_then(parse_number),
    }
}
