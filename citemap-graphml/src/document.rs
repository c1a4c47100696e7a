use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute values of one element, keyed by the declared `attr.name`
/// (or the raw `key` id when no `<key>` declares it).
pub type Attributes = BTreeMap<String, String>;

/// Which elements a `<key>` declaration applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyDomain {
    Graph,
    Node,
    Edge,
    All,
}

impl KeyDomain {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "graph" => KeyDomain::Graph,
            "node" => KeyDomain::Node,
            "edge" => KeyDomain::Edge,
            _ => KeyDomain::All,
        }
    }

    pub fn applies_to(&self, other: KeyDomain) -> bool {
        *self == KeyDomain::All || *self == other
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDecl {
    pub id: String,
    pub name: String,
    pub domain: KeyDomain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphmlNode {
    pub id: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphmlEdge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

/// A GraphML file as read from disk. Nodes and edges keep document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphmlDocument {
    pub keys: Vec<KeyDecl>,
    pub directed: bool,
    pub graph_attributes: Attributes,
    pub nodes: Vec<GraphmlNode>,
    pub edges: Vec<GraphmlEdge>,
}

impl GraphmlDocument {
    pub fn node(&self, id: &str) -> Option<&GraphmlNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
