use crate::citation::Paper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Author,
    Subtopic,
    Other,
}

impl NodeKind {
    /// Classify a free-form type attribute. "subtopic" wins over "author"
    /// when a type string mentions both.
    pub fn classify(node_type: &str) -> Self {
        let lowered = node_type.to_lowercase();
        if lowered.contains("subtopic") {
            NodeKind::Subtopic
        } else if lowered.contains("author") {
            NodeKind::Author
        } else {
            NodeKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Author => "author",
            NodeKind::Subtopic => "subtopic",
            NodeKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// Type attribute exactly as written in the graph file
    pub node_type: String,
    pub kind: NodeKind,
    pub papers: Vec<Paper>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub font_size: u32,
    pub color: String,
}

impl Node {
    /// Publication years of all papers that carry a parseable year
    pub fn years(&self) -> Vec<i32> {
        self.papers.iter().filter_map(Paper::year_value).collect()
    }

    pub fn min_year(&self) -> Option<i32> {
        self.years().into_iter().min()
    }

    pub fn max_year(&self) -> Option<i32> {
        self.years().into_iter().max()
    }

    pub fn is_dated(&self) -> bool {
        self.papers.iter().any(|p| p.year_value().is_some())
    }

    pub fn has_paper_in(&self, from: i32, to: i32) -> bool {
        self.years().into_iter().any(|y| y >= from && y <= to)
    }

    /// One searchable line per paper, joined with " | "
    pub fn search_text(&self) -> String {
        self.papers
            .iter()
            .map(Paper::search_text)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn apa_html(&self) -> String {
        self.papers.iter().map(Paper::apa_html).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}
