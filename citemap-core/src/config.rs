// Rendering configuration for the emitted page

use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT: &str = "graph_frozen.graphml";
pub const DEFAULT_OUTPUT: &str = "graph_d3.html";
pub const DEFAULT_D3_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/d3/7.9.0/d3.min.js";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub subtopic: String,
    pub author: String,
    pub other: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            subtopic: "#3CB371".to_string(),
            author: "#FF7AA2".to_string(),
            other: "#9E9E9E".to_string(),
        }
    }
}

/// Sizing constants, colors and page settings used while loading and emitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub title: String,
    pub d3_url: String,
    pub node_size_mult: f64,
    pub node_size_add: f64,
    pub node_size_power: f64,
    pub default_node_size: f64,
    pub label_scale: f64,
    pub min_font_size: u32,
    pub palette: Palette,
    /// Year slider bounds used when no paper carries a year
    pub fallback_years: (i32, i32),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Graph".to_string(),
            d3_url: DEFAULT_D3_URL.to_string(),
            node_size_mult: 0.8,
            node_size_add: 1.0,
            node_size_power: 1.05,
            default_node_size: 10.0,
            label_scale: 0.35,
            min_font_size: 8,
            palette: Palette::default(),
            fallback_years: (1990, 2025),
        }
    }
}

impl RenderConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Circle radius for a raw size attribute; negative sizes clamp to zero
    pub fn radius_for(&self, size: Option<f64>) -> f64 {
        let size = size.unwrap_or(self.default_node_size).max(0.0);
        size.powf(self.node_size_power) * self.node_size_mult + self.node_size_add
    }

    pub fn font_size_for(&self, radius: f64) -> u32 {
        let scaled = (radius.ln_1p() * self.label_scale * 10.0).floor();
        let scaled = if scaled.is_finite() && scaled > 0.0 { scaled as u32 } else { 0 };
        scaled.max(self.min_font_size)
    }
}
