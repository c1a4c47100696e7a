// Page emitter: BibGraph -> embedded payload -> static HTML document

use crate::citation::escape_html;
use crate::config::RenderConfig;
use crate::error::WriteError;
use crate::graph::{BibGraph, GraphStats};
use crate::template::PAGE_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(OutputFormat::Html),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub font_size: u32,
    pub color: String,
    pub apa: String,
    pub search_text: String,
    pub years: Vec<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub relation: Option<String>,
    pub weight: Option<f64>,
}

/// The data structure embedded into the page as `graphData`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub bytes: usize,
    pub stats: GraphStats,
}

pub fn build_payload(graph: &BibGraph) -> PagePayload {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| NodeRecord {
            id: n.id.clone(),
            label: n.label.clone(),
            node_type: n.node_type.clone(),
            kind: n.kind.as_str().to_string(),
            x: n.x,
            y: n.y,
            radius: n.radius,
            font_size: n.font_size,
            color: n.color.clone(),
            apa: n.apa_html(),
            search_text: n.search_text(),
            years: n.years(),
            min_year: n.min_year(),
            max_year: n.max_year(),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|e| EdgeRecord {
            source: e.source.clone(),
            target: e.target.clone(),
            relation: e.relation.clone(),
            weight: e.weight,
        })
        .collect();

    PagePayload { nodes, edges }
}

/// Compact JSON for embedding in a <script> block. Markup characters are
/// written as unicode escapes so no data can open or close an element,
/// comment or CDATA section.
pub fn payload_json(payload: &PagePayload) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(payload)?;
    Ok(escape_script_json(&json))
}

// Outside strings serde_json never emits these, so escaping is lossless
fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Year slider bounds, falling back to the configured range
pub fn year_bounds(graph: &BibGraph, config: &RenderConfig) -> (i32, i32) {
    graph.year_range().unwrap_or(config.fallback_years)
}

pub fn render_page(graph: &BibGraph, config: &RenderConfig) -> Result<String, WriteError> {
    let data = payload_json(&build_payload(graph))?;
    let (min_year, max_year) = year_bounds(graph, config);

    let values = HashMap::from([
        ("VERSION", env!("CARGO_PKG_VERSION").to_string()),
        ("TITLE", escape_html(&config.title)),
        ("D3_URL", escape_html(&config.d3_url)),
        ("COLOR_SUBTOPIC", escape_html(&config.palette.subtopic)),
        ("COLOR_AUTHOR", escape_html(&config.palette.author)),
        ("COLOR_OTHER", escape_html(&config.palette.other)),
        ("NODE_COUNT", graph.node_count().to_string()),
        ("EDGE_COUNT", graph.edge_count().to_string()),
        ("MIN_YEAR", min_year.to_string()),
        ("MAX_YEAR", max_year.to_string()),
        ("GRAPH_DATA", data),
    ]);
    let page = fill_template(PAGE_TEMPLATE, &values);

    debug!("Rendered page: {} bytes", page.len());
    Ok(page)
}

/// Substitute `{{NAME}}` placeholders in a single pass. Substituted text is
/// never rescanned and unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}").and_then(|end| values.get(&after[..end]).map(|v| (end, v))) {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Standalone JSON export of the payload plus summary metadata
pub fn render_json(graph: &BibGraph, config: &RenderConfig) -> Result<String, WriteError> {
    let (min_year, max_year) = year_bounds(graph, config);
    let export = serde_json::json!({
        "generator": "citemap",
        "version": env!("CARGO_PKG_VERSION"),
        "title": config.title,
        "directed": graph.is_directed(),
        "yearRange": [min_year, max_year],
        "stats": graph.stats(),
        "graph": build_payload(graph),
    });
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Render the graph and write it to `path`. The document is written to a
/// sibling temp file first and renamed into place.
pub fn emit_page(
    graph: &BibGraph,
    path: &Path,
    format: OutputFormat,
    config: &RenderConfig,
) -> Result<PageSummary, WriteError> {
    let content = match format {
        OutputFormat::Html => render_page(graph, config)?,
        OutputFormat::Json => render_json(graph, config)?,
    };

    save_page(&content, path)?;
    info!("Wrote {} ({} bytes)", path.display(), content.len());

    Ok(PageSummary {
        path: path.to_path_buf(),
        format,
        bytes: content.len(),
        stats: graph.stats(),
    })
}

pub fn save_page(content: &str, path: &Path) -> Result<(), WriteError> {
    let tmp_path = temp_sibling(path);
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let written = File::create(&tmp_path).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });

    let result = written.and_then(|_| fs::rename(&tmp_path, path));
    if let Err(source) = result {
        if tmp_path.exists() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                warn!("Could not remove {}: {}", tmp_path.display(), e);
            }
        }
        return Err(io_err(source));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
