use crate::document::{Attributes, GraphmlDocument, GraphmlEdge, GraphmlNode, KeyDecl, KeyDomain};
use crate::error::{GraphmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read and parse a GraphML file from disk
pub fn read_graphml(path: &Path) -> Result<GraphmlDocument> {
    let text = fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    parse_graphml(&text)
}

/// Parse GraphML from an in-memory string
pub fn parse_graphml(text: &str) -> Result<GraphmlDocument> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Err(source) => return Err(GraphmlError::XmlError { position, source }),
            Ok(Event::Start(e)) => state.open(&e, position, false)?,
            Ok(Event::Empty(e)) => state.open(&e, position, true)?,
            Ok(Event::End(_)) => state.close(),
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|source| GraphmlError::XmlError { position, source })?;
                state.text(&text);
            }
            Ok(Event::CData(c)) => {
                let raw = c.into_inner();
                state.text(&String::from_utf8_lossy(&raw));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
        }
    }

    state.finish()
}

// Raw data values keyed by the <data key=".."> id, resolved to names at the end
type RawData = Vec<(String, String)>;

enum Frame {
    Key(usize),
    Default,
    Graph,
    Node(usize),
    Edge(usize),
    Data { key: String, value: String },
    Other(String),
}

impl Frame {
    fn name(&self) -> String {
        match self {
            Frame::Key(_) => "key".to_string(),
            Frame::Default => "default".to_string(),
            Frame::Graph => "graph".to_string(),
            Frame::Node(_) => "node".to_string(),
            Frame::Edge(_) => "edge".to_string(),
            Frame::Data { .. } => "data".to_string(),
            Frame::Other(name) => name.clone(),
        }
    }
}

#[derive(Default)]
struct ParseState {
    stack: Vec<Frame>,
    keys: Vec<KeyDecl>,
    saw_graph: bool,
    directed: bool,
    graph_data: RawData,
    nodes: Vec<(String, RawData)>,
    edges: Vec<(Option<String>, String, String, RawData)>,
}

impl ParseState {
    fn open(&mut self, e: &BytesStart, position: u64, empty: bool) -> Result<()> {
        let attrs = element_attributes(e, position)?;

        let frame = match e.local_name().as_ref() {
            b"key" => {
                let id = required(&attrs, "key", "id")?;
                let name = attrs.get("attr.name").cloned().unwrap_or_else(|| id.clone());
                let domain = attrs
                    .get("for")
                    .map(|f| KeyDomain::from_str(f))
                    .unwrap_or(KeyDomain::All);
                self.keys.push(KeyDecl {
                    id,
                    name,
                    domain,
                    attr_type: attrs.get("attr.type").cloned(),
                    default: None,
                });
                Frame::Key(self.keys.len() - 1)
            }
            b"default" => Frame::Default,
            b"graph" => {
                // Nested graphs inherit the outer edge default
                if !self.saw_graph {
                    self.saw_graph = true;
                    self.directed = attrs
                        .get("edgedefault")
                        .map(|v| v.eq_ignore_ascii_case("directed"))
                        .unwrap_or(false);
                }
                Frame::Graph
            }
            b"node" => {
                let id = required(&attrs, "node", "id")?;
                self.nodes.push((id, Vec::new()));
                Frame::Node(self.nodes.len() - 1)
            }
            b"edge" => {
                let source = required(&attrs, "edge", "source")?;
                let target = required(&attrs, "edge", "target")?;
                self.edges
                    .push((attrs.get("id").cloned(), source, target, Vec::new()));
                Frame::Edge(self.edges.len() - 1)
            }
            b"data" => Frame::Data {
                key: required(&attrs, "data", "key")?,
                value: String::new(),
            },
            other => Frame::Other(String::from_utf8_lossy(other).into_owned()),
        };

        self.stack.push(frame);
        if empty {
            self.close();
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let key_index = match self.stack.as_slice() {
            [.., Frame::Key(idx), Frame::Default] => Some(*idx),
            _ => None,
        };
        if let Some(idx) = key_index {
            self.keys[idx]
                .default
                .get_or_insert_with(String::new)
                .push_str(text);
            return;
        }

        if let Some(Frame::Data { value, .. }) = self.stack.last_mut() {
            value.push_str(text);
        }
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        if let Frame::Data { key, value } = frame {
            // Data belongs to the innermost enclosing graph element
            let owner = self.stack.iter().rev().find_map(|f| match f {
                Frame::Node(idx) => Some(Owner::Node(*idx)),
                Frame::Edge(idx) => Some(Owner::Edge(*idx)),
                Frame::Graph => Some(Owner::Graph),
                _ => None,
            });
            match owner {
                Some(Owner::Node(idx)) => self.nodes[idx].1.push((key, value)),
                Some(Owner::Edge(idx)) => self.edges[idx].3.push((key, value)),
                Some(Owner::Graph) => self.graph_data.push((key, value)),
                None => warn!("Ignoring <data key=\"{}\"> outside any graph element", key),
            }
        }
    }

    fn finish(self) -> Result<GraphmlDocument> {
        if let Some(open) = self.stack.last() {
            return Err(GraphmlError::UnexpectedEof(open.name()));
        }
        if !self.saw_graph {
            return Err(GraphmlError::MissingGraph);
        }

        let names: HashMap<&str, &str> = self
            .keys
            .iter()
            .map(|k| (k.id.as_str(), k.name.as_str()))
            .collect();

        let graph_attributes = resolve(&self.keys, &names, KeyDomain::Graph, self.graph_data);
        let nodes: Vec<GraphmlNode> = self
            .nodes
            .into_iter()
            .map(|(id, raw)| GraphmlNode {
                id,
                attributes: resolve(&self.keys, &names, KeyDomain::Node, raw),
            })
            .collect();
        let edges: Vec<GraphmlEdge> = self
            .edges
            .into_iter()
            .map(|(id, source, target, raw)| GraphmlEdge {
                id,
                source,
                target,
                attributes: resolve(&self.keys, &names, KeyDomain::Edge, raw),
            })
            .collect();

        debug!(
            "Parsed GraphML: {} keys, {} nodes, {} edges (directed: {})",
            self.keys.len(),
            nodes.len(),
            edges.len(),
            self.directed
        );

        Ok(GraphmlDocument {
            keys: self.keys,
            directed: self.directed,
            graph_attributes,
            nodes,
            edges,
        })
    }
}

enum Owner {
    Node(usize),
    Edge(usize),
    Graph,
}

fn element_attributes(e: &BytesStart, position: u64) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|source| GraphmlError::XmlError { position, source })?;
        out.insert(key, value.into_owned());
    }
    Ok(out)
}

fn required(
    attrs: &BTreeMap<String, String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<String> {
    attrs
        .get(attribute)
        .cloned()
        .ok_or(GraphmlError::MissingAttribute { element, attribute })
}

fn resolve(
    keys: &[KeyDecl],
    names: &HashMap<&str, &str>,
    domain: KeyDomain,
    raw: RawData,
) -> Attributes {
    let mut out = Attributes::new();

    for key in keys.iter().filter(|k| k.domain.applies_to(domain)) {
        if let Some(ref default) = key.default {
            out.insert(key.name.clone(), default.clone());
        }
    }

    for (key, value) in raw {
        let name = names
            .get(key.as_str())
            .map(|n| n.to_string())
            .unwrap_or(key);
        out.insert(name, value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="node" attr.name="label" attr.type="string"/>
  <key id="d1" for="node" attr.name="type" attr.type="string">
    <default>author</default>
  </key>
  <key id="d2" for="edge" attr.name="type" attr.type="string"/>
  <key id="d3" for="edge" attr.name="weight" attr.type="double"/>
  <graph id="G" edgedefault="undirected">
    <node id="a"><data key="d0">Ada Lovelace</data></node>
    <node id="b">
      <data key="d0">Graph &amp; Networks</data>
      <data key="d1">subtopic</data>
    </node>
    <edge id="e0" source="a" target="b">
      <data key="d2">studies</data>
      <data key="d3">2.5</data>
    </edge>
  </graph>
</graphml>"#;

    #[test]
    fn test_parse_sample_counts() {
        let doc = parse_graphml(SAMPLE).unwrap();
        assert_eq!(doc.keys.len(), 4);
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges.len(), 1);
        assert!(!doc.directed);
    }

    #[test]
    fn test_data_resolves_to_attr_name() {
        let doc = parse_graphml(SAMPLE).unwrap();
        let a = doc.node("a").unwrap();
        assert_eq!(a.attributes.get("label").map(String::as_str), Some("Ada Lovelace"));
    }

    #[test]
    fn test_key_default_applies_when_data_missing() {
        let doc = parse_graphml(SAMPLE).unwrap();
        assert_eq!(
            doc.node("a").unwrap().attributes.get("type").map(String::as_str),
            Some("author")
        );
        assert_eq!(
            doc.node("b").unwrap().attributes.get("type").map(String::as_str),
            Some("subtopic")
        );
    }

    #[test]
    fn test_entities_are_unescaped() {
        let doc = parse_graphml(SAMPLE).unwrap();
        assert_eq!(
            doc.node("b").unwrap().attributes.get("label").map(String::as_str),
            Some("Graph & Networks")
        );
    }

    #[test]
    fn test_edge_keys_do_not_leak_onto_nodes() {
        let doc = parse_graphml(SAMPLE).unwrap();
        assert!(doc.node("a").unwrap().attributes.get("weight").is_none());
        let edge = &doc.edges[0];
        assert_eq!(edge.id.as_deref(), Some("e0"));
        assert_eq!(edge.attributes.get("type").map(String::as_str), Some("studies"));
        assert_eq!(edge.attributes.get("weight").map(String::as_str), Some("2.5"));
    }

    #[test]
    fn test_undeclared_key_kept_under_raw_id() {
        let xml = r#"<graphml><graph><node id="n"><data key="bibtex">x</data></node></graph></graphml>"#;
        let doc = parse_graphml(xml).unwrap();
        assert_eq!(
            doc.nodes[0].attributes.get("bibtex").map(String::as_str),
            Some("x")
        );
    }

    #[test]
    fn test_cdata_is_kept_verbatim() {
        let xml = r#"<graphml><graph><node id="n"><data key="bib"><![CDATA[title = {A <b> & c}]]></data></node></graph></graphml>"#;
        let doc = parse_graphml(xml).unwrap();
        assert_eq!(
            doc.nodes[0].attributes.get("bib").map(String::as_str),
            Some("title = {A <b> & c}")
        );
    }

    #[test]
    fn test_directed_edgedefault() {
        let xml = r#"<graphml><graph edgedefault="directed"></graph></graphml>"#;
        let doc = parse_graphml(xml).unwrap();
        assert!(doc.directed);
        assert!(doc.nodes.is_empty());
    }

    #[test]
    fn test_missing_graph_element() {
        let xml = r#"<graphml><key id="d0" for="node"/></graphml>"#;
        assert!(matches!(parse_graphml(xml), Err(GraphmlError::MissingGraph)));
    }

    #[test]
    fn test_node_without_id() {
        let xml = r#"<graphml><graph><node/></graph></graphml>"#;
        assert!(matches!(
            parse_graphml(xml),
            Err(GraphmlError::MissingAttribute {
                element: "node",
                attribute: "id"
            })
        ));
    }

    #[test]
    fn test_edge_without_target() {
        let xml = r#"<graphml><graph><node id="a"/><edge source="a"/></graph></graphml>"#;
        assert!(matches!(
            parse_graphml(xml),
            Err(GraphmlError::MissingAttribute {
                element: "edge",
                attribute: "target"
            })
        ));
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let xml = r#"<graphml><graph><node id="a"></edge></graph></graphml>"#;
        assert!(matches!(
            parse_graphml(xml),
            Err(GraphmlError::XmlError { .. })
        ));
    }

    #[test]
    fn test_truncated_document_is_error() {
        let xml = r#"<graphml><graph><node id="a">"#;
        assert!(parse_graphml(xml).is_err());
    }
}
