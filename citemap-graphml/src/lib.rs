pub mod document;
pub mod error;
pub mod reader;

pub use document::{Attributes, GraphmlDocument, GraphmlEdge, GraphmlNode, KeyDecl, KeyDomain};
pub use error::GraphmlError;
pub use reader::{parse_graphml, read_graphml};
