use quick_xml::events::attributes::AttrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphmlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML syntax error at byte {position}: {source}")]
    XmlError {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Malformed XML attribute: {0}")]
    AttributeError(#[from] AttrError),

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Document has no <graph> element")]
    MissingGraph,

    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
}

pub type Result<T> = std::result::Result<T, GraphmlError>;
