use citemap_graphml::GraphmlError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a graph file into a `BibGraph`
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Graph file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read graph {}: {source}", .path.display())]
    Graphml {
        path: PathBuf,
        #[source]
        source: GraphmlError,
    },

    #[error("Duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("Edge '{from}' -> '{to}' references unknown node '{missing}'")]
    UnknownEndpoint {
        from: String,
        to: String,
        missing: String,
    },
}

/// Failure to write the emitted page
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize page payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
