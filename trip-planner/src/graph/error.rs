//! Graph loading and search errors.

use std::path::PathBuf;

use crate::domain::NodeId;

/// Errors from loading graph documents or searching a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid graph.
    #[error("invalid graph document {}: {message}", path.display())]
    Json { path: PathBuf, message: String },

    /// A directory could not be listed.
    #[error("failed to list {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No path connects the two nodes.
    #[error("no path found from {start} to {goal}")]
    NoPathFound { start: NodeId, goal: NodeId },
}

impl GraphError {
    /// Attach a path to an error produced while parsing an in-memory document.
    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            GraphError::Json { message, .. } => GraphError::Json {
                path: path.into(),
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::NoPathFound {
            start: NodeId(1),
            goal: NodeId(9),
        };
        assert_eq!(err.to_string(), "no path found from 1 to 9");

        let err = GraphError::Json {
            path: PathBuf::from("graphs/car.json"),
            message: "missing field `graph`".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid graph document graphs/car.json: missing field `graph`"
        );
    }

    #[test]
    fn with_path_only_touches_parse_errors() {
        let err = GraphError::Json {
            path: PathBuf::new(),
            message: "bad".into(),
        }
        .with_path("a.json");
        assert!(matches!(err, GraphError::Json { ref path, .. } if path == &PathBuf::from("a.json")));

        let err = GraphError::NoPathFound {
            start: NodeId(1),
            goal: NodeId(2),
        }
        .with_path("a.json");
        assert!(matches!(err, GraphError::NoPathFound { .. }));
    }
}
