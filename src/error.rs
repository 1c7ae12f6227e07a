use crate::tree::NodeId;
use thiserror::Error;

/// Non-fatal findings produced while parsing a program string.
///
/// Malformed entries are dropped rather than rejected; these warnings only exist
/// so that callers can observe what was discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    #[error("Entry '{entry}' has {found} field(s), expected at least CLASS:FUNCTION:TARGET")]
    MissingFields { entry: String, found: usize },

    #[error("Entry '{entry}' has an empty {field} field")]
    EmptyField { entry: String, field: &'static str },
}

/// Errors that can occur while applying an edit command to a program tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Node '{0}' does not exist in this tree")]
    NodeNotFound(NodeId),

    #[error("Node '{0}' is not an entity node")]
    NotAnEntity(NodeId),

    #[error("Node '{0}' is not an action node")]
    NotAnAction(NodeId),

    #[error("Value '{0}' contains a separator and cannot be stored in a program")]
    InvalidToken(String),

    #[error("Class '{0}' is reserved for maintenance steps and cannot be edited")]
    MaintenanceClass(String),

    #[error("Param index {index} on node '{node_id}' exceeds the limit of {limit}")]
    ParamOutOfRange {
        node_id: NodeId,
        index: usize,
        limit: usize,
    },

    #[error("Cannot move node '{node_id}' to index {to_index}: only {len} sibling(s)")]
    MoveOutOfRange {
        node_id: NodeId,
        to_index: usize,
        len: usize,
    },
}

/// Errors reported by a `ProgramStore` collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected the request: {0}")]
    Rejected(String),

    #[error("Entity '{0}' not found")]
    NotFound(String),
}

/// Errors that can occur while loading an editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by an `EditorSession`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("No entity is selected")]
    NoSelection,

    #[error("The selected program has not been loaded yet")]
    NotLoaded,

    #[error("A commit is already in progress")]
    CommitInProgress,

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
