//! Typed failures for graph operations.
//!
//! Every fallible operation in the engine returns [`GraphError`]. The enum
//! keeps one variant per concrete failure so callers can match precisely;
//! [`GraphError::kind`] collapses them onto the four-way taxonomy
//! ([`ErrorKind`]) when only the class of failure matters.
//!
//! Structural faults are detected before any mutation, so an `Err` from a
//! store operation means the graph is exactly as it was before the call
//! (batch vertex insertion is the one documented exception: it commits the
//! non-conflicting entries and reports every conflict at once).

use std::fmt;

use crate::id::VertexId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Machine-readable classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced vertex or edge does not exist.
    NotFound,
    /// A duplicate vertex identity or duplicate directed edge.
    AlreadyExists,
    /// The mutation would violate the graph's acyclicity constraint.
    InvalidTopology,
    /// No connecting path exists; a legitimate negative outcome, not a
    /// structural fault.
    NoRoute,
}

impl ErrorKind {
    /// Stable lowercase name for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidTopology => "invalid_topology",
            Self::NoRoute => "no_route",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GraphError
// ---------------------------------------------------------------------------

/// Any failure a graph operation can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The referenced vertex is not in the graph.
    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),

    /// No edge exists between the ordered pair.
    #[error("no edge from {from} to {to}")]
    EdgeNotFound {
        /// Source of the missing edge.
        from: VertexId,
        /// Destination of the missing edge.
        to: VertexId,
    },

    /// A vertex with this identity is already in the graph.
    #[error("vertex {0} already exists; use update_vertex_data to change its payload")]
    VertexExists(VertexId),

    /// Aggregated batch-insert report: every identity that was already
    /// present. Non-conflicting entries of the batch were committed.
    #[error("vertices already exist: {}", fmt_ids(.0))]
    VerticesExist(Vec<VertexId>),

    /// An edge between this ordered pair is already in the graph.
    #[error("edge from {from} to {to} already exists; use update_edge_data to change its payload")]
    EdgeExists {
        /// Source of the duplicate edge.
        from: VertexId,
        /// Destination of the duplicate edge.
        to: VertexId,
    },

    /// Adding the edge would close a cycle in a cycle-checked graph. The
    /// edge (and its undirected mirror, if any) was rolled back.
    #[error("edge from {from} to {to} would close a cycle")]
    CycleDetected {
        /// Source of the rejected edge.
        from: VertexId,
        /// Destination of the rejected edge.
        to: VertexId,
    },

    /// No path connects the two vertices.
    #[error("no route from {from} to {to}")]
    NoRoute {
        /// Requested source.
        from: VertexId,
        /// Requested destination.
        to: VertexId,
    },
}

impl GraphError {
    /// Classify this error onto the four-way taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VertexNotFound(_) | Self::EdgeNotFound { .. } => ErrorKind::NotFound,
            Self::VertexExists(_) | Self::VerticesExist(_) | Self::EdgeExists { .. } => {
                ErrorKind::AlreadyExists
            }
            Self::CycleDetected { .. } => ErrorKind::InvalidTopology,
            Self::NoRoute { .. } => ErrorKind::NoRoute,
        }
    }
}

fn fmt_ids(ids: &[VertexId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
