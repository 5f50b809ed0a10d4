//! Error types for the voxelization core.

use thiserror::Error;

/// Errors that can occur while repairing or voxelizing a layer.
#[derive(Error, Debug)]
pub enum RasterError {
    /// An edge could not be connected to any other edge within tolerance
    /// and the orphan policy is set to fail the layer.
    #[error("unrepairable geometry: {unmatched} edge(s) with no partner within tolerance")]
    UnrepairableGeometry {
        /// Number of edges left without a connection.
        unmatched: usize,
    },

    /// A segment produced a start event while already in the active set.
    #[error("duplicate start event for segment {segment} at x={x}")]
    DuplicateStart {
        /// Index of the offending segment in the edge list.
        segment: usize,
        /// Sweep coordinate of the event.
        x: f64,
    },

    /// A segment produced an end event without being in the active set.
    #[error("end event for inactive segment {segment} at x={x}")]
    MissingEnd {
        /// Index of the offending segment in the edge list.
        segment: usize,
        /// Sweep coordinate of the event.
        x: f64,
    },

    /// A column's fill state did not return to "outside" after all
    /// crossings were processed.
    #[error("fill parity did not return to outside at column {column}")]
    ParityLeak {
        /// The sweep column where parity leaked.
        column: i64,
    },

    /// Invalid voxelization settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for voxelization operations.
pub type Result<T> = std::result::Result<T, RasterError>;
