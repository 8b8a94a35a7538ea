//! Error types for building a layout model

use crate::diagram::ObjectId;
use thiserror::Error;

/// Configuration errors detected while the model is being built.
///
/// These abort the run before anything reaches the solver. Infeasibility and
/// timeouts are not errors; they are reported through `SolveStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A link names an object that is not part of the set
    #[error("object '{from}' links to '{target}', which is not defined")]
    UnknownLink { from: String, target: String },

    #[error("object id {id} is used by both '{first}' and '{second}'")]
    DuplicateId {
        id: ObjectId,
        first: String,
        second: String,
    },

    #[error("object name '{name}' is defined more than once")]
    DuplicateName { name: String },

    #[error("object set has no link placeholder (id 0)")]
    MissingLinkObject,

    #[error("link placeholder '{name}' must not link to other objects")]
    LinkedPlaceholder { name: String },

    #[error("object '{name}' has an empty footprint ({rows}x{columns})")]
    EmptyFootprint {
        name: String,
        rows: usize,
        columns: usize,
    },

    /// A stencil was built from no rows or rows of unequal length
    #[error("invalid stencil: {reason}")]
    InvalidStencil { reason: String },

    /// Lookup of a placement variable that was never allocated
    #[error("no placement variable for object {object} at ({row}, {col})")]
    UnknownPlacement {
        row: usize,
        col: usize,
        object: ObjectId,
    },
}
