//! Error types
//!
//! Everything that can keep a visualization from reaching the frame loop,
//! plus the few misuse errors the frame loop itself can report.

use thiserror::Error;

use crate::app::LoadPhase;

/// Errors that can occur while loading or driving a visualization
#[derive(Error, Debug)]
pub enum VizError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bundle document could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// A relation or lookup named a node that does not exist
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Two nodes were declared with the same id
    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    /// A texture was assigned to a node that already has one
    #[error("texture already set for node: {0}")]
    TextureAlreadySet(String),

    /// A frame was requested before loading completed
    #[error("visualization not ready (phase: {0})")]
    NotReady(LoadPhase),

    /// A load phase was entered out of order
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidPhaseTransition {
        /// Phase the visualizer was in
        from: LoadPhase,
        /// Phase that was requested
        to: LoadPhase,
    },

    /// The configuration is invalid
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for visualization operations
pub type VizResult<T> = Result<T, VizError>;
