//! Error types for building surfaces and flood settings.
use thiserror::Error;

/// Errors raised while constructing a [`crate::surface::Surface`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// `Surface::from_rows` was given rows of unequal length.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while configuring a [`crate::flood::FloodFiller`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FloodError {
    #[error("a flood filler needs at least one worker slot")]
    NoWorkers,
}
