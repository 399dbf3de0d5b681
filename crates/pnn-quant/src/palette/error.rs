//! Error types for palette construction

use thiserror::Error;

/// Error returned when a palette cannot be built from the given colors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No colors provided
    #[error("palette cannot be empty")]
    Empty,
    /// More entries than a `u16` index can address
    #[error("palette has {0} colors, at most 65536 are supported")]
    TooManyColors(usize),
}
