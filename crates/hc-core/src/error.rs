//! Error types for histconv

use thiserror::Error;

/// histconv error type
#[derive(Error, Debug)]
pub enum Error {
    /// The source histogram was never configured (no backing implementation).
    #[error("Histogram has a null impl pointer")]
    NullSource,

    /// The legacy 3D constructor has no overload for the given axis shapes.
    #[error("Unsupported TH3 axis configuration (no constructor from arguments {0})")]
    InhomogeneousAxes(String),

    /// Source and legacy bin numbering conventions disagree.
    #[error("Binning mismatch: {0}")]
    BinningMismatch(String),

    /// Axis index out of range for the target histogram class.
    #[error("{index} is not a valid axis index for {class}")]
    InvalidAxisIndex {
        /// Requested axis index.
        index: usize,
        /// Legacy class family (`TH1`, `TH2`, `TH3`).
        class: &'static str,
    },

    /// Axis parameters violate the binning invariants.
    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    /// Bin index outside the histogram.
    #[error("Invalid bin: {0}")]
    InvalidBin(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
