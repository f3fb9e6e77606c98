use thiserror::Error;

/// Failures raised by the numeric core (resampling, combination, analysis).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumError {
    /// Raw data that cannot be interpolated: mismatched lengths, too few
    /// points, or a non-ascending / duplicate wavelength.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Two operands do not share the same wavelength grid.
    #[error("grid mismatch: expected {expected}, found {found}")]
    GridMismatch { expected: String, found: String },

    #[error("spectrum has no samples")]
    EmptySpectrum,

    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
