//! Error taxonomy for ingestion, simulation and rendering
//!
//! Every fallible operation in the crate returns [`WatershedError`]. Variants are
//! grouped into four classes via [`WatershedError::kind`] so callers can decide
//! how to react: input and parameter errors abort the current operation without
//! producing a partial grid or image, render errors abort only that render call.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WatershedError>;

/// Broad class of a [`WatershedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty, degenerate or malformed sample data.
    Input,
    /// Simulation coefficients outside their documented bounds.
    Parameter,
    /// A pixel, accumulation or staging buffer could not be allocated.
    Allocation,
    /// Rasterization or encoding failed.
    Render,
}

/// Errors produced by the watershed pipeline.
#[derive(Debug, Error)]
pub enum WatershedError {
    /// The sample stream contained no triples at all.
    #[error("input contains no samples")]
    EmptyInput,

    /// The leading sample count was zero or negative.
    #[error("sample count must be positive, got {0}")]
    NonPositiveCount(i64),

    /// A token could not be parsed or the stream ended inside a triple.
    #[error("malformed input at token {token}: {message}")]
    MalformedInput { token: usize, message: String },

    /// Strict ingestion found a different number of triples than declared.
    #[error("header declares {declared} samples but {actual} were read")]
    CountMismatch { declared: usize, actual: usize },

    /// Samples cannot be arranged into a regular grid.
    #[error("irregular input: {0}")]
    IrregularInput(String),

    /// An operation was attempted on a grid without cells.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A simulation coefficient is outside its allowed range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Buffer allocation failed.
    #[error("failed to allocate {what} ({len} elements)")]
    Allocation { what: &'static str, len: usize },

    /// A render call could not produce an image.
    #[error("render failed: {0}")]
    Render(String),

    /// The caller-supplied encoder rejected a buffer.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Reading the sample stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatershedError {
    /// Taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WatershedError::EmptyInput
            | WatershedError::NonPositiveCount(_)
            | WatershedError::MalformedInput { .. }
            | WatershedError::CountMismatch { .. }
            | WatershedError::IrregularInput(_)
            | WatershedError::InvalidGrid(_)
            | WatershedError::Io(_) => ErrorKind::Input,
            WatershedError::InvalidParameter { .. } => ErrorKind::Parameter,
            WatershedError::Allocation { .. } => ErrorKind::Allocation,
            WatershedError::Render(_) | WatershedError::Encode(_) => ErrorKind::Render,
        }
    }
}

/// Allocate a zero-filled vector, reporting failure instead of aborting.
pub(crate) fn try_zeroed<T: Clone + Default>(what: &'static str, len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| WatershedError::Allocation { what, len })?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(WatershedError::EmptyInput.kind(), ErrorKind::Input);
        assert_eq!(
            WatershedError::IrregularInput("x".into()).kind(),
            ErrorKind::Input
        );
        let param = WatershedError::InvalidParameter {
            name: "flow_coef",
            value: 0.5,
            min: 0.0,
            max: 0.2,
        };
        assert_eq!(param.kind(), ErrorKind::Parameter);
        assert_eq!(
            WatershedError::Allocation { what: "pixels", len: 4 }.kind(),
            ErrorKind::Allocation
        );
        assert_eq!(WatershedError::Render("x".into()).kind(), ErrorKind::Render);
    }

    #[test]
    fn test_parameter_message() {
        let err = WatershedError::InvalidParameter {
            name: "evap_coef",
            value: 0.5,
            min: 0.9,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "evap_coef must be within [0.9, 1], got 0.5");
    }

    #[test]
    fn test_try_zeroed() {
        let buffer: Vec<u32> = try_zeroed("test", 16).unwrap();
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|&v| v == 0));
    }
}
