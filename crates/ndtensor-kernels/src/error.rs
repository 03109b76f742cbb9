//! Error type shared by every kernel in this crate.

use thiserror::Error;

/// Convenience alias for results returned by kernel routines.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Validation failure raised before a kernel writes any output.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    #[error("input length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("destination length {actual} is smaller than required {required}")]
    DestinationTooSmall { required: usize, actual: usize },
    #[error("{op} requires a non-empty input")]
    EmptyInput { op: &'static str },
    #[error("element width of {width} bytes is not supported by bitwise kernels")]
    UnsupportedElementWidth { width: usize },
    #[error("value at index {index} is not representable in the target element type")]
    NarrowingOverflow { index: usize },
    #[error("clamp lower bound exceeds upper bound")]
    InvalidBounds,
}

pub(crate) fn check_same_len(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(KernelError::LengthMismatch { left, right });
    }
    Ok(())
}

pub(crate) fn check_dst(required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(KernelError::DestinationTooSmall { required, actual });
    }
    Ok(())
}
