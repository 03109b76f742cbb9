//! Error taxonomy surfaced by views, tensors, and shape transforms.

use ndtensor_kernels::KernelError;
use thiserror::Error;

/// Convenience alias for results returned throughout this crate.
pub type Result<T> = std::result::Result<T, TensorError>;

/// Failure raised by a tensor operation before any data is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("backing capacity {actual} is smaller than the {required} elements required")]
    Capacity { required: usize, actual: usize },
    #[error("shapes cannot broadcast at dimension {dimension}: {left} vs {right}")]
    Broadcast {
        dimension: usize,
        left: usize,
        right: usize,
    },
    #[error("index {index} is out of range for dimension {dimension} of size {size}")]
    IndexOutOfRange {
        dimension: usize,
        index: usize,
        size: usize,
    },
    #[error("element width of {width} bytes is not supported")]
    UnsupportedElementWidth { width: usize },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Kernel(KernelError),
}

impl From<KernelError> for TensorError {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::LengthMismatch { left, right } => {
                TensorError::ShapeMismatch(format!("operand lengths differ: {left} vs {right}"))
            }
            KernelError::DestinationTooSmall { required, actual } => {
                TensorError::Capacity { required, actual }
            }
            KernelError::UnsupportedElementWidth { width } => {
                TensorError::UnsupportedElementWidth { width }
            }
            other => TensorError::Kernel(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_errors_map_into_the_taxonomy() {
        let err: TensorError = KernelError::LengthMismatch { left: 2, right: 3 }.into();
        assert!(matches!(err, TensorError::ShapeMismatch(_)));

        let err: TensorError = KernelError::DestinationTooSmall {
            required: 4,
            actual: 1,
        }
        .into();
        assert_eq!(
            err,
            TensorError::Capacity {
                required: 4,
                actual: 1
            }
        );

        let err: TensorError = KernelError::UnsupportedElementWidth { width: 16 }.into();
        assert_eq!(err, TensorError::UnsupportedElementWidth { width: 16 });

        let err: TensorError = KernelError::EmptyInput { op: "mean" }.into();
        assert!(matches!(err, TensorError::Kernel(_)));
    }
}
