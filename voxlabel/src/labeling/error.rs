//! Error types for connected component labeling.

use std::collections::TryReserveError;

use thiserror::Error;

use super::LabelId;

/// Errors that can occur while labeling a mask.
///
/// None of these are recoverable at the labeling layer: a well-formed mask
/// with a matching output buffer always labels successfully.
#[derive(Debug, Error)]
pub enum LabelingError {
    #[error("Label {label} is out of range for an equivalence table of {len} entries")]
    OutOfRange { label: LabelId, len: usize },

    #[error("Failed to allocate {what} ({requested} entries): {source}")]
    AllocationFailure {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Provisional label space exhausted after {allocated} labels")]
    LabelSpaceExhausted { allocated: usize },

    #[error("Label buffer is {actual:?} but the mask is {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("Failed to build labeling thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = LabelingError::OutOfRange { label: 12, len: 5 };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("5 entries"));
    }

    #[test]
    fn test_allocation_failure_has_source() {
        use std::error::Error as StdError;

        let source = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let err = LabelingError::AllocationFailure {
            what: "equivalence table",
            requested: usize::MAX,
            source,
        };
        assert!(err.to_string().contains("equivalence table"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = LabelingError::DimensionMismatch {
            expected: (4, 4, 2),
            actual: (4, 4, 3),
        };
        let msg = err.to_string();
        assert!(msg.contains("(4, 4, 2)"));
        assert!(msg.contains("(4, 4, 3)"));
    }
}
