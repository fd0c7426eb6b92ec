use std::fmt::Display;

use crate::cancel::CancelReason;
use crate::runtime::RuntimeError;

/// Why a single reference in a batch produced no success line
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("got empty request")]
    EmptyReference,
    #[error("multiple IDs found with provided prefix: {reference}")]
    AmbiguousReference { reference: String },
    #[error("no such container {reference}")]
    NotFound { reference: String },
    // the runtime's own message is the whole report
    #[error("{source}")]
    TransitionFailed {
        reference: String,
        source: RuntimeError,
    },
    #[error("failed to look up container {reference}: {source}")]
    RuntimeUnavailable {
        reference: String,
        source: RuntimeError,
    },
    #[error("failed to report result for {reference}: {source}")]
    Report {
        reference: String,
        source: std::io::Error,
    },
    #[error("{reference}: {reason}")]
    Cancelled {
        reference: String,
        reason: CancelReason,
    },
}

/// Aggregate failure of a batch: one entry per failed reference, in input
/// order. Displays as the per-reference messages joined by newlines.
#[derive(Debug)]
pub struct BatchError {
    failures: Vec<ReferenceError>,
}

impl BatchError {
    pub(crate) fn new(failures: Vec<ReferenceError>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[ReferenceError] {
        &self.failures
    }

    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

impl Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl std::error::Error for BatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerError;

    #[test]
    fn test_messages() {
        let cases = [
            (ReferenceError::EmptyReference, "got empty request"),
            (
                ReferenceError::AmbiguousReference {
                    reference: "ab".to_owned(),
                },
                "multiple IDs found with provided prefix: ab",
            ),
            (
                ReferenceError::NotFound {
                    reference: "xyz999".to_owned(),
                },
                "no such container xyz999",
            ),
            (
                ReferenceError::TransitionFailed {
                    reference: "ab".to_owned(),
                    source: RuntimeError::Container(ContainerError::NotRunning(
                        "abcdef".to_owned(),
                    )),
                },
                "container abcdef is not running",
            ),
            (
                ReferenceError::Cancelled {
                    reference: "ab".to_owned(),
                    reason: CancelReason::DeadlineExceeded,
                },
                "ab: deadline exceeded",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_batch_error_joins_lines() {
        let err = BatchError::new(vec![
            ReferenceError::NotFound {
                reference: "a".to_owned(),
            },
            ReferenceError::AmbiguousReference {
                reference: "b".to_owned(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "no such container a\nmultiple IDs found with provided prefix: b"
        );
        assert_eq!(err.failures().len(), 2);
    }
}
