use serde::Serialize;
use thiserror::Error;

use crate::kind::FailureKind;

/// Outcome of every catalog operation.
pub type OperationResult<T> = Result<T, FailureSignal>;

/// A classified failure, built where it happens and consumed once by the
/// dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind} in {origin}: {message}")]
pub struct FailureSignal {
    kind: FailureKind,
    message: String,
    origin: &'static str,
}

impl FailureSignal {
    pub fn new(kind: FailureKind, origin: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            origin,
        }
    }

    /// Build a signal from any error whose kind can be inferred from a
    /// reference to it.
    pub fn classify<E>(origin: &'static str, err: &E) -> Self
    where
        E: std::fmt::Display,
        for<'a> FailureKind: From<&'a E>,
    {
        Self::new(FailureKind::from(err), origin, err.to_string())
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> &'static str {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_display_includes_all_fields() {
        let signal =
            FailureSignal::new(FailureKind::OutOfRange, "index-access", "index 5 out of bounds");
        let display = signal.to_string();
        assert!(display.contains("out-of-range"));
        assert!(display.contains("index-access"));
        assert!(display.contains("index 5 out of bounds"));
    }

    #[test]
    fn test_classify_io_error() {
        let err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let signal = FailureSignal::classify("open-and-read-file", &err);
        assert_eq!(signal.kind(), FailureKind::ResourceNotFound);
        assert_eq!(signal.origin(), "open-and-read-file");
        assert_eq!(signal.message(), "no such file");
    }

    #[test]
    fn test_serializes_as_flat_record() {
        let signal = FailureSignal::new(FailureKind::DomainSpecific, "custom-validation", "nope");
        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "domain-specific",
                "message": "nope",
                "origin": "custom-validation",
            })
        );
    }
}
