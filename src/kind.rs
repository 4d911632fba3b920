use std::fmt;
use std::io;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// Closed set of failure categories.
///
/// Every kind is recoverable: the dispatcher reports it and the caller
/// carries on. Adding a variant forces every `match` in the crate to say
/// how the new kind is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    ResourceNotFound,
    EndOfStream,
    MalformedInput,
    InvalidArgument,
    InvalidState,
    OutOfRange,
    InvalidTypeConversion,
    DomainSpecific,
}

impl FailureKind {
    pub const ALL: [FailureKind; 8] = [
        FailureKind::ResourceNotFound,
        FailureKind::EndOfStream,
        FailureKind::MalformedInput,
        FailureKind::InvalidArgument,
        FailureKind::InvalidState,
        FailureKind::OutOfRange,
        FailureKind::InvalidTypeConversion,
        FailureKind::DomainSpecific,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FailureKind::ResourceNotFound => "resource-not-found",
            FailureKind::EndOfStream => "end-of-stream",
            FailureKind::MalformedInput => "malformed-input",
            FailureKind::InvalidArgument => "invalid-argument",
            FailureKind::InvalidState => "invalid-state",
            FailureKind::OutOfRange => "out-of-range",
            FailureKind::InvalidTypeConversion => "invalid-type-conversion",
            FailureKind::DomainSpecific => "domain-specific",
        }
    }

    /// All kinds downgrade to a reported, non-fatal outcome.
    pub fn is_recoverable(self) -> bool {
        true
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Classification of std errors
// =============================================================================

impl From<&io::Error> for FailureKind {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FailureKind::ResourceNotFound,
            io::ErrorKind::UnexpectedEof => FailureKind::EndOfStream,
            io::ErrorKind::InvalidInput => FailureKind::InvalidArgument,
            io::ErrorKind::PermissionDenied => FailureKind::InvalidState,
            // Connection errors and corrupt data both land here; the catalog
            // treats any external resource failure as bad input.
            _ => FailureKind::MalformedInput,
        }
    }
}

impl From<&ParseIntError> for FailureKind {
    fn from(_: &ParseIntError) -> Self {
        FailureKind::MalformedInput
    }
}

impl From<&url::ParseError> for FailureKind {
    fn from(_: &url::ParseError) -> Self {
        FailureKind::MalformedInput
    }
}
