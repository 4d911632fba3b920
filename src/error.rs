use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Setup failures that stop the runner before any scenario starts.
///
/// Scenario failures never show up here; they are `FailureSignal`s and
/// always end in a report line.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("unknown scenario '{name}' (available: {available})")]
    UnknownScenario { name: String, available: String },

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl CatalogError {
    /// Process exit code for a setup failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CatalogError::UnknownScenario { .. } => 2,
            CatalogError::Output(_) => 74,
            CatalogError::Io { .. }
            | CatalogError::ConfigParse(_)
            | CatalogError::InvalidConfig { .. } => 78,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scenario_display() {
        let error = CatalogError::UnknownScenario {
            name: "nope".to_string(),
            available: "divide, parse-integer".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("'nope'"));
        assert!(display.contains("divide, parse-integer"));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_config_errors_use_config_exit_code() {
        let error = CatalogError::InvalidConfig {
            field: "connect_timeout_ms",
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(error.exit_code(), 78);
        assert!(error.to_string().contains("connect_timeout_ms"));
    }

    #[test]
    fn test_output_error_exit_code() {
        let error = CatalogError::Output(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(error.exit_code(), 74);
        assert!(error.to_string().contains("closed"));
    }
}
