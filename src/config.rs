use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::dispatch::ReportFormat;
use crate::error::CatalogError;

/// Trigger inputs for the environmental scenarios plus output settings.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub missing_file: PathBuf,
    pub connect_target: String,
    pub connect_timeout_ms: u64,
    pub type_name: String,
    pub priority: i32,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: ReportFormat,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            missing_file: PathBuf::from("nonexistent.txt"),
            connect_target: "tcp://invalid-host:abc".to_string(),
            connect_timeout_ms: 250,
            type_name: "com.example.NonExistentClass".to_string(),
            priority: 11,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.connect_timeout_ms == 0 {
            return Err(CatalogError::InvalidConfig {
                field: "connect_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.type_name.trim().is_empty() {
            return Err(CatalogError::InvalidConfig {
                field: "type_name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.connect_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
priority = 5

[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.priority, 5);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(!config.output.color);
        assert_eq!(config.missing_file, PathBuf::from("nonexistent.txt"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_toml_str("connect_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig { field: "connect_timeout_ms", .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml_str("prority = 3").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "type_name = \"Missing\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.type_name, "Missing");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
