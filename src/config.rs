use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Settings for the demo walk-through. Every field is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub value: i32,
    pub array_len: usize,
    pub message: String,
    pub log_level: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            value: 42,
            array_len: 5,
            message: "Test message".to_string(),
            log_level: None,
        }
    }
}

impl DemoConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.array_len == 0 {
            return Err(ConfigError::Invalid {
                field: "array_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.value, 42);
        assert_eq!(config.array_len, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "value = 7").unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.value, 7);
        assert_eq!(config.array_len, 5);
        assert_eq!(config.message, "Test message");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = DemoConfig::from_toml("value = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = DemoConfig::from_toml("colour = \"red\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_array_len_rejected() {
        let result = DemoConfig::from_toml("array_len = 0");
        match result {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "array_len"),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = DemoConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
