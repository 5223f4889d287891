//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::IssuerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<IssuerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: IssuerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` if given, otherwise validate and return the defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<IssuerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = IssuerConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[issuance]\nwait_rounds = 8").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.issuance.wait_rounds, 8);
        assert_eq!(config.token.unit_name, "STRM");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/issuer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[token\nunit_name = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[token]\nhuman_supply = 0\nunit_name = \"TOOLONGNAME\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("token.human_supply"));
        assert!(message.contains("token.unit_name"));
    }

    #[test]
    fn test_validation_errors_joined() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[issuance]\nwait_rounds = 0\noutput_path = \"\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: issuance.wait_rounds: must be > 0, \
             issuance.output_path: must not be empty"
        );
    }

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load_or_default(None).unwrap(), IssuerConfig::default());
    }
}
