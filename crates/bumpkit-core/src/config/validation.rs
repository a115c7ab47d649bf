//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_workspace(config)?;
    validate_git(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_workspace(config: &Config) -> Result<()> {
    let manifest = &config.workspace.manifest;
    if manifest.is_empty() || manifest.contains(['/', '\\']) {
        return Err(invalid("workspace.manifest", "must be a plain file name").into());
    }

    for (i, pattern) in config.workspace.ignore.iter().enumerate() {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(invalid(format!("workspace.ignore[{}]", i), e.to_string()).into());
        }
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.branch.is_empty() {
        return Err(invalid("git.branch", "branch cannot be empty").into());
    }

    if !config.git.tag_format.contains("{version}") {
        return Err(invalid("git.tag_format", "must contain {version} placeholder").into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BumpkitError;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_invalid_tag_format() {
        let mut config = Config::default();
        config.git.tag_format = "no-placeholder".to_string();

        match validate_config(&config) {
            Err(BumpkitError::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "git.tag_format")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_bad_ignore_pattern() {
        let mut config = Config::default();
        config.workspace.ignore = vec!["docs/**".to_string(), "[".to_string()];

        match validate_config(&config) {
            Err(BumpkitError::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "workspace.ignore[1]")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_manifest_name() {
        let mut config = Config::default();
        config.workspace.manifest = "sub/package.json".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_branch() {
        let mut config = Config::default();
        config.git.branch.clear();
        assert!(validate_config(&config).is_err());
    }
}
