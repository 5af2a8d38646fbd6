use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Remote section exists with a key (enforced by serde)
/// - Server port is not 0
/// - Page size stays within the catalog's accepted range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Remote catalog validation
    if config.remote.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "remote.api_key cannot be empty".to_string(),
        ));
    }
    if config.remote.page_size == 0 || config.remote.page_size > 40 {
        return Err(ConfigError::ValidationError(
            "remote.page_size must be between 1 and 40".to_string(),
        ));
    }

    Ok(())
}
