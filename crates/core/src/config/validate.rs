use super::{
    types::{Config, UpstreamSource},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Autocomplete limit is not 0
/// - Upstream timeout is not 0
/// - A file is configured when the upstream source is "file"
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.autocomplete_limit == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.autocomplete_limit cannot be 0".to_string(),
        ));
    }

    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.upstream.source == UpstreamSource::File && config.upstream.file.is_none() {
        return Err(ConfigError::ValidationError(
            "upstream.file is required when upstream.source = \"file\"".to_string(),
        ));
    }

    Ok(())
}
