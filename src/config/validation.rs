use crate::config::types::Config;
use crate::url::compile_patterns;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_start_pages(&config.start_pages)?;
    validate_parallelism(config.parallelism)?;
    compile_patterns(&config.ignored_urls)?;
    compile_patterns(&config.ignored_words)?;
    Ok(())
}

/// Validates the seed URLs
fn validate_start_pages(start_pages: &[String]) -> Result<(), ConfigError> {
    if start_pages.is_empty() {
        return Err(ConfigError::Validation(
            "startPages must contain at least one URL".to_string(),
        ));
    }

    for page in start_pages {
        let url = Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start page '{}': {}", page, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Start page must use http or https, got '{}'",
                page
            )));
        }
    }

    Ok(())
}

fn validate_parallelism(parallelism: usize) -> Result<(), ConfigError> {
    if parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be >= 1, got {}",
            parallelism
        )));
    }
    Ok(())
}
