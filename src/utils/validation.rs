use crate::utils::error::{Result, SocialworthError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accepts absolute `http`/`https` URLs with a host.
pub fn validate_url(url_str: &str) -> Result<()> {
    let invalid = |reason: String| SocialworthError::InvalidUrl {
        url: url_str.to_string(),
        reason,
    };

    if url_str.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
            "http" | "https" => Err(invalid("URL has no host".to_string())),
            scheme => Err(invalid(format!("Unsupported URL scheme: {}", scheme))),
        },
        Err(e) => Err(invalid(format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SocialworthError::Config {
            message: format!("{} must be at least {} (got {})", field_name, min_value, value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SocialworthError::Config {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}
