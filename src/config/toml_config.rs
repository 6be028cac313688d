use crate::core::registry::ServiceRegistry;
use crate::utils::error::{Result, SocialworthError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("socialworth/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// When present, replaces the default enabled set entirely.
    pub enabled: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_concurrent")]
    pub concurrent: bool,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_concurrent() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            concurrent: default_concurrent(),
        }
    }
}

impl AggregatorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| SocialworthError::Config {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SocialworthError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target.url.as_deref()
    }

    pub fn enabled_services(&self) -> Option<&[String]> {
        self.services.enabled.as_deref()
    }
}

impl Validate for AggregatorConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.target_url() {
            validation::validate_url(url)?;
        }

        if let Some(services) = self.enabled_services() {
            for name in services {
                if !ServiceRegistry::contains(name) {
                    return Err(SocialworthError::Config {
                        message: format!(
                            "services.enabled: unknown service '{}'. Known services: {}",
                            name,
                            ServiceRegistry::names().collect::<Vec<_>>().join(", ")
                        ),
                    });
                }
            }
        }

        validation::validate_positive_number("http.timeout_seconds", self.http.timeout_seconds, 1)?;
        validation::validate_non_empty_string("http.user_agent", &self.http.user_agent)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = AggregatorConfig::from_toml_str(
            r#"
[target]
url = "https://example.com/article"

[services]
enabled = ["twitter", "Reddit"]

[http]
timeout_seconds = 3
user_agent = "share-bot/1.0"

[aggregation]
concurrent = false
"#,
        )
        .unwrap();

        assert_eq!(config.target_url(), Some("https://example.com/article"));
        assert_eq!(
            config.enabled_services(),
            Some(&["twitter".to_string(), "Reddit".to_string()][..])
        );
        assert_eq!(config.http.timeout(), Duration::from_secs(3));
        assert_eq!(config.http.user_agent, "share-bot/1.0");
        assert!(!config.aggregation.concurrent);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AggregatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, AggregatorConfig::default());
        assert_eq!(config.http.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.aggregation.concurrent);
        assert!(config.target_url().is_none());
        assert!(config.enabled_services().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SOCIALWORTH_TEST_TARGET", "https://example.org/from-env");
        let config = AggregatorConfig::from_toml_str(
            r#"
[target]
url = "${SOCIALWORTH_TEST_TARGET}"
"#,
        )
        .unwrap();

        assert_eq!(config.target_url(), Some("https://example.org/from-env"));
    }

    #[test]
    fn test_rejects_invalid_target_url() {
        let result = AggregatorConfig::from_toml_str(
            r#"
[target]
url = "not a url"
"#,
        );
        assert!(matches!(result, Err(SocialworthError::InvalidUrl { .. })));
    }

    #[test]
    fn test_rejects_unknown_service() {
        let result = AggregatorConfig::from_toml_str(
            r#"
[services]
enabled = ["twitter", "friendster"]
"#,
        );
        match result {
            Err(SocialworthError::Config { message }) => assert!(message.contains("friendster")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = AggregatorConfig::from_toml_str(
            r#"
[http]
timeout_seconds = 0
"#,
        );
        assert!(matches!(result, Err(SocialworthError::Config { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = AggregatorConfig::from_toml_str("[target\nurl = ");
        assert!(matches!(result, Err(SocialworthError::Config { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[target]\nurl = \"http://example.com\"").unwrap();

        let config = AggregatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.target_url(), Some("http://example.com"));
    }

    #[test]
    fn test_from_missing_file() {
        let result = AggregatorConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(SocialworthError::Io(_))));
    }
}
