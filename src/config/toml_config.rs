use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub wikipedia: WikipediaConfig,
    pub justdial: JustdialConfig,
    pub overpass: OverpassConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            retry_attempts: 0,
            retry_delay_ms: 500,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub base_url: String,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JustdialConfig {
    pub base_url: String,
    pub max_concurrent_requests: usize,
}

impl Default for JustdialConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.justdial.com".to_string(),
            max_concurrent_requests: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api".to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OVERPASS_ENDPOINT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GatewayError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        validation::validate_range("upstream.timeout_seconds", self.upstream.timeout_seconds, 1, 300)?;
        validation::validate_range("upstream.retry_attempts", self.upstream.retry_attempts, 0, 5)?;
        validation::validate_non_empty_string("upstream.user_agent", &self.upstream.user_agent)?;

        validation::validate_url("wikipedia.base_url", &self.wikipedia.base_url)?;
        validation::validate_url("justdial.base_url", &self.justdial.base_url)?;
        validation::validate_positive_number(
            "justdial.max_concurrent_requests",
            self.justdial.max_concurrent_requests,
            1,
        )?;
        validation::validate_url("overpass.endpoint", &self.overpass.endpoint)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }

    fn retry_attempts(&self) -> u32 {
        self.upstream.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.upstream.retry_delay_ms)
    }

    fn user_agent(&self) -> &str {
        &self.upstream.user_agent
    }

    fn wikipedia_base_url(&self) -> &str {
        &self.wikipedia.base_url
    }

    fn justdial_base_url(&self) -> &str {
        &self.justdial.base_url
    }

    fn overpass_endpoint(&self) -> &str {
        &self.overpass.endpoint
    }

    fn max_concurrent_requests(&self) -> usize {
        self.justdial.max_concurrent_requests
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.retry_attempts(), 0);
        assert_eq!(config.wikipedia_base_url(), "https://en.wikipedia.org");
        assert_eq!(config.max_concurrent_requests(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8088

[upstream]
timeout_seconds = 5
retry_attempts = 2
retry_delay_ms = 100

[wikipedia]
base_url = "http://localhost:9000"

[justdial]
base_url = "http://localhost:9001"
max_concurrent_requests = 2

[overpass]
endpoint = "http://localhost:9002/api"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8088");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_attempts(), 2);
        assert_eq!(config.retry_delay(), Duration::from_millis(100));
        assert_eq!(config.justdial_base_url(), "http://localhost:9001");
        assert_eq!(config.max_concurrent_requests(), 2);
        assert_eq!(config.overpass_endpoint(), "http://localhost:9002/api");
        // 未指定的欄位沿用預設值
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("OSM_GATEWAY_TEST_OVERPASS", "https://overpass.test/api");

        let toml_content = r#"
[overpass]
endpoint = "${OSM_GATEWAY_TEST_OVERPASS}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.overpass.endpoint, "https://overpass.test/api");

        std::env::remove_var("OSM_GATEWAY_TEST_OVERPASS");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = TomlConfig::from_toml_str(
            r#"
[wikipedia]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(invalid_url.validate().is_err());

        let zero_timeout = TomlConfig::from_toml_str(
            r#"
[upstream]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(zero_timeout.validate().is_err());

        let zero_concurrency = TomlConfig::from_toml_str(
            r#"
[justdial]
max_concurrent_requests = 0
"#,
        )
        .unwrap();
        assert!(zero_concurrency.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, GatewayError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
port = 6001
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
