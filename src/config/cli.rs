use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::utils::error::Result;

impl CliConfig {
    /// 合併設定：先讀 TOML 檔（若有），再套用命令列覆寫
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(timeout) = self.timeout_secs {
            config.upstream.timeout_seconds = timeout;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let cli = CliConfig::default();
        let config = cli.resolve().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_cli_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"127.0.0.1\"\nport = 7000\n\n[upstream]\ntimeout_seconds = 20\n")
            .unwrap();

        let cli = CliConfig {
            config: Some(temp_file.path().to_string_lossy().into_owned()),
            port: Some(7100),
            timeout_secs: Some(3),
            ..CliConfig::default()
        };

        let config = cli.resolve().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:7100");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = CliConfig {
            config: Some("/nonexistent/osm-gateway.toml".to_string()),
            ..CliConfig::default()
        };
        assert!(cli.resolve().is_err());
    }
}
