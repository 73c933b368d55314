//! # Configuration
//!
//! Optional TOML configuration, loaded only when `--config PATH` is given.
//! Every field is optional; command-line flags override the file, and the file
//! overrides built-in defaults. The API key is never read from the file.
//!
//! ```toml
//! [gateway]
//! model = "claude-3-7-sonnet-latest"
//! max_tokens = 1024
//! timeout = "60s"
//!
//! [session]
//! max_chain_length = 25
//! greeting = true
//!
//! [tools]
//! edit_policy = "require_unique"
//! ```

use serde::{Deserialize, Serialize};
use skiff_gateway::GatewayConfig;
use skiff_tools::ToolsConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How the orchestration loop behaves between human turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionProfile {
    /// Maximum consecutive tool-use turns before control returns to the
    /// human. `None` lets the model chain indefinitely.
    pub max_chain_length: Option<usize>,
    /// Print the banner on start.
    pub greeting: bool,
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            max_chain_length: None,
            greeting: true,
        }
    }
}

impl SessionProfile {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_chain_length == Some(0) {
            return Err(ConfigError::Invalid(
                "max_chain_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The `[gateway]` table. Unset fields keep the [`GatewayConfig`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySection {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    /// Human-readable duration such as `"30s"` or `"2m"`.
    pub timeout: Option<String>,
    pub system: Option<String>,
}

impl GatewaySection {
    pub fn timeout(&self) -> ConfigResult<Option<Duration>> {
        self.timeout.as_deref().map(parse_timeout).transpose()
    }

    /// Overlay the fields set in this section onto `config`.
    pub fn apply(&self, config: &mut GatewayConfig) -> ConfigResult<()> {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(api_version) = &self.api_version {
            config.api_version = api_version.clone();
        }
        if let Some(timeout) = self.timeout()? {
            config.timeout = Some(timeout);
        }
        if let Some(system) = &self.system {
            config.system = Some(system.clone());
        }
        Ok(())
    }
}

/// Parse a timeout such as `"90s"`. Zero is rejected.
pub fn parse_timeout(value: &str) -> ConfigResult<Duration> {
    let duration = humantime::parse_duration(value)
        .map_err(|e| ConfigError::Invalid(format!("invalid timeout '{value}': {e}")))?;
    if duration.is_zero() {
        return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
    }
    Ok(duration)
}

/// Complete file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkiffConfig {
    pub gateway: GatewaySection,
    pub session: SessionProfile,
    pub tools: ToolsConfig,
}

impl SkiffConfig {
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.session.validate()?;
        self.gateway.timeout()?;
        if self.gateway.max_tokens == Some(0) {
            return Err(ConfigError::Invalid("max_tokens must be at least 1".into()));
        }
        Ok(())
    }

    /// Gateway settings from the file, with the given key.
    pub fn gateway_config(&self, api_key: impl Into<String>) -> ConfigResult<GatewayConfig> {
        let mut config = GatewayConfig {
            api_key: api_key.into(),
            ..Default::default()
        };
        self.gateway.apply(&mut config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff_tools::EditPolicy;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SkiffConfig::from_toml_str("").unwrap();
        assert_eq!(config, SkiffConfig::default());
        assert!(config.session.greeting);
        assert_eq!(config.session.max_chain_length, None);
        assert_eq!(config.tools.edit_policy, EditPolicy::ReplaceAll);
    }

    #[test]
    fn full_file_is_applied() {
        let config = SkiffConfig::from_toml_str(
            r#"
            [gateway]
            model = "claude-sonnet-4-20250514"
            max_tokens = 4096
            timeout = "1m 30s"
            system = "You are a careful engineer."

            [session]
            max_chain_length = 8
            greeting = false

            [tools]
            edit_policy = "require_unique"
            "#,
        )
        .unwrap();

        let gateway = config.gateway_config("key").unwrap();
        assert_eq!(gateway.api_key, "key");
        assert_eq!(gateway.model, "claude-sonnet-4-20250514");
        assert_eq!(gateway.max_tokens, 4096);
        assert_eq!(gateway.timeout, Some(Duration::from_secs(90)));
        assert_eq!(gateway.system.as_deref(), Some("You are a careful engineer."));
        assert_eq!(gateway.base_url, "https://api.anthropic.com");

        assert_eq!(config.session.max_chain_length, Some(8));
        assert!(!config.session.greeting);
        assert_eq!(config.tools.edit_policy, EditPolicy::RequireUnique);
    }

    #[test]
    fn api_key_is_not_a_config_field() {
        let err = SkiffConfig::from_toml_str("[gateway]\napi_key = \"sk-ant\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_chain_length_is_invalid() {
        let err = SkiffConfig::from_toml_str("[session]\nmax_chain_length = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_timeout_is_invalid() {
        for value in ["soon", "0s"] {
            let err = SkiffConfig::from_toml_str(&format!("[gateway]\ntimeout = \"{value}\""))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{value}");
        }
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nmodel = \"from-file\"").unwrap();

        let config = SkiffConfig::load(file.path()).unwrap();
        assert_eq!(config.gateway.model.as_deref(), Some("from-file"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SkiffConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
