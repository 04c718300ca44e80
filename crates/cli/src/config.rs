//! Application configuration: TOML file, then environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `CODEGEN_*`
//! environment variables, command-line flags (applied by the caller). The API
//! key is deliberately absent; it is read from `GOOGLE_API_KEY` only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use llm::GeminiConfig;
use serde::Deserialize;

/// File loaded when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "codegen.toml";

pub const MODEL_ENV: &str = "CODEGEN_MODEL";
pub const BASE_URL_ENV: &str = "CODEGEN_BASE_URL";
pub const BIND_ENV: &str = "CODEGEN_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSettings {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: llm::DEFAULT_MODEL.to_string(),
            base_url: llm::DEFAULT_BASE_URL.to_string(),
            timeout_secs: llm::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration for this process.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let config = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };

        config
            .with_env_overrides(|name| std::env::var(name).ok())
            .validated()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `CODEGEN_*` overrides; blank values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(model) = get(MODEL_ENV) {
            self.llm.model = model;
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            self.llm.base_url = base_url;
        }
        if let Some(bind) = get(BIND_ENV) {
            self.server.bind = bind;
        }
        self
    }

    pub fn validated(self) -> Result<Self> {
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.llm.base_url.trim().is_empty() {
            bail!("llm.base_url must not be empty");
        }
        if self.llm.timeout_secs == 0 {
            bail!("llm.timeout_secs must be greater than zero");
        }
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }
        Ok(self)
    }

    /// Builds the provider config around a credential obtained elsewhere.
    pub fn gemini_config(&self, api_key: impl Into<String>) -> GeminiConfig {
        GeminiConfig::new(api_key)
            .with_model(self.llm.model.clone())
            .with_base_url(self.llm.base_url.clone())
            .with_timeout(Duration::from_secs(self.llm.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.llm.model, llm::DEFAULT_MODEL);
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [llm]
            model = "gemini-2.5-pro"

            [server]
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.base_url, llm::DEFAULT_BASE_URL);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_toml("[llm]\napi_key = \"x\"\n").is_err());
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let config = AppConfig::from_toml("[llm]\nmodel = \"from-file\"\n")
            .unwrap()
            .with_env_overrides(|name| match name {
                MODEL_ENV => Some("from-env".into()),
                BIND_ENV => Some("  ".into()),
                _ => None,
            });

        assert_eq!(config.llm.model, "from-env");
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let config = AppConfig::from_toml("[llm]\ntimeout_secs = 0\n").unwrap();
        assert!(config.validated().is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn file_is_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\ntimeout_secs = 30").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn gemini_config_carries_settings() {
        let config = AppConfig::from_toml("[llm]\nmodel = \"m\"\ntimeout_secs = 7\n").unwrap();
        let gemini = config.gemini_config("key");

        assert_eq!(gemini.api_key, "key");
        assert_eq!(gemini.model, "m");
        assert_eq!(gemini.timeout, Duration::from_secs(7));
    }
}
