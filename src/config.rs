use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Question returned when the prompt generator is unavailable.
pub const DEFAULT_FALLBACK_PROMPT: &str =
    "Could not fetch AI prompts at this time. How was your day?";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DaybookConfig {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout for model calls. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JournalConfig {
    /// How many of the newest log entries feed the reflection prompt context.
    pub prompt_context_entries: usize,
    pub fallback_prompt: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 9002,
            log_level: "info".into(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            timeout_secs: None,
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            prompt_context_entries: 3,
            fallback_prompt: DEFAULT_FALLBACK_PROMPT.into(),
        }
    }
}

/// Returns `~/.daybook/`, or `./.daybook/` when no home directory is known.
pub fn default_daybook_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".daybook")
}

/// Returns the default config file path: `~/.daybook/config.toml`
pub fn default_config_path() -> PathBuf {
    default_daybook_dir().join("config.toml")
}

impl DaybookConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DaybookConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (DAYBOOK_HOST, DAYBOOK_PORT,
    /// DAYBOOK_LOG_LEVEL, DAYBOOK_AI_BASE_URL, DAYBOOK_AI_MODEL).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DAYBOOK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("DAYBOOK_PORT is not a valid port: {val}"))?;
        }
        if let Ok(val) = std::env::var("DAYBOOK_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_AI_BASE_URL") {
            self.ai.base_url = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_AI_MODEL") {
            self.ai.model = val;
        }
        Ok(())
    }

    /// `host:port` the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DaybookConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.port, 9002);
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.ai.timeout_secs, None);
        assert_eq!(config.journal.prompt_context_entries, 3);
        assert_eq!(config.journal.fallback_prompt, DEFAULT_FALLBACK_PROMPT);
        assert_eq!(config.bind_addr(), "127.0.0.1:9002");
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 8080

[ai]
model = "gpt-4.1-mini"
timeout_secs = 20

[journal]
prompt_context_entries = 5
"#;
        let config: DaybookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.model, "gpt-4.1-mini");
        assert_eq!(config.ai.timeout_secs, Some(20));
        assert_eq!(config.journal.prompt_context_entries, 5);
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.ai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.journal.fallback_prompt, DEFAULT_FALLBACK_PROMPT);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DaybookConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.journal.prompt_context_entries, 3);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(DaybookConfig::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = DaybookConfig::default();
        std::env::set_var("DAYBOOK_HOST", "0.0.0.0");
        std::env::set_var("DAYBOOK_PORT", "7070");
        std::env::set_var("DAYBOOK_LOG_LEVEL", "trace");
        std::env::set_var("DAYBOOK_AI_MODEL", "local-model");
        std::env::set_var("DAYBOOK_AI_BASE_URL", "http://localhost:11434/v1");

        config.apply_env_overrides().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.ai.model, "local-model");
        assert_eq!(config.ai.base_url, "http://localhost:11434/v1");

        // Clean up
        std::env::remove_var("DAYBOOK_HOST");
        std::env::remove_var("DAYBOOK_PORT");
        std::env::remove_var("DAYBOOK_LOG_LEVEL");
        std::env::remove_var("DAYBOOK_AI_MODEL");
        std::env::remove_var("DAYBOOK_AI_BASE_URL");
    }
}
