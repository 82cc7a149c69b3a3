use crate::backend::types::RiskTolerance;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub review: ReviewConfig,
}

// ── Backend endpoint ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the triage service (default: http://127.0.0.1:5000)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Review defaults ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Which dataset column holds the ticket text (default: feedback)
    #[serde(default = "default_text_column")]
    pub text_column: String,
    /// How aggressively the backend may auto-resolve (default: balanced)
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
}

fn default_text_column() -> String {
    "feedback".into()
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            text_column: default_text_column(),
            risk_tolerance: RiskTolerance::default(),
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".triagedesk").join("config.toml"),
            backend: BackendConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend.base_url)
            .with_context(|| format!("invalid backend base_url: {}", self.backend.base_url))?;
        if self.review.text_column.trim().is_empty() {
            anyhow::bail!("review.text_column must not be empty");
        }
        Ok(())
    }

    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let triagedesk_dir = home.join(".triagedesk");
        let config_path = triagedesk_dir.join("config.toml");

        if !triagedesk_dir.exists() {
            fs::create_dir_all(&triagedesk_dir)
                .context("Failed to create .triagedesk directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed path that is skipped during serialization
            config.config_path = config_path;
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        } else {
            let mut config = Self {
                config_path,
                ..Self::default()
            };
            config.apply_env_overrides();
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // Backend endpoint: TRIAGEDESK_BACKEND_URL
        if let Ok(base_url) = std::env::var("TRIAGEDESK_BACKEND_URL") {
            if !base_url.is_empty() {
                self.backend.base_url = base_url;
            }
        }

        // Text column: TRIAGEDESK_TEXT_COLUMN
        if let Ok(column) = std::env::var("TRIAGEDESK_TEXT_COLUMN") {
            if !column.is_empty() {
                self.review.text_column = column;
            }
        }

        // Risk tolerance: TRIAGEDESK_RISK_TOLERANCE
        if let Ok(mode) = std::env::var("TRIAGEDESK_RISK_TOLERANCE") {
            match mode.to_lowercase().as_str() {
                "conservative" => self.review.risk_tolerance = RiskTolerance::Conservative,
                "balanced" => self.review.risk_tolerance = RiskTolerance::Balanced,
                "aggressive" => self.review.risk_tolerance = RiskTolerance::Aggressive,
                _ => {}
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.backend.timeout_secs, 120);
        assert_eq!(config.review.text_column, "feedback");
        assert_eq!(config.review.risk_tolerance, RiskTolerance::Balanced);
        assert!(config.config_path.to_string_lossy().contains(".triagedesk"));
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(parsed.review.text_column, "feedback");
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.backend.base_url = "https://triage.internal:8443".into();
        config.review.risk_tolerance = RiskTolerance::Aggressive;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.backend.base_url, config.backend.base_url);
        assert_eq!(parsed.review.risk_tolerance, RiskTolerance::Aggressive);
    }

    #[test]
    fn save_and_reload_preserve_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            config_path: dir.path().join("config.toml"),
            ..Config::default()
        };
        config.review.text_column = "message".into();
        config.save().unwrap();

        let contents = fs::read_to_string(&config.config_path).unwrap();
        let loaded: Config = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.review.text_column, "message");
    }

    #[test]
    fn env_overrides_replace_backend_and_mode() {
        let _guard = env_lock();
        // SAFETY: the env lock serializes all env-mutating tests.
        unsafe {
            std::env::set_var("TRIAGEDESK_BACKEND_URL", "http://10.0.0.9:9000");
            std::env::set_var("TRIAGEDESK_RISK_TOLERANCE", "aggressive");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var("TRIAGEDESK_BACKEND_URL");
            std::env::remove_var("TRIAGEDESK_RISK_TOLERANCE");
        }

        assert_eq!(config.backend.base_url, "http://10.0.0.9:9000");
        assert_eq!(config.review.risk_tolerance, RiskTolerance::Aggressive);
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.backend.base_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_text_column() {
        let mut config = Config::default();
        config.review.text_column = "  ".into();
        assert!(config.validate().is_err());
    }
}
