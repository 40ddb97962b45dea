//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILCARD_CONFIG` (environment variable)
//! 2. `~/.config/mailcard/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailcard\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Marker appended after a body cut at the size ceiling.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated]";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Card body formatting.
    pub format: FormatConfig,
    /// Output limits imposed by the task-tracking service.
    pub limits: LimitsConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Card body formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// `strftime` format string for the `**Date:**` line (local time).
    pub date_format: String,
    /// A detected signature must be strictly longer than this many characters.
    pub signature_min_chars: usize,
    /// A detected signature must be strictly shorter than this many characters.
    pub signature_max_chars: usize,
}

/// Output limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Character ceiling for the card description (default: 16000).
    pub max_body_chars: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            signature_min_chars: 10,
            signature_max_chars: 300,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_chars: 16_000,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    match config_file_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Config::default(),
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "Loaded config");
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config, using defaults"
                );
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read config file, using defaults"
            );
            Config::default()
        }
    }
}

/// Write `config` as TOML to `path`, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILCARD_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("mailcard").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailcard")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("mailcard.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.format.signature_min_chars, 10);
        assert_eq!(cfg.format.signature_max_chars, 300);
        assert_eq!(cfg.limits.max_body_chars, 16_000);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.format.date_format, cfg.format.date_format);
        assert_eq!(parsed.limits.max_body_chars, cfg.limits.max_body_chars);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[limits]
max_body_chars = 500

[format]
signature_max_chars = 120
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.limits.max_body_chars, 500);
        assert_eq!(cfg.format.signature_max_chars, 120);
        // Other fields use defaults
        assert_eq!(cfg.format.signature_min_chars, 10);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_save_then_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.limits.max_body_chars = 4_000;
        cfg.format.signature_max_chars = 200;
        save_config(&cfg, &path).expect("save");

        let loaded = load_config_from(&path);
        assert_eq!(loaded.limits.max_body_chars, 4_000);
        assert_eq!(loaded.format.signature_max_chars, 200);
        assert_eq!(loaded.format.date_format, cfg.format.date_format);
    }

    #[test]
    fn test_unparseable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits\nmax_body_chars = ").expect("write");
        assert_eq!(load_config_from(&path).limits.max_body_chars, 16_000);
    }

    #[test]
    fn test_log_file_under_cache_override() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/mailcard-test"));
        let path = log_file_path(&cfg);
        assert_eq!(path, PathBuf::from("/tmp/mailcard-test/mailcard.log"));
        assert_eq!(path.parent(), Some(cache_dir(&cfg).as_path()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("mailcard.log"));
    }
}
