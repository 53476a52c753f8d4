// src/infra/config.rs — Configuration loading (TOML)

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::RulecatchError;
use crate::infra::paths::StorageLayout;

/// Upper bound for both staleness windows: one year.
pub const MAX_STALENESS_SECS: u64 = 365 * 24 * 60 * 60;
/// Upper bound for `injection.recent_days`.
pub const MAX_RECENT_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub injection: InjectionConfig,

    #[serde(default)]
    pub directive: DirectiveConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Messages shorter than this (trimmed, in chars) are never scored.
    pub min_message_len: usize,
    pub min_confidence: f32,
    /// Prior-turn records older than this are ignored for detection.
    pub staleness_secs: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_message_len: 15,
            min_confidence: 0.4,
            staleness_secs: 300,
        }
    }
}

impl DetectionConfig {
    /// The detection window. Values past `MAX_STALENESS_SECS` fall back to
    /// the default window.
    pub fn staleness(&self) -> Duration {
        bounded_secs(self.staleness_secs, Self::default().staleness_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    pub max_rules: usize,
    pub recent_days: i64,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            max_rules: 20,
            recent_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectiveConfig {
    pub max_existing_names: usize,
    pub max_files: usize,
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self {
            max_existing_names: 10,
            max_files: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    pub staleness_secs: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            staleness_secs: 1800,
        }
    }
}

impl CleanupConfig {
    pub fn staleness(&self) -> Duration {
        bounded_secs(self.staleness_secs, Self::default().staleness_secs)
    }
}

fn bounded_secs(secs: u64, default: u64) -> Duration {
    let secs = if secs <= MAX_STALENESS_SECS { secs } else { default };
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or_else(|| Duration::seconds(default as i64))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Name similarity (0-1) above which a new rule reinforces an existing one.
    pub dedup_similarity: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dedup_similarity: 0.85,
        }
    }
}

impl Config {
    /// Load `config.toml` from the storage root, falling back to defaults.
    pub fn load(layout: &StorageLayout) -> Result<Self, RulecatchError> {
        let path = layout.config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, RulecatchError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RulecatchError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RulecatchError> {
        let c = self.detection.min_confidence;
        if !(0.0..=1.0).contains(&c) {
            return Err(RulecatchError::Config(format!(
                "detection.min_confidence must be within [0, 1], got {c}"
            )));
        }
        for (key, secs) in [
            ("detection.staleness_secs", self.detection.staleness_secs),
            ("cleanup.staleness_secs", self.cleanup.staleness_secs),
        ] {
            if secs > MAX_STALENESS_SECS {
                return Err(RulecatchError::Config(format!(
                    "{key} must be at most {MAX_STALENESS_SECS}, got {secs}"
                )));
            }
        }
        let days = self.injection.recent_days;
        if !(0..=MAX_RECENT_DAYS).contains(&days) {
            return Err(RulecatchError::Config(format!(
                "injection.recent_days must be within [0, {MAX_RECENT_DAYS}], got {days}"
            )));
        }
        if !(0.0..=1.0).contains(&self.rules.dedup_similarity) {
            return Err(RulecatchError::Config(format!(
                "rules.dedup_similarity must be within [0, 1], got {}",
                self.rules.dedup_similarity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.detection.min_message_len, 15);
        assert!((c.detection.min_confidence - 0.4).abs() < 0.001);
        assert_eq!(c.detection.staleness_secs, 300);
        assert_eq!(c.cleanup.staleness_secs, 1800);
        assert_eq!(c.injection.max_rules, 20);
        assert_eq!(c.injection.recent_days, 7);
        assert_eq!(c.directive.max_existing_names, 10);
        assert_eq!(c.directive.max_files, 3);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.detection.min_message_len, 15);
        assert_eq!(config.injection.max_rules, 20);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[detection]
min_message_len = 20
min_confidence = 0.5
staleness_secs = 120

[injection]
max_rules = 5
recent_days = 14

[directive]
max_existing_names = 4
max_files = 2

[cleanup]
staleness_secs = 600

[rules]
dedup_similarity = 0.9
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.detection.min_message_len, 20);
        assert!((config.detection.min_confidence - 0.5).abs() < 0.001);
        assert_eq!(config.detection.staleness_secs, 120);
        assert_eq!(config.injection.max_rules, 5);
        assert_eq!(config.injection.recent_days, 14);
        assert_eq!(config.directive.max_files, 2);
        assert_eq!(config.cleanup.staleness_secs, 600);
        assert!((config.rules.dedup_similarity - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_load_missing_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(dir.path());
        let config = Config::load(&layout).unwrap();
        assert_eq!(config.detection.min_message_len, 15);
    }

    #[test]
    fn test_load_rejects_out_of_range_confidence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[detection]\nmin_message_len = 15\nmin_confidence = 1.5\nstaleness_secs = 300\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, RulecatchError::Config(_)));
    }

    #[test]
    fn test_load_rejects_oversized_windows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        for body in [
            "[detection]\nmin_message_len = 15\nmin_confidence = 0.4\nstaleness_secs = 10000000000000000\n",
            "[cleanup]\nstaleness_secs = 10000000000000000\n",
            "[injection]\nmax_rules = 20\nrecent_days = 9223372036854775807\n",
            "[injection]\nmax_rules = 20\nrecent_days = -1\n",
        ] {
            std::fs::write(&path, body).unwrap();
            let err = Config::load_from(&path).unwrap_err();
            assert!(matches!(err, RulecatchError::Config(_)), "{body}");
        }
    }

    #[test]
    fn test_out_of_range_window_falls_back() {
        let detection = DetectionConfig {
            staleness_secs: u64::MAX,
            ..DetectionConfig::default()
        };
        assert_eq!(detection.staleness(), Duration::minutes(5));

        let cleanup = CleanupConfig {
            staleness_secs: MAX_STALENESS_SECS,
        };
        assert_eq!(cleanup.staleness(), Duration::days(365));
    }

    #[test]
    fn test_load_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[detection\nbroken").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(RulecatchError::Config(_))
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(RulecatchError::Io(_))));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.detection.staleness_secs,
            config.detection.staleness_secs
        );
    }
}
