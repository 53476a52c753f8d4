// src/infra/errors.rs — Error types for rulecatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulecatchError {
    // User errors
    #[error("Unknown category '{value}' (expected one of: naming, error-handling, architecture, testing, style, imports, other)")]
    InvalidCategory { value: String },

    #[error("Rule '{id}' not found")]
    RuleNotFound { id: String },

    #[error("Confidence {value} is outside [0, 1]")]
    InvalidConfidence { value: f32 },

    // Signal table construction
    #[error("Invalid signal '{label}': {reason}")]
    InvalidSignal { label: String, reason: String },

    #[error("Invalid trigger pattern: {0}")]
    Pattern(#[from] regex::Error),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RulecatchError {
    /// Storage failures degrade to "nothing stored" instead of surfacing.
    pub fn is_storage(&self) -> bool {
        matches!(self, RulecatchError::Io(_) | RulecatchError::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_classification() {
        let io = RulecatchError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io.is_storage());

        let json = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(RulecatchError::Json(json).is_storage());

        let missing = RulecatchError::RuleNotFound { id: "x".into() };
        assert!(!missing.is_storage());
    }

    #[test]
    fn test_converts_into_anyhow_at_the_cli_edge() {
        fn handler() -> anyhow::Result<()> {
            let lookup: Result<(), RulecatchError> = Err(RulecatchError::RuleNotFound { id: "r-2".into() });
            lookup?;
            Ok(())
        }
        let err = handler().unwrap_err();
        assert_eq!(err.to_string(), "Rule 'r-2' not found");
        assert!(matches!(
            err.downcast_ref::<RulecatchError>(),
            Some(RulecatchError::RuleNotFound { .. })
        ));
    }

    #[test]
    fn test_messages() {
        let e = RulecatchError::InvalidCategory {
            value: "perf".into(),
        };
        assert!(e.to_string().starts_with("Unknown category 'perf'"));
        let e = RulecatchError::RuleNotFound { id: "r-1".into() };
        assert_eq!(e.to_string(), "Rule 'r-1' not found");
    }
}
