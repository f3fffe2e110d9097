//! Run configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    vectorizer::{corpus::IdfScope, evaluate::classify::{Strategy, Thresholds}},
};

/// Configuration of one trace-link run.
///
/// Loaded from TOML or built in code; CLI flags are applied on top by the
/// caller. Defaults reproduce the reference weighting and thresholds.
///
/// ```toml
/// strategy = 2
/// idf_scope = "collection"
/// parallel = true
///
/// [thresholds]
/// relative = 0.67
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// link selection policy, 0..=3
    pub strategy: i64,
    pub idf_scope: IdfScope,
    /// compute similarity rows on the rayon pool
    pub parallel: bool,
    pub thresholds: Thresholds,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            strategy: 0,
            idf_scope: IdfScope::Collection,
            parallel: true,
            thresholds: Thresholds::default(),
        }
    }
}

impl TraceConfig {
    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validating it, so overrides can be applied first
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a TOML string without validating it
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Selected strategy
    pub fn strategy(&self) -> Result<Strategy, ConfigError> {
        Strategy::try_from(self.strategy)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy()?;
        let t = &self.thresholds;
        for (field, value) in [("thresholds.fixed", t.fixed), ("thresholds.relative", t.relative)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        for (field, value) in [
            ("thresholds.adaptive_mean", t.adaptive_mean),
            ("thresholds.adaptive_max", t.adaptive_max),
            ("thresholds.adaptive_std", t.adaptive_std),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be a finite number".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = TraceConfig::default();
        assert_eq!(config.strategy().unwrap(), Strategy::Existence);
        assert_eq!(config.idf_scope, IdfScope::Collection);
        assert_eq!(config.thresholds.fixed, 0.25);
        assert_eq!(config.thresholds.relative, 0.67);
        assert_eq!(
            (config.thresholds.adaptive_mean, config.thresholds.adaptive_max, config.thresholds.adaptive_std),
            (1.1, 0.2, 1.9)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TraceConfig::from_toml("strategy = 3\nidf_scope = \"corpus\"\n[thresholds]\nfixed = 0.3\n").unwrap();
        assert_eq!(config.strategy().unwrap(), Strategy::Adaptive);
        assert_eq!(config.idf_scope, IdfScope::Corpus);
        assert_eq!(config.thresholds.fixed, 0.3);
        assert_eq!(config.thresholds.relative, 0.67);
        assert!(config.parallel);
    }

    #[test]
    fn out_of_range_strategy_is_rejected() {
        let config = TraceConfig { strategy: 9, ..TraceConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStrategy(9))));
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let mut config = TraceConfig::default();
        config.thresholds.relative = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { ref field, .. }) if field == "thresholds.relative"
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strategy = 1\nparallel = false").unwrap();
        let config = TraceConfig::load(file.path()).unwrap();
        assert_eq!(config.strategy().unwrap(), Strategy::FixedThreshold);
        assert!(!config.parallel);
    }

    #[test]
    fn load_reports_missing_and_invalid_files() {
        let missing = TraceConfig::load(Path::new("/nonexistent/tracelink.toml"));
        assert!(matches!(missing, Err(ConfigError::FileNotFound { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strategy = [").unwrap();
        assert!(matches!(TraceConfig::load(file.path()), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn read_defers_validation_to_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strategy = 7
parallel = false").unwrap();
        assert!(matches!(TraceConfig::load(file.path()), Err(ConfigError::InvalidStrategy(7))));

        let mut config = TraceConfig::read(file.path()).unwrap();
        assert_eq!(config.strategy, 7);
        config.strategy = 1;
        assert!(config.validate().is_ok());
        assert!(!config.parallel);
    }

    #[test]
    fn negative_strategy_is_reported_as_written() {
        let config = TraceConfig::from_toml("strategy = -1").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStrategy(-1))));
    }
}
