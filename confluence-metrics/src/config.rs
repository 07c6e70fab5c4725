use crate::{Error, Result};
use serde_derive::*;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable pointing at a JSON weight file.
pub const WEIGHTS_FILE_ENV: &str = "CONFLUENCE_WEIGHTS_FILE";

/// Static per-level weights of the inter-period confluence, keyed by level name.
///
/// Levels without an entry weigh 1.0, so the default configuration is neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(default)]
    pub cosmic_weights: BTreeMap<String, f64>,
}

impl WeightConfig {
    pub fn weight(&self, name: &str) -> f64 {
        self.cosmic_weights.get(name).cloned().unwrap_or(1.0)
    }

    pub fn with_weight(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.cosmic_weights.insert(name.into(), weight);
        self
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let config: WeightConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error(format!(
                "failed to read weight file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Load from the file named by `CONFLUENCE_WEIGHTS_FILE`, neutral weights if unset.
    pub fn from_env() -> Result<Self> {
        match env::var(WEIGHTS_FILE_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, w) in &self.cosmic_weights {
            if !w.is_finite() || *w <= 0.0 {
                return Err(Error(format!("invalid weight for {}: {}", name, w)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_neutral() {
        let config = WeightConfig::default();
        assert_eq!(1.0, config.weight("Universe4h"));
        assert_eq!(1.0, config.weight("unknown"));
    }

    #[test]
    fn test_from_json() -> Result<()> {
        let config = WeightConfig::from_json(r#"{"cosmic_weights": {"Moon5m": 1.5, "Sun15m": 2}}"#)?;
        assert_eq!(1.5, config.weight("Moon5m"));
        assert_eq!(2.0, config.weight("Sun15m"));
        assert_eq!(1.0, config.weight("Wave"));
        assert_eq!(WeightConfig::default(), WeightConfig::from_json("{}")?);
        Ok(())
    }

    #[test]
    fn test_invalid_weights_rejected() {
        assert!(WeightConfig::from_json(r#"{"cosmic_weights": {"Moon5m": 0}}"#).is_err());
        assert!(WeightConfig::from_json(r#"{"cosmic_weights": {"Moon5m": -2.5}}"#).is_err());
        assert!(WeightConfig::from_json(r#"{"cosmic_weights": {"Moon5m": "x"}}"#).is_err());
        assert!(WeightConfig::default()
            .with_weight("Wave", f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let path = env::temp_dir().join(format!("confluence-weights-{}.json", std::process::id()));
        fs::write(&path, r#"{"cosmic_weights": {"Earth1m": 1.25}}"#)?;
        let config = WeightConfig::from_file(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(1.25, config.weight("Earth1m"));
        assert!(WeightConfig::from_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_from_env() -> Result<()> {
        env::remove_var(WEIGHTS_FILE_ENV);
        assert_eq!(WeightConfig::default(), WeightConfig::from_env()?);

        let path = env::temp_dir().join(format!("confluence-env-{}.json", std::process::id()));
        fs::write(&path, r#"{"cosmic_weights": {"Tide": 0.5}}"#)?;
        env::set_var(WEIGHTS_FILE_ENV, &path);
        let loaded = WeightConfig::from_env();
        env::remove_var(WEIGHTS_FILE_ENV);
        fs::remove_file(&path)?;
        assert_eq!(0.5, loaded?.weight("Tide"));
        Ok(())
    }
}
