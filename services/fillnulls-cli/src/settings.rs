//! Layered configuration: defaults, then a YAML file, then environment
//! variables, then command-line flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fillnulls::FillNullsConfig;
use grid_processor::RstConfig;
use serde::{Deserialize, Serialize};

/// Everything a run can be configured with.
///
/// ```yaml
/// fill:
///   tension: 40.0
///   smooth: 0.1
///   segment_threshold: 600
///   overwrite: false
/// rst:
///   segmax: 40
///   npmin: 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fill: FillNullsConfig,
    pub rst: RstConfig,
}

/// Values given on the command line; `None` leaves the layer below.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub tension: Option<f64>,
    pub smooth: Option<f64>,
    pub overwrite: bool,
}

impl Settings {
    /// Parse settings from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("invalid configuration document")
    }

    /// Load settings from a YAML file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("failed to parse config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `FILLNULLS_*` and `RST_*` environment variables.
    pub fn with_env_overrides(self) -> Self {
        Self {
            fill: self.fill.with_env_overrides(),
            rst: self.rst.with_env_overrides(),
        }
    }

    /// Apply command-line flags.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(tension) = overrides.tension {
            self.fill.tension = tension;
        }
        if let Some(smooth) = overrides.smooth {
            self.fill.smooth = smooth;
        }
        if overrides.overwrite {
            self.fill.overwrite = true;
        }
        // The spline always runs with the fill's tension and smoothing.
        self.rst.tension = self.fill.tension;
        self.rst.smooth = self.fill.smooth;
        self
    }

    /// Check both sections.
    pub fn validate(&self) -> Result<()> {
        self.fill
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid fill settings")?;
        self.rst
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid spline settings")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::scratch_dir;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_document() {
        let settings = Settings::from_yaml_str(
            "fill:\n  tension: 20.0\nrst:\n  npmin: 120\n",
        )
        .unwrap();
        assert_eq!(settings.fill.tension, 20.0);
        assert_eq!(settings.fill.smooth, 0.1);
        assert_eq!(settings.rst.npmin, 120);
        assert_eq!(settings.rst.segmax, 40);
    }

    #[test]
    fn test_bad_document_is_an_error() {
        assert!(Settings::from_yaml_str("fill: [1, 2]").is_err());
    }

    #[test]
    fn test_flags_take_precedence() {
        let settings = Settings::from_yaml_str("fill:\n  tension: 20.0\n  smooth: 0.5\n")
            .unwrap()
            .with_overrides(&Overrides {
                tension: Some(60.0),
                smooth: None,
                overwrite: true,
            });
        assert_eq!(settings.fill.tension, 60.0);
        assert_eq!(settings.fill.smooth, 0.5);
        assert!(settings.fill.overwrite);
        assert_eq!(settings.rst.tension, 60.0);
        assert_eq!(settings.rst.smooth, 0.5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = scratch_dir("fillnulls-cli");
        let path = dir.path().join("fillnulls.yaml");
        fs::write(&path, "fill:\n  segment_threshold: 100\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.fill.segment_threshold, 100);
        assert!(Settings::load(Some(&dir.path().join("missing.yaml"))).is_err());
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_validation() {
        let settings = Settings::default().with_overrides(&Overrides {
            tension: Some(0.0),
            ..Overrides::default()
        });
        assert!(settings.validate().is_err());
        assert!(Settings::default().validate().is_ok());
    }
}
