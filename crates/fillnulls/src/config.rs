//! Configuration for fill runs.

use serde::{Deserialize, Serialize};

/// Parameters of a fill run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillNullsConfig {
    /// Spline tension.
    pub tension: f64,

    /// Spline smoothing.
    pub smooth: f64,

    /// Boundary point count above which the interpolator segments.
    pub segment_threshold: usize,

    /// Replace an existing output raster.
    pub overwrite: bool,
}

impl Default for FillNullsConfig {
    fn default() -> Self {
        Self {
            tension: 40.0,
            smooth: 0.1,
            segment_threshold: 600,
            overwrite: false,
        }
    }
}

impl FillNullsConfig {
    /// Apply `FILLNULLS_*` environment variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("FILLNULLS_TENSION") {
            if let Ok(tension) = val.parse() {
                self.tension = tension;
            }
        }

        if let Ok(val) = std::env::var("FILLNULLS_SMOOTH") {
            if let Ok(smooth) = val.parse() {
                self.smooth = smooth;
            }
        }

        if let Ok(val) = std::env::var("FILLNULLS_SEGMENT_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.segment_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("FILLNULLS_OVERWRITE") {
            self.overwrite = val.to_lowercase() == "true" || val == "1";
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tension.is_finite() || self.tension <= 0.0 {
            return Err(format!("tension must be > 0, got {}", self.tension));
        }

        if !self.smooth.is_finite() || self.smooth < 0.0 {
            return Err(format!("smooth must be >= 0, got {}", self.smooth));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FillNullsConfig::default();
        assert_eq!(config.tension, 40.0);
        assert_eq!(config.smooth, 0.1);
        assert_eq!(config.segment_threshold, 600);
        assert!(!config.overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = FillNullsConfig::default();
        config.tension = 0.0;
        assert!(config.validate().is_err());

        let mut config = FillNullsConfig::default();
        config.smooth = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: FillNullsConfig = serde_json::from_str(r#"{"tension": 20.0}"#).unwrap();
        assert_eq!(config.tension, 20.0);
        assert_eq!(config.smooth, 0.1);
        assert_eq!(config.segment_threshold, 600);
    }
}
