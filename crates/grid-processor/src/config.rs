//! Configuration for the spline interpolator.

use serde::{Deserialize, Serialize};

/// Configuration for regularized spline with tension (RST) interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RstConfig {
    /// Tension: higher values make the surface stiffer near the samples
    /// and flatter between them.
    pub tension: f64,

    /// Smoothing: 0 passes exactly through every sample; larger values
    /// trade fidelity for noise tolerance.
    pub smooth: f64,

    /// Maximum number of points per quadtree segment when segmentation
    /// is automatic.
    pub segmax: usize,

    /// Number of nearest points used to fit each segment.
    pub npmin: usize,
}

impl Default for RstConfig {
    fn default() -> Self {
        Self {
            tension: 40.0,
            smooth: 0.1,
            segmax: 40,
            npmin: 300,
        }
    }
}

impl RstConfig {
    /// Create a configuration with the given tension and smoothing and
    /// default segmentation limits.
    pub fn new(tension: f64, smooth: f64) -> Self {
        Self {
            tension,
            smooth,
            ..Self::default()
        }
    }

    /// Apply `RST_*` environment variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("RST_TENSION") {
            if let Ok(tension) = val.parse() {
                self.tension = tension;
            }
        }

        if let Ok(val) = std::env::var("RST_SMOOTH") {
            if let Ok(smooth) = val.parse() {
                self.smooth = smooth;
            }
        }

        if let Ok(val) = std::env::var("RST_SEGMAX") {
            if let Ok(segmax) = val.parse() {
                self.segmax = segmax;
            }
        }

        if let Ok(val) = std::env::var("RST_NPMIN") {
            if let Ok(npmin) = val.parse() {
                self.npmin = npmin;
            }
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

        if self.segmax == 0 {
            return Err("segmax must be > 0".to_string());
        }

        if self.npmin < 2 {
            return Err("npmin must be >= 2".to_string());
        }

        Ok(())
    }
}

/// How the interpolator partitions the point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Segmentation {
    /// One global fit over every point.
    #[default]
    Disabled,
    /// Quadtree segmentation with `RstConfig::segmax` points per segment.
    Auto,
}

impl Segmentation {
    /// Points-per-segment limit, or `None` for a single global fit.
    pub fn max_points(&self, config: &RstConfig) -> Option<usize> {
        match self {
            Segmentation::Disabled => None,
            Segmentation::Auto => Some(config.segmax),
        }
    }

    /// Whether the point set will be partitioned.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Segmentation::Disabled)
    }
}

impl std::fmt::Display for Segmentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segmentation::Disabled => write!(f, "disabled"),
            Segmentation::Auto => write!(f, "auto"),
        }
    }
}
