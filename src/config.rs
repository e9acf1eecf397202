//! Analysis configuration
//!
//! Supplied by the caller; the library owns no configuration state of its own.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::BoundingBox;

/// Plausible easting range for surveys in Benin (UTM zone 31N)
pub const BENIN_X_RANGE: (f64, f64) = (390000.0, 430000.0);

/// Plausible northing range for surveys in Benin (UTM zone 31N)
pub const BENIN_Y_RANGE: (f64, f64) = (650000.0, 1300000.0);

/// Canonical reference layers, in report order
pub const CANONICAL_LAYERS: [&str; 13] = [
    "aif",
    "air_proteges",
    "dpl",
    "dpm",
    "enregistrement individuel",
    "litige",
    "parcelles",
    "restriction",
    "tf_demembres",
    "tf_en_cours",
    "tf_etat",
    "titre_reconstitue",
    "zone_inondable",
];

/// Configuration for one analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Region a point must fall within to be considered plausible
    pub bounds: BoundingBox,

    /// Layers to evaluate, in report order
    pub layers: Vec<String>,

    /// Maximum number of layers kept in the layer cache
    pub max_cached_layers: usize,

    /// Layer count at which layers are evaluated on the thread pool
    pub parallel_min_layers: usize,

    /// Feature count at which one layer's features are scanned on the thread pool
    pub parallel_min_features: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::new(
                BENIN_X_RANGE.0,
                BENIN_X_RANGE.1,
                BENIN_Y_RANGE.0,
                BENIN_Y_RANGE.1,
            ),
            layers: CANONICAL_LAYERS.iter().map(|s| s.to_string()).collect(),
            max_cached_layers: 32,
            parallel_min_layers: 4,
            parallel_min_features: 2048,
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration that never uses the thread pool
    pub fn sequential() -> Self {
        Self {
            parallel_min_layers: usize::MAX,
            parallel_min_features: usize::MAX,
            ..Self::default()
        }
    }

    /// Replaces the validity region
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replaces the layer list
    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Parses and validates a JSON configuration; missing fields take defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let b = &self.bounds;
        if ![b.xmin, b.xmax, b.ymin, b.ymax].iter().all(|v| v.is_finite()) {
            return Err(Error::Config("bounds must be finite".to_string()));
        }
        if b.xmin > b.xmax || b.ymin > b.ymax {
            return Err(Error::Config(format!(
                "bounds are inverted: x [{}, {}], y [{}, {}]",
                b.xmin, b.xmax, b.ymin, b.ymax
            )));
        }

        if self.layers.is_empty() {
            return Err(Error::Config("layer list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for name in &self.layers {
            if name.trim().is_empty() {
                return Err(Error::Config("layer names must not be blank".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Config(format!("layer '{}' listed twice", name)));
            }
        }

        if self.max_cached_layers == 0 {
            return Err(Error::Config("max_cached_layers must be at least 1".to_string()));
        }
        if self.parallel_min_layers == 0 || self.parallel_min_features == 0 {
            return Err(Error::Config("parallel thresholds must be at least 1".to_string()));
        }

        Ok(())
    }
}
