//! Engine configuration loaded from YAML.
//!
//! Every section has defaults, so an empty document is a valid configuration:
//!
//! ```yaml
//! traversability_default: 0.5
//! footprint:
//!   pass_threshold: 0.5
//!   circle_segments: 16
//! inclination:
//!   max_inclination: 0.5236
//! pipeline:
//!   filters:
//!     - type: slope
//!       critical_value: 0.6
//!       estimation_radius: 0.3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::filters::PipelineConfig;
use crate::query::{FootprintParams, InclinationParams};
use crate::types::{
    DEFAULT_MAX_INCLINATION, DEFAULT_PASS_THRESHOLD, DEFAULT_TRAVERSABILITY, LAYER_ELEVATION,
    TraversabilityError,
};

fn deserialize_unit_interval<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(
            "traversability values must be in the range [0.0, 1.0]",
        ))
    }
}

fn deserialize_inclination<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if (0.0..=std::f64::consts::FRAC_PI_2).contains(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(
            "max_inclination must be in the range [0, pi/2] radians",
        ))
    }
}

fn default_traversability() -> f64 {
    DEFAULT_TRAVERSABILITY
}

/// Polygon aggregation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootprintSection {
    #[serde(
        default = "default_pass_threshold",
        deserialize_with = "deserialize_unit_interval"
    )]
    pub pass_threshold: f64,

    /// Vertices used to approximate a circular footprint.
    #[serde(default = "default_circle_segments")]
    pub circle_segments: usize,
}

fn default_pass_threshold() -> f64 {
    DEFAULT_PASS_THRESHOLD
}

fn default_circle_segments() -> usize {
    16
}

impl Default for FootprintSection {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            circle_segments: default_circle_segments(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InclinationSection {
    /// Radians.
    #[serde(
        default = "default_max_inclination",
        deserialize_with = "deserialize_inclination"
    )]
    pub max_inclination: f64,
}

fn default_max_inclination() -> f64 {
    DEFAULT_MAX_INCLINATION
}

impl Default for InclinationSection {
    fn default() -> Self {
        Self {
            max_inclination: default_max_inclination(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Traversability of cells and regions without known data.
    #[serde(
        default = "default_traversability",
        deserialize_with = "deserialize_unit_interval"
    )]
    pub traversability_default: f64,

    #[serde(default)]
    pub footprint: FootprintSection,

    #[serde(default)]
    pub inclination: InclinationSection,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            traversability_default: default_traversability(),
            footprint: FootprintSection::default(),
            inclination: InclinationSection::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraversabilityError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, TraversabilityError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn footprint_params(&self) -> FootprintParams {
        FootprintParams {
            pass_threshold: self.footprint.pass_threshold,
            default_traversability: self.traversability_default,
            layer: self.pipeline.output_layer.clone(),
        }
    }

    pub fn inclination_params(&self) -> InclinationParams {
        InclinationParams {
            max_inclination: self.inclination.max_inclination,
            layer: self
                .pipeline
                .base_layers
                .first()
                .cloned()
                .unwrap_or_else(|| LAYER_ELEVATION.to_string()),
        }
    }
}
