//! Declarative filter pipeline configuration.
//!
//! ```yaml
//! base_layers: [elevation]
//! output_layer: traversability
//! filters:
//!   - type: slope
//!     critical_value: 0.6
//!     estimation_radius: 0.3
//!   - type: step
//!     critical_value: 0.12
//!     first_window_radius: 0.08
//!     second_window_radius: 0.08
//!     critical_cell_number: 4
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{
    ConfigError, LAYER_ELEVATION, LAYER_ROBOT_SLOPE, LAYER_ROUGHNESS, LAYER_SLOPE, LAYER_STEP,
    LAYER_TRAVERSABILITY,
};

use super::{Filter, RobotSlopeFilter, RoughnessFilter, SlopeFilter, StepFilter};

fn default_elevation() -> String {
    LAYER_ELEVATION.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlopeConfig {
    #[serde(default = "default_slope_name")]
    pub name: String,
    #[serde(default = "default_elevation")]
    pub input: String,
    #[serde(default = "default_slope_name")]
    pub output: String,
    pub critical_value: f64,
    pub estimation_radius: f64,
}

fn default_slope_name() -> String {
    LAYER_SLOPE.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(default = "default_step_name")]
    pub name: String,
    #[serde(default = "default_elevation")]
    pub input: String,
    #[serde(default = "default_step_name")]
    pub output: String,
    pub critical_value: f64,
    pub first_window_radius: f64,
    pub second_window_radius: f64,
    pub critical_cell_number: usize,
}

fn default_step_name() -> String {
    LAYER_STEP.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoughnessConfig {
    #[serde(default = "default_roughness_name")]
    pub name: String,
    #[serde(default = "default_elevation")]
    pub input: String,
    #[serde(default = "default_roughness_name")]
    pub output: String,
    pub critical_value: f64,
    pub estimation_radius: f64,
}

fn default_roughness_name() -> String {
    LAYER_ROUGHNESS.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotSlopeConfig {
    #[serde(default = "default_robot_slope_name")]
    pub name: String,
    #[serde(default = "default_elevation")]
    pub input: String,
    #[serde(default = "default_robot_slope_name")]
    pub output: String,
    pub critical_value: f64,
    pub robot_radius: f64,
}

fn default_robot_slope_name() -> String {
    LAYER_ROBOT_SLOPE.to_string()
}

/// One stage descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    Slope(SlopeConfig),
    Step(StepConfig),
    Roughness(RoughnessConfig),
    RobotSlope(RobotSlopeConfig),
}

impl FilterConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Slope(c) => &c.name,
            Self::Step(c) => &c.name,
            Self::Roughness(c) => &c.name,
            Self::RobotSlope(c) => &c.name,
        }
    }

    /// Instantiate the stage, validating its parameters.
    pub fn build(&self) -> Result<Box<dyn Filter>, ConfigError> {
        Ok(match self {
            Self::Slope(c) => Box::new(SlopeFilter::with_layers(
                &c.name,
                &c.input,
                &c.output,
                c.critical_value,
                c.estimation_radius,
            )?),
            Self::Step(c) => Box::new(StepFilter::with_layers(
                &c.name,
                &c.input,
                &c.output,
                c.critical_value,
                c.first_window_radius,
                c.second_window_radius,
                c.critical_cell_number,
            )?),
            Self::Roughness(c) => Box::new(RoughnessFilter::with_layers(
                &c.name,
                &c.input,
                &c.output,
                c.critical_value,
                c.estimation_radius,
            )?),
            Self::RobotSlope(c) => Box::new(RobotSlopeFilter::with_layers(
                &c.name,
                &c.input,
                &c.output,
                c.critical_value,
                c.robot_radius,
            )?),
        })
    }
}

/// Ordered stage list plus the combination settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Layers the input grid must provide.
    #[serde(default = "default_base_layers")]
    pub base_layers: Vec<String>,

    /// Stages, applied in this order.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,

    /// Layers reduced into the output layer. Defaults to every stage output.
    #[serde(default)]
    pub risk_layers: Option<Vec<String>>,

    #[serde(default = "default_output_layer")]
    pub output_layer: String,
}

fn default_base_layers() -> Vec<String> {
    vec![LAYER_ELEVATION.to_string()]
}

fn default_output_layer() -> String {
    LAYER_TRAVERSABILITY.to_string()
}

impl Default for PipelineConfig {
    /// Slope, step, roughness and robot slope with parameters for a mid-sized
    /// wheeled robot on a 4 cm grid.
    fn default() -> Self {
        Self {
            base_layers: default_base_layers(),
            filters: vec![
                FilterConfig::Slope(SlopeConfig {
                    name: default_slope_name(),
                    input: default_elevation(),
                    output: default_slope_name(),
                    critical_value: 0.6,
                    estimation_radius: 0.3,
                }),
                FilterConfig::Step(StepConfig {
                    name: default_step_name(),
                    input: default_elevation(),
                    output: default_step_name(),
                    critical_value: 0.12,
                    first_window_radius: 0.08,
                    second_window_radius: 0.08,
                    critical_cell_number: 4,
                }),
                FilterConfig::Roughness(RoughnessConfig {
                    name: default_roughness_name(),
                    input: default_elevation(),
                    output: default_roughness_name(),
                    critical_value: 0.05,
                    estimation_radius: 0.3,
                }),
                FilterConfig::RobotSlope(RobotSlopeConfig {
                    name: default_robot_slope_name(),
                    input: default_elevation(),
                    output: default_robot_slope_name(),
                    critical_value: 0.4,
                    robot_radius: 0.5,
                }),
            ],
            risk_layers: None,
            output_layer: default_output_layer(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
