use crate::grid::{Grid2d, LayeredGrid};
use crate::types::{ConfigError, LAYER_ELEVATION, LAYER_ROUGHNESS, TraversabilityError};

use super::plane::PlaneFit;
use super::slope::plane_risk_layer;
use super::{Filter, ensure_positive, ensure_radius};

/// Roughness risk: spread of the terrain around its local best-fit plane.
#[derive(Debug, Clone)]
pub struct RoughnessFilter {
    name: String,
    input: String,
    output: String,
    /// Residual standard deviation (meters) at which risk reaches zero.
    critical_value: f64,
    estimation_radius: f64,
}

impl RoughnessFilter {
    pub fn new(critical_value: f64, estimation_radius: f64) -> Result<Self, ConfigError> {
        Self::with_layers(
            "roughness",
            LAYER_ELEVATION,
            LAYER_ROUGHNESS,
            critical_value,
            estimation_radius,
        )
    }

    pub fn with_layers(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        critical_value: f64,
        estimation_radius: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        ensure_positive(&name, "critical_value", critical_value)?;
        ensure_radius(&name, "estimation_radius", estimation_radius)?;
        Ok(Self {
            name,
            input: input.into(),
            output: output.into(),
            critical_value,
            estimation_radius,
        })
    }
}

impl Filter for RoughnessFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        vec![self.input.as_str()]
    }

    fn output(&self) -> &str {
        &self.output
    }

    fn apply(&self, grid: &LayeredGrid) -> Result<Grid2d<f64>, TraversabilityError> {
        plane_risk_layer(
            grid,
            &self.input,
            self.estimation_radius,
            self.critical_value,
            |fit: &PlaneFit| fit.residual_std,
        )
    }
}
