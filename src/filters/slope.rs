//! Slope risk from local plane fits.
//!
//! [`SlopeFilter`] looks at a small neighbourhood to catch local inclines;
//! [`RobotSlopeFilter`] fits over a window the size of the robot, which is what
//! the chassis actually tilts to.

use log::debug;

use crate::grid::{Grid2d, LayeredGrid};
use crate::iterators::Disc;
use crate::types::{
    ConfigError, LAYER_ELEVATION, LAYER_ROBOT_SLOPE, LAYER_SLOPE, TraversabilityError, UNKNOWN,
    is_known,
};

use super::plane::{PlaneFit, fit_neighbourhood};
use super::{Filter, ensure_positive, ensure_radius, risk};

/// Apply `risk(metric(plane), critical)` at every cell with a known elevation.
pub(crate) fn plane_risk_layer(
    grid: &LayeredGrid,
    input: &str,
    radius: f64,
    critical: f64,
    metric: impl Fn(&PlaneFit) -> f64,
) -> Result<Grid2d<f64>, TraversabilityError> {
    let elevation = grid.require_layer(input)?;
    let disc = Disc::new(radius, elevation.info().resolution);
    let mut buffer = Vec::with_capacity(disc.len());
    let mut unknown = 0usize;

    let out = Grid2d::from_fn(elevation.info().clone(), |cell| {
        let known = elevation.get(cell).is_some_and(|z| is_known(*z));
        let value = if known {
            fit_neighbourhood(elevation, cell, &disc, &mut buffer)
                .map(|fit| risk(metric(&fit), critical))
                .unwrap_or(UNKNOWN)
        } else {
            UNKNOWN
        };
        if !is_known(value) {
            unknown += 1;
        }
        value
    })?;

    debug!(
        "plane risk over '{}' (radius {:.3} m, {} cells): {} unknown",
        input,
        radius,
        disc.len(),
        unknown
    );
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct SlopeFilter {
    name: String,
    input: String,
    output: String,
    /// Maximum allowed slope (radians); risk reaches zero here.
    critical_value: f64,
    /// Neighbourhood radius for the plane fit (meters).
    estimation_radius: f64,
}

impl SlopeFilter {
    pub fn new(critical_value: f64, estimation_radius: f64) -> Result<Self, ConfigError> {
        Self::with_layers("slope", LAYER_ELEVATION, LAYER_SLOPE, critical_value, estimation_radius)
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

impl Filter for SlopeFilter {
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
            PlaneFit::slope,
        )
    }
}

#[derive(Debug, Clone)]
pub struct RobotSlopeFilter {
    name: String,
    input: String,
    output: String,
    /// Maximum allowed chassis inclination (radians).
    critical_value: f64,
    /// Radius of the window the robot rests on (meters).
    robot_radius: f64,
}

impl RobotSlopeFilter {
    pub fn new(critical_value: f64, robot_radius: f64) -> Result<Self, ConfigError> {
        Self::with_layers(
            "robot_slope",
            LAYER_ELEVATION,
            LAYER_ROBOT_SLOPE,
            critical_value,
            robot_radius,
        )
    }

    pub fn with_layers(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        critical_value: f64,
        robot_radius: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        ensure_positive(&name, "critical_value", critical_value)?;
        ensure_radius(&name, "robot_radius", robot_radius)?;
        Ok(Self {
            name,
            input: input.into(),
            output: output.into(),
            critical_value,
            robot_radius,
        })
    }
}

impl Filter for RobotSlopeFilter {
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
            self.robot_radius,
            self.critical_value,
            PlaneFit::slope,
        )
    }
}
