//! Terrain-analysis filter stages.
//!
//! A stage reads one or more layers of a [`LayeredGrid`] and produces exactly
//! one output layer of per-cell risk values in `[0, 1]` (1 = fully
//! traversable for that risk dimension). Stages never mutate their input; the
//! [`FilterPipeline`](crate::pipeline::FilterPipeline) inserts the returned
//! layer under [`Filter::output`].

pub mod config;
pub mod plane;
pub mod roughness;
pub mod slope;
pub mod step;

pub use config::{
    FilterConfig, PipelineConfig, RobotSlopeConfig, RoughnessConfig, SlopeConfig, StepConfig,
};
pub use roughness::RoughnessFilter;
pub use slope::{RobotSlopeFilter, SlopeFilter};
pub use step::StepFilter;

use crate::grid::{Grid2d, LayeredGrid};
use crate::types::{ConfigError, TraversabilityError, UNKNOWN, is_known};

/// Pipeline stage interface. Stages are applied in configured order; each
/// declares the layers it reads so the pipeline can validate ordering before
/// anything runs.
pub trait Filter: Send + Sync {
    /// Unique name of the stage within a pipeline.
    fn name(&self) -> &str;

    /// Layers read by [`apply`](Filter::apply).
    fn inputs(&self) -> Vec<&str>;

    /// Layer written with the result of [`apply`](Filter::apply).
    fn output(&self) -> &str;

    /// Compute the output layer. Unknown input cells yield unknown output
    /// cells unless the stage documents a default.
    fn apply(&self, grid: &LayeredGrid) -> Result<Grid2d<f64>, TraversabilityError>;
}

/// Linear risk mapping: 1 at zero, falling to 0 at `critical` and beyond.
#[inline]
pub fn risk(value: f64, critical: f64) -> f64 {
    if !is_known(value) {
        return UNKNOWN;
    }
    if value < critical {
        (1.0 - value / critical).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub(crate) fn ensure_positive(stage: &str, field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            stage: stage.to_string(),
            reason: format!("{field} must be positive, got {value}"),
        });
    }
    Ok(())
}

/// Largest neighbourhood radius a stage accepts (meters).
pub const MAX_WINDOW_RADIUS: f64 = 10.0;

pub(crate) fn ensure_radius(stage: &str, field: &str, value: f64) -> Result<(), ConfigError> {
    ensure_positive(stage, field, value)?;
    if value > MAX_WINDOW_RADIUS {
        return Err(ConfigError::InvalidParameter {
            stage: stage.to_string(),
            reason: format!("{field} must be at most {MAX_WINDOW_RADIUS} m, got {value}"),
        });
    }
    Ok(())
}

/// Stage backed by a closure, for risk dimensions without a dedicated type.
pub struct FnFilter<F> {
    name: String,
    inputs: Vec<String>,
    output: String,
    f: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&LayeredGrid) -> Result<Grid2d<f64>, TraversabilityError> + Send + Sync,
{
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<String>,
        output: impl Into<String>,
        f: F,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            output: output.into(),
            f,
        }
    }
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&LayeredGrid) -> Result<Grid2d<f64>, TraversabilityError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        self.inputs.iter().map(String::as_str).collect()
    }

    fn output(&self) -> &str {
        &self.output
    }

    fn apply(&self, grid: &LayeredGrid) -> Result<Grid2d<f64>, TraversabilityError> {
        (self.f)(grid)
    }
}

/// Cell-wise stage: `output[c] = f(input[c])`. Unknown inputs stay unknown
/// unless `f` maps them to a value.
pub fn map_layer<G>(
    name: impl Into<String>,
    input: impl Into<String>,
    output: impl Into<String>,
    f: G,
) -> FnFilter<impl Fn(&LayeredGrid) -> Result<Grid2d<f64>, TraversabilityError> + Send + Sync>
where
    G: Fn(f64) -> f64 + Send + Sync,
{
    let input = input.into();
    let inputs = vec![input.clone()];
    FnFilter::new(name, inputs, output, move |grid: &LayeredGrid| {
        let source = grid.require_layer(&input)?;
        let data = source.data().iter().map(|v| f(*v)).collect();
        Grid2d::new(source.info().clone(), data)
    })
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use super::*;
    use crate::types::MapInfo;

    #[test]
    fn risk_is_linear_below_critical() {
        assert_eq!(risk(0.0, 0.5), 1.0);
        assert_eq!(risk(0.25, 0.5), 0.5);
        assert_eq!(risk(0.5, 0.5), 0.0);
        assert_eq!(risk(3.0, 0.5), 0.0);
        assert!(risk(UNKNOWN, 0.5).is_nan());
    }

    #[test]
    fn map_layer_applies_per_cell() {
        let mut grid = LayeredGrid::new(MapInfo::square(2, 1.0)).unwrap();
        grid.add_layer_filled("height", 0.1).unwrap();
        grid.layer_mut("height")
            .unwrap()
            .set(UVec2::new(1, 1), UNKNOWN)
            .unwrap();

        let stage = map_layer("clearance", "height", "clearance_risk", |h| risk(h, 0.2));
        assert_eq!(stage.inputs(), vec!["height"]);
        assert_eq!(stage.output(), "clearance_risk");

        let out = stage.apply(&grid).unwrap();
        assert_eq!(out.get(UVec2::new(0, 0)), Some(&0.5));
        assert!(out.get(UVec2::new(1, 1)).unwrap().is_nan());
    }

    #[test]
    fn map_layer_reports_missing_input() {
        let grid = LayeredGrid::new(MapInfo::square(2, 1.0)).unwrap();
        let stage = map_layer("clearance", "height", "clearance_risk", |h| h);
        assert!(matches!(
            stage.apply(&grid),
            Err(TraversabilityError::MissingLayer(name)) if name == "height"
        ));
    }
}
