//! Step risk: local height jumps such as curbs and stairs.
//!
//! Two passes. The first computes, per cell, the height span (max - min)
//! inside a small window. The second looks at a larger window and counts the
//! cells whose span is over the critical height: enough of them means a real
//! step, so the cell is impassable; a few isolated ones are treated as noise
//! and the largest remaining span drives the risk.

use log::debug;

use crate::grid::{Grid2d, LayeredGrid};
use crate::iterators::Disc;
use crate::types::{ConfigError, LAYER_ELEVATION, LAYER_STEP, TraversabilityError, UNKNOWN, is_known};

use super::{Filter, ensure_positive, ensure_radius, risk};

#[derive(Debug, Clone)]
pub struct StepFilter {
    name: String,
    input: String,
    output: String,
    /// Maximum step height the robot can climb (meters).
    critical_value: f64,
    first_window_radius: f64,
    second_window_radius: f64,
    /// Cells over the critical height needed in the second window to call it a step.
    critical_cell_number: usize,
}

impl StepFilter {
    pub fn new(
        critical_value: f64,
        first_window_radius: f64,
        second_window_radius: f64,
        critical_cell_number: usize,
    ) -> Result<Self, ConfigError> {
        Self::with_layers(
            "step",
            LAYER_ELEVATION,
            LAYER_STEP,
            critical_value,
            first_window_radius,
            second_window_radius,
            critical_cell_number,
        )
    }

    pub fn with_layers(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        critical_value: f64,
        first_window_radius: f64,
        second_window_radius: f64,
        critical_cell_number: usize,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        ensure_positive(&name, "critical_value", critical_value)?;
        ensure_radius(&name, "first_window_radius", first_window_radius)?;
        ensure_radius(&name, "second_window_radius", second_window_radius)?;
        if critical_cell_number == 0 {
            return Err(ConfigError::InvalidParameter {
                stage: name,
                reason: "critical_cell_number must be at least 1".to_string(),
            });
        }
        Ok(Self {
            name,
            input: input.into(),
            output: output.into(),
            critical_value,
            first_window_radius,
            second_window_radius,
            critical_cell_number,
        })
    }

    fn height_spans(&self, elevation: &Grid2d<f64>) -> Result<Grid2d<f64>, TraversabilityError> {
        let disc = Disc::new(self.first_window_radius, elevation.info().resolution);
        let (width, height) = (elevation.width(), elevation.height());
        Grid2d::from_fn(elevation.info().clone(), |cell| {
            if !elevation.get(cell).is_some_and(|z| is_known(*z)) {
                return UNKNOWN;
            }
            let (min, max) = disc
                .cells_around(cell, width, height)
                .filter_map(|c| elevation.get(c).copied())
                .filter(|z| is_known(*z))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
                    (lo.min(z), hi.max(z))
                });
            max - min
        })
    }
}

impl Filter for StepFilter {
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
        let elevation = grid.require_layer(&self.input)?;
        let spans = self.height_spans(elevation)?;
        let disc = Disc::new(self.second_window_radius, elevation.info().resolution);
        let (width, height) = (elevation.width(), elevation.height());
        let mut steps = 0usize;

        let out = Grid2d::from_fn(elevation.info().clone(), |cell| {
            if !spans.get(cell).is_some_and(|s| is_known(*s)) {
                return UNKNOWN;
            }
            let mut over = 0usize;
            let mut largest = 0.0f64;
            for span in disc
                .cells_around(cell, width, height)
                .filter_map(|c| spans.get(c).copied())
                .filter(|s| is_known(*s))
            {
                if span > self.critical_value {
                    over += 1;
                } else {
                    largest = largest.max(span);
                }
            }
            if over >= self.critical_cell_number {
                steps += 1;
                0.0
            } else {
                risk(largest, self.critical_value)
            }
        })?;

        debug!("step filter '{}': {} cells over critical step", self.name, steps);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use super::*;
    use crate::types::MapInfo;

    /// 12 x 5 map with a wall of `height` starting at column 6.
    fn stair(height: f64) -> LayeredGrid {
        let info = MapInfo {
            width: 12,
            height: 5,
            resolution: 0.1,
            ..Default::default()
        };
        let elevation = Grid2d::from_fn(info, |c| if c.x >= 6 { height } else { 0.0 }).unwrap();
        LayeredGrid::with_layer(LAYER_ELEVATION, elevation).unwrap()
    }

    fn filter() -> StepFilter {
        StepFilter::new(0.2, 0.1, 0.1, 3).unwrap()
    }

    #[test]
    fn tall_step_blocks_cells_next_to_it() {
        let out = filter().apply(&stair(0.5)).unwrap();
        assert_eq!(*out.get(UVec2::new(5, 2)).unwrap(), 0.0);
        assert_eq!(*out.get(UVec2::new(6, 2)).unwrap(), 0.0);
        assert_eq!(*out.get(UVec2::new(0, 2)).unwrap(), 1.0);
        assert_eq!(*out.get(UVec2::new(11, 2)).unwrap(), 1.0);
    }

    #[test]
    fn low_step_only_reduces_score() {
        let out = filter().apply(&stair(0.1)).unwrap();
        let v = *out.get(UVec2::new(5, 2)).unwrap();
        assert!((v - 0.5).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn isolated_spike_is_treated_as_noise() {
        let info = MapInfo::square(9, 0.1);
        let elevation = Grid2d::from_fn(info, |c| {
            if c == UVec2::new(4, 4) { 1.0 } else { 0.0 }
        })
        .unwrap();
        let grid = LayeredGrid::with_layer(LAYER_ELEVATION, elevation).unwrap();
        // The spike's span leaks into a plus-shaped 5 cells; a larger cell count ignores them.
        let out = StepFilter::new(0.2, 0.1, 0.1, 6).unwrap().apply(&grid).unwrap();
        assert_eq!(*out.get(UVec2::new(4, 4)).unwrap(), 1.0);
    }

    #[test]
    fn rejects_zero_cell_number() {
        assert!(StepFilter::new(0.2, 0.1, 0.1, 0).is_err());
    }
}
