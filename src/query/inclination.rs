//! Straight-line inclination check between two positions.

use glam::DVec2;
use log::trace;

use crate::grid::LayeredGrid;
use crate::types::{DEFAULT_MAX_INCLINATION, LAYER_ELEVATION};

#[derive(Debug, Clone, PartialEq)]
pub struct InclinationParams {
    /// Largest allowed angle between the line and the horizontal (radians).
    pub max_inclination: f64,
    /// Layer sampled at each endpoint.
    pub layer: String,
}

impl Default for InclinationParams {
    fn default() -> Self {
        Self {
            max_inclination: DEFAULT_MAX_INCLINATION,
            layer: LAYER_ELEVATION.to_string(),
        }
    }
}

/// Whether moving in a straight line from `start` to `end` stays within the
/// inclination limit.
///
/// Elevation is read from the cell containing each endpoint (no
/// interpolation). Coincident endpoints are always feasible. An endpoint off
/// the grid or on an unknown cell makes the check fail. The limit is
/// inclusive.
pub fn check_inclination(
    start: DVec2,
    end: DVec2,
    grid: &LayeredGrid,
    params: &InclinationParams,
) -> bool {
    let distance = start.distance(end);
    if distance == 0.0 {
        return true;
    }

    let (Some(z_start), Some(z_end)) = (
        grid.value_at_position(&params.layer, start),
        grid.value_at_position(&params.layer, end),
    ) else {
        trace!("inclination: unknown elevation at an endpoint of {start} -> {end}");
        return false;
    };

    let angle = (z_end - z_start).abs().atan2(distance);
    trace!(
        "inclination {start} -> {end}: {:.4} rad (max {:.4})",
        angle, params.max_inclination
    );
    angle <= params.max_inclination
}
