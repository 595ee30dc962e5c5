//! Footprint path checking: swept footprint aggregation plus inclination,
//! segment by segment.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::LayeredGrid;
use crate::types::{Polygon, Pose2};

use super::footprint::{FootprintParams, query_footprint};
use super::inclination::{InclinationParams, check_inclination};

/// Robot footprint used to sweep a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintShape {
    /// Disc of the given radius (meters).
    Radius(f64),
    /// Polygon in the robot frame (meters).
    Polygon(Polygon),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootprintPath {
    pub poses: Vec<Pose2>,
    pub footprint: FootprintShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVerdict {
    pub is_safe: bool,
    /// Mean of the per-segment traversability means.
    pub traversability: f64,
}

/// Polygon covered by the footprint while moving from `from` to `to`.
pub fn swept_polygon(
    footprint: &FootprintShape,
    from: Pose2,
    to: Pose2,
    circle_segments: usize,
) -> Polygon {
    match footprint {
        FootprintShape::Radius(radius) => {
            Polygon::hull_of_two_circles(from.position, to.position, *radius, circle_segments)
        }
        FootprintShape::Polygon(shape) => {
            let mut points = shape.transform(from).points;
            points.extend(shape.transform(to).points);
            Polygon::convex_hull(&points)
        }
    }
}

/// Check a footprint path against a traversability grid.
///
/// A single pose checks the footprint at that pose. Otherwise every
/// consecutive pair forms a segment whose swept footprint must be traversable
/// and whose straight-line inclination must be feasible. An empty path is not
/// safe.
pub fn check_footprint_path(
    path: &FootprintPath,
    grid: &LayeredGrid,
    footprint_params: &FootprintParams,
    inclination_params: &InclinationParams,
    circle_segments: usize,
) -> PathVerdict {
    if path.poses.is_empty() {
        return PathVerdict {
            is_safe: false,
            traversability: footprint_params.default_traversability,
        };
    }

    let segments: Vec<(Pose2, Pose2)> = if path.poses.len() == 1 {
        vec![(path.poses[0], path.poses[0])]
    } else {
        path.poses.windows(2).map(|w| (w[0], w[1])).collect()
    };

    let mut is_safe = true;
    let mut total = 0.0;
    for (i, (from, to)) in segments.iter().enumerate() {
        let polygon = swept_polygon(&path.footprint, *from, *to, circle_segments);
        let verdict = query_footprint(&polygon, grid, footprint_params);
        let feasible =
            check_inclination(from.position, to.position, grid, inclination_params);
        if !verdict.is_traversable || !feasible {
            debug!(
                "path segment {i} rejected: traversable={} (mean {:.3}), inclination ok={feasible}",
                verdict.is_traversable, verdict.mean
            );
            is_safe = false;
        }
        total += verdict.mean;
    }

    PathVerdict {
        is_safe,
        traversability: total / segments.len() as f64,
    }
}
