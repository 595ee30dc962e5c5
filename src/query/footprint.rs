//! Polygon aggregation over the traversability layer.

use log::trace;

use crate::grid::{Grid2d, LayeredGrid};
use crate::types::{
    Bounds, DEFAULT_PASS_THRESHOLD, DEFAULT_TRAVERSABILITY, LAYER_TRAVERSABILITY, Polygon,
    is_known,
};

/// Inputs of a footprint query that come from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintParams {
    /// Mean at or above which the region is traversable.
    pub pass_threshold: f64,
    /// Score used when no known cell is available.
    pub default_traversability: f64,
    /// Layer to aggregate.
    pub layer: String,
}

impl Default for FootprintParams {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            default_traversability: DEFAULT_TRAVERSABILITY,
            layer: LAYER_TRAVERSABILITY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintVerdict {
    pub is_traversable: bool,
    /// Mean traversability of the region.
    pub mean: f64,
}

impl FootprintVerdict {
    fn outside(params: &FootprintParams) -> Self {
        Self {
            is_traversable: false,
            mean: params.default_traversability,
        }
    }
}

/// Reduce the traversability of the region covered by `polygon` to one score.
///
/// - Cells whose center is inside the polygon (edges included) are averaged.
/// - If no center is inside, the cell nearest the polygon centroid is used.
/// - Unknown cells are skipped; with no known cell the mean is the default.
/// - A polygon that does not touch the grid, or a grid without the layer, is
///   not traversable and scores the default.
pub fn query_footprint(
    polygon: &Polygon,
    grid: &LayeredGrid,
    params: &FootprintParams,
) -> FootprintVerdict {
    let Some(layer) = grid.layer(&params.layer) else {
        return FootprintVerdict::outside(params);
    };
    let grid_bounds = Bounds {
        min: grid.info().origin,
        max: grid.info().world_max(),
    };
    if !polygon.overlaps(&grid_bounds) {
        return FootprintVerdict::outside(params);
    }

    let (sum, known, visited) = accumulate(layer, polygon);
    let (sum, known) = if visited > 0 {
        (sum, known)
    } else {
        centroid_cell_value(layer, polygon)
            .map(|v| (v, 1))
            .unwrap_or((0.0, 0))
    };

    let mean = if known > 0 {
        sum / known as f64
    } else {
        params.default_traversability
    };
    trace!(
        "footprint: {} cells visited, {} known, mean {:.3}",
        visited, known, mean
    );

    FootprintVerdict {
        is_traversable: mean >= params.pass_threshold,
        mean,
    }
}

/// Sum and count of known values under the polygon, plus the number of cells visited.
fn accumulate(layer: &Grid2d<f64>, polygon: &Polygon) -> (f64, usize, usize) {
    let Some(cells) = layer.polygon(polygon) else {
        return (0.0, 0, 0);
    };
    let mut sum = 0.0;
    let mut known = 0;
    let mut visited = 0;
    for cell in cells {
        visited += 1;
        if let Some(&v) = layer.get(cell)
            && is_known(v)
        {
            sum += v;
            known += 1;
        }
    }
    (sum, known, visited)
}

fn centroid_cell_value(layer: &Grid2d<f64>, polygon: &Polygon) -> Option<f64> {
    let centroid = polygon.centroid()?;
    let cell = layer.nearest_cell(centroid)?;
    layer.get(cell).copied().filter(|v| is_known(*v))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{DVec2, UVec2};

    use super::*;
    use crate::types::{MapInfo, UNKNOWN};

    fn grid(value: f64) -> LayeredGrid {
        let mut grid = LayeredGrid::new(MapInfo::square(10, 1.0)).unwrap();
        grid.add_layer_filled(LAYER_TRAVERSABILITY, value).unwrap();
        grid
    }

    fn set(grid: &mut LayeredGrid, cell: UVec2, value: f64) {
        grid.layer_mut(LAYER_TRAVERSABILITY)
            .unwrap()
            .set(cell, value)
            .unwrap();
    }

    fn square(min: f64, max: f64) -> Polygon {
        Polygon::new(vec![
            DVec2::new(min, min),
            DVec2::new(max, min),
            DVec2::new(max, max),
            DVec2::new(min, max),
        ])
    }

    #[test]
    fn fully_traversable_region_passes() {
        let params = FootprintParams {
            pass_threshold: 0.99,
            ..Default::default()
        };
        let verdict = query_footprint(&square(2.0, 5.0), &grid(1.0), &params);
        assert_eq!(verdict.mean, 1.0);
        assert!(verdict.is_traversable);
    }

    #[test]
    fn one_impassable_cell_lowers_mean() {
        let mut g = grid(1.0);
        set(&mut g, UVec2::new(3, 3), 0.0);
        let verdict = query_footprint(&square(2.0, 5.0), &g, &FootprintParams::default());
        // 3 x 3 cells, one of them impassable.
        assert_relative_eq!(verdict.mean, 8.0 / 9.0, epsilon = 1e-12);

        let strict = FootprintParams {
            pass_threshold: 0.9,
            ..Default::default()
        };
        assert!(!query_footprint(&square(2.0, 5.0), &g, &strict).is_traversable);
    }

    #[test]
    fn threshold_is_inclusive() {
        let params = FootprintParams {
            pass_threshold: 0.5,
            ..Default::default()
        };
        assert!(query_footprint(&square(2.0, 5.0), &grid(0.5), &params).is_traversable);
    }

    #[test]
    fn unknown_cells_are_excluded() {
        let mut g = grid(0.8);
        set(&mut g, UVec2::new(3, 3), UNKNOWN);
        let verdict = query_footprint(&square(2.0, 5.0), &g, &FootprintParams::default());
        assert_relative_eq!(verdict.mean, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn all_unknown_uses_default() {
        let params = FootprintParams {
            default_traversability: 0.3,
            ..Default::default()
        };
        let verdict = query_footprint(&square(2.0, 5.0), &grid(UNKNOWN), &params);
        assert_eq!(verdict.mean, 0.3);
        assert!(!verdict.is_traversable);
    }

    #[test]
    fn degenerate_polygon_uses_nearest_cell() {
        let mut g = grid(1.0);
        set(&mut g, UVec2::new(4, 6), 0.7);
        let point = Polygon::new(vec![DVec2::new(4.2, 6.1), DVec2::new(4.3, 6.1)]);
        let verdict = query_footprint(&point, &g, &FootprintParams::default());
        assert_eq!(verdict.mean, 0.7);
        assert!(verdict.is_traversable);

        let sliver = Polygon::new(vec![
            DVec2::new(4.1, 6.1),
            DVec2::new(4.3, 6.1),
            DVec2::new(4.2, 6.2),
        ]);
        assert_eq!(query_footprint(&sliver, &g, &FootprintParams::default()).mean, 0.7);
    }

    #[test]
    fn polygon_outside_grid_is_not_traversable() {
        let params = FootprintParams {
            pass_threshold: 0.0,
            default_traversability: 0.9,
            ..Default::default()
        };
        let verdict = query_footprint(&square(20.0, 25.0), &grid(1.0), &params);
        assert!(!verdict.is_traversable);
        assert_eq!(verdict.mean, 0.9);
        assert!(!query_footprint(&Polygon::default(), &grid(1.0), &params).is_traversable);
    }

    #[test]
    fn off_map_polygon_with_overlapping_extent_is_not_traversable() {
        let params = FootprintParams {
            default_traversability: 0.1,
            ..Default::default()
        };
        // Bounding box overlaps the map but the triangle stays in x + y <= -1.
        let triangle = Polygon::new(vec![
            DVec2::new(-5.0, 4.0),
            DVec2::new(4.0, -5.0),
            DVec2::new(-5.0, -5.0),
        ]);
        let verdict = query_footprint(&triangle, &grid(1.0), &params);
        assert_eq!(
            verdict,
            FootprintVerdict {
                is_traversable: false,
                mean: 0.1
            }
        );
    }

    #[test]
    fn partially_outside_polygon_uses_cells_inside() {
        let mut g = grid(1.0);
        set(&mut g, UVec2::new(0, 0), 0.2);
        let verdict = query_footprint(&square(-5.0, 1.0), &g, &FootprintParams::default());
        assert_eq!(verdict.mean, 0.2);
    }

    #[test]
    fn missing_layer_is_not_traversable() {
        let mut g = LayeredGrid::new(MapInfo::square(4, 1.0)).unwrap();
        g.add_layer_filled("elevation", 0.0).unwrap();
        assert!(!query_footprint(&square(0.0, 2.0), &g, &FootprintParams::default()).is_traversable);
    }
}
