//! Combination of risk layers into the composite traversability layer.
//!
//! **Assumption:** every layer in `risk_layers` lives on the same
//! [`LayeredGrid`], so they share dimensions and alignment.

use crate::grid::{Grid2d, LayeredGrid};
use crate::types::{IMPASSABLE, TRAVERSABLE, TraversabilityError, is_known};

/// Elementwise minimum of the known risk values, clamped to `[0, 1]`.
///
/// The worst single risk dominates. Cells where every risk layer is unknown
/// get `default_value`, so the result has no unknown cells.
pub fn combine_min(
    grid: &LayeredGrid,
    risk_layers: &[String],
    default_value: f64,
) -> Result<Grid2d<f64>, TraversabilityError> {
    let layers = risk_layers
        .iter()
        .map(|name| grid.require_layer(name))
        .collect::<Result<Vec<_>, _>>()?;

    let len = grid.info().cell_count();
    let mut data = Vec::with_capacity(len);
    for idx in 0..len {
        let combined = layers
            .iter()
            .map(|layer| layer.data()[idx])
            .filter(|v| is_known(*v))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));
        let value = combined.unwrap_or(default_value);
        data.push(value.clamp(IMPASSABLE, TRAVERSABLE));
    }

    Grid2d::new(grid.info().clone(), data)
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use super::*;
    use crate::types::{MapInfo, UNKNOWN};

    fn grid() -> LayeredGrid {
        let mut grid = LayeredGrid::new(MapInfo::square(2, 1.0)).unwrap();
        let a = Grid2d::new(grid.info().clone(), vec![0.8, UNKNOWN, UNKNOWN, 1.2]).unwrap();
        let b = Grid2d::new(grid.info().clone(), vec![0.3, 0.6, UNKNOWN, 1.5]).unwrap();
        grid.add_layer("a", a).unwrap();
        grid.add_layer("b", b).unwrap();
        grid
    }

    #[test]
    fn takes_minimum_of_known_values() {
        let out = combine_min(&grid(), &["a".into(), "b".into()], 0.5).unwrap();
        assert_eq!(out.get(UVec2::new(0, 0)), Some(&0.3));
        assert_eq!(out.get(UVec2::new(1, 0)), Some(&0.6));
    }

    #[test]
    fn all_unknown_uses_default() {
        let out = combine_min(&grid(), &["a".into(), "b".into()], 0.25).unwrap();
        assert_eq!(out.get(UVec2::new(0, 1)), Some(&0.25));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let out = combine_min(&grid(), &["a".into(), "b".into()], 0.5).unwrap();
        assert_eq!(out.get(UVec2::new(1, 1)), Some(&1.0));
    }

    #[test]
    fn missing_layer_is_an_error() {
        assert!(matches!(
            combine_min(&grid(), &["a".into(), "c".into()], 0.5),
            Err(TraversabilityError::MissingLayer(name)) if name == "c"
        ));
    }
}
