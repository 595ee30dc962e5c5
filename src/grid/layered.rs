//! Named `f64` layers sharing one geometry.
//!
//! Every layer stored on a [`LayeredGrid`] has the grid's [`MapInfo`]; adding a
//! layer with a different shape or placement fails, so cell `(x, y)` means the
//! same patch of terrain in every layer.

use std::collections::BTreeMap;

use glam::{DVec2, UVec2};

use crate::grid::Grid2d;
use crate::types::{MapInfo, TraversabilityError, UNKNOWN, is_known};

#[derive(Debug, Clone, PartialEq)]
pub struct LayeredGrid {
    info: MapInfo,
    layers: BTreeMap<String, Grid2d<f64>>,
}

impl LayeredGrid {
    pub fn new(info: MapInfo) -> Result<Self, TraversabilityError> {
        if info.resolution.is_nan() || info.resolution <= 0.0 {
            return Err(TraversabilityError::InvalidMetadata(format!(
                "resolution must be positive, got {}",
                info.resolution
            )));
        }
        Ok(Self {
            info,
            layers: BTreeMap::new(),
        })
    }

    /// Convenience constructor for a grid holding a single layer.
    pub fn with_layer(
        name: impl Into<String>,
        layer: Grid2d<f64>,
    ) -> Result<Self, TraversabilityError> {
        let mut grid = Self::new(layer.info().clone())?;
        grid.add_layer(name, layer)?;
        Ok(grid)
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Insert or overwrite a layer.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        layer: Grid2d<f64>,
    ) -> Result<(), TraversabilityError> {
        let name = name.into();
        if !self.info.same_geometry(layer.info()) {
            return Err(TraversabilityError::LayerMismatch(name));
        }
        self.layers.insert(name, layer);
        Ok(())
    }

    /// Insert or overwrite a layer with every cell set to `value`.
    pub fn add_layer_filled(
        &mut self,
        name: impl Into<String>,
        value: f64,
    ) -> Result<(), TraversabilityError> {
        let layer = Grid2d::filled(self.info.clone(), value)?;
        self.add_layer(name, layer)
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Grid2d<f64>> {
        self.layers.remove(name)
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn layer(&self, name: &str) -> Option<&Grid2d<f64>> {
        self.layers.get(name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Grid2d<f64>> {
        self.layers.get_mut(name)
    }

    /// Like [`layer`](Self::layer) but reports which layer is missing.
    pub fn require_layer(&self, name: &str) -> Result<&Grid2d<f64>, TraversabilityError> {
        self.layers
            .get(name)
            .ok_or_else(|| TraversabilityError::MissingLayer(name.to_string()))
    }

    /// Value of a cell, `UNKNOWN` when the layer is missing or the cell is out of bounds.
    pub fn value(&self, name: &str, cell: UVec2) -> f64 {
        self.layer(name)
            .and_then(|layer| layer.get(cell).copied())
            .unwrap_or(UNKNOWN)
    }

    /// Known value of the cell containing a world position.
    pub fn value_at_position(&self, name: &str, pos: DVec2) -> Option<f64> {
        let layer = self.layer(name)?;
        let cell = layer.cell_at(pos)?;
        layer.get(cell).copied().filter(|v| is_known(*v))
    }
}
