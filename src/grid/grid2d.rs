use glam::{DVec2, UVec2};

use crate::types::{MapInfo, TraversabilityError};

/// Dense row-major raster with its geometric framing.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2d<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self, TraversabilityError> {
        if info.resolution.is_nan() || info.resolution <= 0.0 {
            return Err(TraversabilityError::InvalidMetadata(format!(
                "resolution must be positive, got {}",
                info.resolution
            )));
        }
        let expected_len = info.cell_count();
        if data.len() != expected_len {
            return Err(TraversabilityError::InvalidMetadata(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }

        Ok(Self { info, data })
    }

    pub fn filled(info: MapInfo, value: T) -> Result<Self, TraversabilityError>
    where
        T: Clone,
    {
        let len = info.cell_count();
        Self::new(info, vec![value; len])
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

    #[inline]
    pub fn in_bounds(&self, cell: UVec2) -> bool {
        cell.x < self.info.width && cell.y < self.info.height
    }

    pub fn get(&self, cell: UVec2) -> Option<&T> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(&self.data[self.index(cell)])
    }

    pub fn set(&mut self, cell: UVec2, value: T) -> Result<(), TraversabilityError> {
        if !self.in_bounds(cell) {
            return Err(TraversabilityError::OutOfBounds(format!(
                "cell ({}, {}) out of bounds for map {}x{}",
                cell.x, cell.y, self.info.width, self.info.height
            )));
        }
        let idx = self.index(cell);
        self.data[idx] = value;
        Ok(())
    }

    #[inline]
    fn index(&self, cell: UVec2) -> usize {
        (cell.y as usize) * (self.info.width as usize) + (cell.x as usize)
    }

    /// Continuous map coordinates (cells) to world coordinates (meters).
    pub fn map_to_world(&self, pos: DVec2) -> DVec2 {
        self.info.origin + pos * self.info.resolution
    }

    /// World coordinates to continuous map coordinates, `None` outside the map.
    pub fn world_to_map(&self, pos: DVec2) -> Option<DVec2> {
        let m = (pos - self.info.origin) / self.info.resolution;
        if m.x < 0.0 || m.y < 0.0 || m.x >= self.info.width as f64 || m.y >= self.info.height as f64
        {
            return None;
        }
        Some(m)
    }

    /// Cell containing the world position.
    pub fn cell_at(&self, pos: DVec2) -> Option<UVec2> {
        self.world_to_map(pos).map(|m| m.floor().as_uvec2())
    }

    /// Cell nearest to the world position, clamping positions outside the map
    /// onto its border. `None` only for an empty map.
    pub fn nearest_cell(&self, pos: DVec2) -> Option<UVec2> {
        if self.info.width == 0 || self.info.height == 0 {
            return None;
        }
        let m = ((pos - self.info.origin) / self.info.resolution).floor();
        let max = DVec2::new(
            (self.info.width - 1) as f64,
            (self.info.height - 1) as f64,
        );
        Some(m.clamp(DVec2::ZERO, max).as_uvec2())
    }

    /// World position of the cell center.
    pub fn cell_center(&self, cell: UVec2) -> DVec2 {
        self.map_to_world(cell.as_dvec2() + DVec2::splat(0.5))
    }

    /// All cell indices in storage order.
    pub fn cells(&self) -> impl Iterator<Item = UVec2> + use<T> {
        let width = self.info.width;
        let height = self.info.height;
        (0..height).flat_map(move |y| (0..width).map(move |x| UVec2::new(x, y)))
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// New grid with the same geometry, computing each cell from its index.
    pub fn from_fn<F>(info: MapInfo, mut f: F) -> Result<Self, TraversabilityError>
    where
        F: FnMut(UVec2) -> T,
    {
        let width = info.width;
        let data = (0..info.cell_count())
            .map(|i| f(UVec2::new(i as u32 % width.max(1), i as u32 / width.max(1))))
            .collect();
        Self::new(info, data)
    }
}
