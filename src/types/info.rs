//! Map metadata.

use glam::DVec2;

#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    pub width: u32,
    pub height: u32,
    pub resolution: f64,
    /// Origin of cell (0, 0) in world coordinates (meters).
    pub origin: DVec2,
    pub frame_id: String,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            resolution: 0.05,
            origin: DVec2::ZERO,
            frame_id: "map".to_string(),
        }
    }
}

impl MapInfo {
    pub fn square(width: u32, resolution: f64) -> Self {
        Self {
            width,
            height: width,
            resolution,
            ..Default::default()
        }
    }

    /// Build geometry from the world position of the map center, the way
    /// elevation sources usually describe a submap.
    pub fn centered(width: u32, height: u32, resolution: f64, center: DVec2) -> Self {
        let half = DVec2::new(width as f64, height as f64) * resolution * 0.5;
        Self {
            width,
            height,
            resolution,
            origin: center - half,
            ..Default::default()
        }
    }

    /// Width of the map in world units (meters).
    #[inline]
    pub fn world_width(&self) -> f64 {
        self.width as f64 * self.resolution
    }

    /// Height of the map in world units (meters).
    #[inline]
    pub fn world_height(&self) -> f64 {
        self.height as f64 * self.resolution
    }

    /// Center of the map in 2D world coordinates.
    #[inline]
    pub fn world_center(&self) -> DVec2 {
        self.origin + DVec2::new(0.5 * self.world_width(), 0.5 * self.world_height())
    }

    /// Upper corner of the map, exclusive.
    #[inline]
    pub fn world_max(&self) -> DVec2 {
        self.origin + DVec2::new(self.world_width(), self.world_height())
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Same raster shape and placement. The frame id is not compared.
    pub fn same_geometry(&self, other: &MapInfo) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.resolution == other.resolution
            && self.origin == other.origin
    }
}
