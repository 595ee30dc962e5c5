use glam::{IVec2, UVec2};

/// Cell offsets of a disc, precomputed once per radius so neighbourhood scans
/// don't recompute distances per cell.
#[derive(Debug, Clone)]
pub struct Disc {
    offsets: Vec<IVec2>,
}

/// Discs are capped at this radius in cells, whatever the metric radius.
pub const MAX_DISC_RADIUS_CELLS: i32 = 512;

impl Disc {
    /// Disc of cells whose centers lie within `radius_m` of the center cell's center.
    /// Always contains the center cell. The radius is clamped to
    /// [`MAX_DISC_RADIUS_CELLS`].
    pub fn new(radius_m: f64, resolution: f64) -> Self {
        let radius_cells = if resolution > 0.0 && radius_m > 0.0 {
            (radius_m / resolution).min(MAX_DISC_RADIUS_CELLS as f64)
        } else {
            0.0
        };
        let r = radius_cells.floor() as i32;
        let r_sq = radius_cells * radius_cells;
        let side = 2 * r as usize + 1;
        let mut offsets = Vec::with_capacity(side * side);
        for dy in -r..=r {
            for dx in -r..=r {
                if ((dx * dx + dy * dy) as f64) <= r_sq {
                    offsets.push(IVec2::new(dx, dy));
                }
            }
        }
        if offsets.is_empty() {
            offsets.push(IVec2::ZERO);
        }
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// In-bounds cells of the disc placed on `center`.
    pub fn cells_around(
        &self,
        center: UVec2,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = UVec2> + '_ {
        let center = center.as_ivec2();
        self.offsets.iter().filter_map(move |offset| {
            let cell = center + *offset;
            // equivalent to (x >= 0 && x < width) for signed x
            if (cell.x as u32) < width && (cell.y as u32) < height {
                Some(cell.as_uvec2())
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_is_single_cell() {
        let disc = Disc::new(0.0, 0.1);
        assert_eq!(disc.len(), 1);
        let cells: Vec<UVec2> = disc.cells_around(UVec2::new(2, 2), 5, 5).collect();
        assert_eq!(cells, vec![UVec2::new(2, 2)]);
    }

    #[test]
    fn unit_radius_is_plus_shape() {
        let disc = Disc::new(1.0, 1.0);
        assert_eq!(disc.len(), 5);
    }

    #[test]
    fn huge_radius_is_clamped() {
        let disc = Disc::new(1e12, 0.05);
        let side = (2 * MAX_DISC_RADIUS_CELLS + 1) as usize;
        assert!(disc.len() <= side * side);
        assert_eq!(disc.len(), Disc::new(MAX_DISC_RADIUS_CELLS as f64, 1.0).len());
    }

    #[test]
    fn clips_at_corner() {
        let disc = Disc::new(1.5, 1.0);
        assert_eq!(disc.len(), 9);
        let cells: Vec<UVec2> = disc.cells_around(UVec2::ZERO, 5, 5).collect();
        assert_eq!(cells.len(), 4);
    }
}
