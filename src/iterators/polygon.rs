use glam::{DVec2, UVec2};

use crate::grid::Grid2d;
use crate::types::Polygon;

/// Iterator over all grid cells whose center lies inside a polygon.
///
/// Containment is [`Polygon::contains`], so centers on an edge are included.
/// Concave polygons are supported. Only in-bounds cells are yielded, in
/// row-major order.
pub struct PolygonIterator<'p> {
    polygon: &'p Polygon,
    origin: DVec2,
    resolution: f64,
    x_start: u32,
    x_end: u32,
    y_end: u32,
    cell: UVec2,
    done: bool,
}

impl<'p> PolygonIterator<'p> {
    pub fn new<T>(grid: &Grid2d<T>, polygon: &'p Polygon) -> Option<Self> {
        if polygon.is_empty() || grid.width() == 0 || grid.height() == 0 {
            return None;
        }
        let info = grid.info();
        let bounds = polygon.bounds();
        let min = (bounds.min - info.origin) / info.resolution - DVec2::splat(0.5);
        let max = (bounds.max - info.origin) / info.resolution - DVec2::splat(0.5);

        // Candidate cells are those whose centers fall inside the polygon's extent.
        let x_start = min.x.ceil().max(0.0);
        let y_start = min.y.ceil().max(0.0);
        let x_end = max.x.floor().min(info.width as f64 - 1.0);
        let y_end = max.y.floor().min(info.height as f64 - 1.0);
        let done = x_start > x_end || y_start > y_end;

        Some(Self {
            polygon,
            origin: info.origin,
            resolution: info.resolution,
            x_start: x_start as u32,
            x_end: x_end.max(0.0) as u32,
            y_end: y_end.max(0.0) as u32,
            cell: UVec2::new(x_start as u32, y_start as u32),
            done,
        })
    }

    fn advance(&mut self) {
        if self.cell.x < self.x_end {
            self.cell.x += 1;
        } else if self.cell.y < self.y_end {
            self.cell.x = self.x_start;
            self.cell.y += 1;
        } else {
            self.done = true;
        }
    }
}

impl Iterator for PolygonIterator<'_> {
    type Item = UVec2;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let cell = self.cell;
            self.advance();
            let center = self.origin + (cell.as_dvec2() + DVec2::splat(0.5)) * self.resolution;
            if self.polygon.contains(center) {
                return Some(cell);
            }
        }
        None
    }
}

impl<T> Grid2d<T> {
    /// Cells of this grid whose center lies in `polygon`.
    pub fn polygon<'p>(&self, polygon: &'p Polygon) -> Option<PolygonIterator<'p>> {
        PolygonIterator::new(self, polygon)
    }
}
