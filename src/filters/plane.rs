//! Least-squares plane fitting over a cell neighbourhood.

use glam::{DMat2, DVec2, DVec3, UVec2};

use crate::grid::Grid2d;
use crate::iterators::Disc;
use crate::types::is_known;

const MIN_PLANE_POINTS: usize = 3;
const DEGENERATE_DETERMINANT: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFit {
    /// Upward unit normal.
    pub normal: DVec3,
    /// Standard deviation of the perpendicular point-to-plane distances.
    pub residual_std: f64,
    pub point_count: usize,
}

impl PlaneFit {
    /// Angle between the plane normal and the vertical axis (radians).
    pub fn slope(&self) -> f64 {
        self.normal.z.clamp(-1.0, 1.0).acos()
    }
}

/// Fit `z = a*x + b*y + c` to points given relative to some local center.
///
/// Returns `None` with fewer than three points or when the points are collinear
/// in the plane.
pub fn fit_plane(points: &[DVec3]) -> Option<PlaneFit> {
    if points.len() < MIN_PLANE_POINTS {
        return None;
    }
    let n = points.len() as f64;
    let mean = points.iter().copied().sum::<DVec3>() / n;

    let (mut sxx, mut sxy, mut syy, mut sxz, mut syz) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for p in points {
        let d = *p - mean;
        sxx += d.x * d.x;
        sxy += d.x * d.y;
        syy += d.y * d.y;
        sxz += d.x * d.z;
        syz += d.y * d.z;
    }

    let m = DMat2::from_cols(DVec2::new(sxx, sxy), DVec2::new(sxy, syy));
    if m.determinant().abs() < DEGENERATE_DETERMINANT {
        return None;
    }
    let gradient = m.inverse() * DVec2::new(sxz, syz);
    let normal = DVec3::new(-gradient.x, -gradient.y, 1.0).normalize();

    let sum_sq: f64 = points
        .iter()
        .map(|p| {
            let d = *p - mean;
            let vertical = d.z - gradient.dot(d.truncate());
            let perpendicular = vertical * normal.z;
            perpendicular * perpendicular
        })
        .sum();

    Some(PlaneFit {
        normal,
        residual_std: (sum_sq / n).sqrt(),
        point_count: points.len(),
    })
}

/// Fit a plane to the known elevations of the disc around `center`.
///
/// `buffer` is reused between calls to avoid reallocating per cell.
pub fn fit_neighbourhood(
    elevation: &Grid2d<f64>,
    center: UVec2,
    disc: &Disc,
    buffer: &mut Vec<DVec3>,
) -> Option<PlaneFit> {
    let resolution = elevation.info().resolution;
    buffer.clear();
    for cell in disc.cells_around(center, elevation.width(), elevation.height()) {
        let Some(&z) = elevation.get(cell) else {
            continue;
        };
        if !is_known(z) {
            continue;
        }
        let offset = (cell.as_ivec2() - center.as_ivec2()).as_dvec2() * resolution;
        buffer.push(offset.extend(z));
    }
    fit_plane(buffer)
}
