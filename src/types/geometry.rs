//! Geometric and spatial types used across the grid and query APIs.

use glam::DVec2;
use serde::{Deserialize, Serialize};

const GEOMETRY_EPSILON: f64 = 1e-9;

/// Robot pose in world coordinates (meters).
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    pub position: DVec2,
    pub yaw: f64,
}

impl Pose2 {
    pub fn new(position: DVec2, yaw: f64) -> Self {
        Self { position, yaw }
    }

    /// Map a point from the robot frame into the world frame.
    #[inline]
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        self.position + DVec2::from_angle(self.yaw).rotate(p)
    }
}

/// World-axis-aligned rectangle in meters.
/// Convention: [min.x, max.x) x [min.y, max.y) in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Bounds that contain nothing. Expanding it by a point yields that point.
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// Returns true if no point has been added (min > max in either axis).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand this bounds to include the point (in place).
    pub fn expand_to_include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Whether `p` lies in the box, edges included.
    pub fn contains_closed(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }
}

/// Closed polygon in world coordinates (meters). The last vertex connects back
/// to the first. Self-intersection is not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<DVec2>,
}

impl Polygon {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle of `length` x `width` centered at the origin.
    pub fn rectangle(length: f64, width: f64) -> Self {
        let hl = 0.5 * length;
        let hw = 0.5 * width;
        Self::new(vec![
            DVec2::new(-hl, -hw),
            DVec2::new(hl, -hw),
            DVec2::new(hl, hw),
            DVec2::new(-hl, hw),
        ])
    }

    /// Regular polygon approximating a circle.
    pub fn circle(center: DVec2, radius: f64, segments: usize) -> Self {
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / segments as f64;
                center + DVec2::from_angle(angle) * radius
            })
            .collect();
        Self::new(points)
    }

    /// Convex hull of two circles of equal radius: the area swept by a disc
    /// moving in a straight line from `a` to `b`.
    pub fn hull_of_two_circles(a: DVec2, b: DVec2, radius: f64, segments: usize) -> Self {
        let mut points = Self::circle(a, radius, segments).points;
        points.extend(Self::circle(b, radius, segments).points);
        Self::convex_hull(&points)
    }

    /// Convex hull (counter-clockwise) using the monotone chain algorithm.
    pub fn convex_hull(points: &[DVec2]) -> Self {
        let mut pts = points.to_vec();
        pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        pts.dedup_by(|a, b| a.distance_squared(*b) < GEOMETRY_EPSILON * GEOMETRY_EPSILON);
        if pts.len() < 3 {
            return Self::new(pts);
        }

        let cross = |o: DVec2, a: DVec2, b: DVec2| (a - o).perp_dot(b - o);
        let mut hull: Vec<DVec2> = Vec::with_capacity(2 * pts.len());
        for &p in &pts {
            while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
                hull.pop();
            }
            hull.push(p);
        }
        let lower_len = hull.len() + 1;
        for &p in pts.iter().rev().skip(1) {
            while hull.len() >= lower_len
                && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
            {
                hull.pop();
            }
            hull.push(p);
        }
        hull.pop();
        Self::new(hull)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Transform a robot-frame footprint into the world frame at `pose`.
    pub fn transform(&self, pose: Pose2) -> Self {
        Self::new(self.points.iter().map(|p| pose.transform_point(*p)).collect())
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for p in &self.points {
            bounds.expand_to_include(*p);
        }
        bounds
    }

    /// Signed area (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        0.5 * (0..n)
            .map(|i| self.points[i].perp_dot(self.points[(i + 1) % n]))
            .sum::<f64>()
    }

    /// Area centroid, or the vertex mean for degenerate (zero-area) polygons.
    pub fn centroid(&self) -> Option<DVec2> {
        let n = self.points.len();
        if n == 0 {
            return None;
        }
        let area = self.signed_area();
        if area.abs() < GEOMETRY_EPSILON {
            let sum: DVec2 = self.points.iter().copied().sum();
            return Some(sum / n as f64);
        }
        let mut c = DVec2::ZERO;
        for i in 0..n {
            let p0 = self.points[i];
            let p1 = self.points[(i + 1) % n];
            c += (p0 + p1) * p0.perp_dot(p1);
        }
        Some(c / (6.0 * area))
    }

    /// Whether the polygon shares at least one point with `rect`, edges included.
    ///
    /// A polygon whose extent overlaps `rect` may still lie entirely outside
    /// it, so vertices, corners and edge crossings are all tested.
    pub fn overlaps(&self, rect: &Bounds) -> bool {
        if self.is_empty() || rect.is_empty() {
            return false;
        }
        let extent = self.bounds();
        if extent.min.x > rect.max.x
            || extent.max.x < rect.min.x
            || extent.min.y > rect.max.y
            || extent.max.y < rect.min.y
        {
            return false;
        }
        if self.points.iter().any(|p| rect.contains_closed(*p)) {
            return true;
        }
        let corners = rect.corners();
        if corners.iter().any(|c| self.contains(*c)) {
            return true;
        }
        let n = self.points.len();
        (0..n).any(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            (0..4).any(|j| segments_intersect(a, b, corners[j], corners[(j + 1) % 4]))
        })
    }

    /// Point-in-polygon test. Points on an edge or vertex count as inside.
    pub fn contains(&self, p: DVec2) -> bool {
        let n = self.points.len();
        if n == 0 {
            return false;
        }
        for i in 0..n {
            if on_segment(self.points[i], self.points[(i + 1) % n], p) {
                return true;
            }
        }
        if n < 3 {
            return false;
        }

        // Crossing number over edges, half-open in y so shared vertices count once.
        let mut inside = false;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.length_squared();
    if len_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return ap.length_squared() < GEOMETRY_EPSILON * GEOMETRY_EPSILON;
    }
    if ab.perp_dot(ap).abs() > GEOMETRY_EPSILON * len_sq.sqrt() {
        return false;
    }
    let t = ap.dot(ab) / len_sq;
    (-GEOMETRY_EPSILON..=1.0 + GEOMETRY_EPSILON).contains(&t)
}

fn segments_intersect(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let d1 = (b - a).perp_dot(c - a);
    let d2 = (b - a).perp_dot(d - a);
    let d3 = (d - c).perp_dot(a - c);
    let d4 = (d - c).perp_dot(b - c);
    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }
    on_segment(a, b, c) || on_segment(a, b, d) || on_segment(c, d, a) || on_segment(c, d, b)
}
