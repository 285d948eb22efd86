// src/curve.rs
//! Smooth parametric paths through ordered control points.
//!
//! `CatmullRom` is a centripetal Catmull-Rom spline: it interpolates every
//! control point, never forms cusps or self-intersections inside a segment,
//! and evaluation is a pure function of (control points, t). Closed curves
//! wrap around; open curves clamp `t` into `[0, 1]`.

use glam::Vec3;

use crate::error::{Error, Result};

/// Distances below this (to the fourth root of the squared distance) are
/// treated as coincident knots when deriving the non-uniform parameterization.
const KNOT_EPS: f32 = 1e-4;

/// Centripetal Catmull-Rom curve over at least four control points.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Vec3>,
    closed: bool,
}

impl CatmullRom {
    /// Build a curve. A cubic segment needs four knots, so fewer than four
    /// control points is a configuration error and produces no curve at all.
    pub fn new(points: Vec<Vec3>, closed: bool) -> Result<Self> {
        if points.len() < 4 {
            return Err(Error::invalid_configuration(format!(
                "curve needs at least 4 control points, got {}",
                points.len()
            )));
        }
        Ok(Self { points, closed })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    ///
    /// Closed curves wrap (`t = 1.0` lands exactly on `t = 0.0`); open curves
    /// clamp out-of-range parameters to the endpoints.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = if self.closed {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        };

        let l = self.points.len();
        let segments = if self.closed { l } else { l - 1 };
        let p = segments as f32 * t;
        let mut knot = p.floor() as isize;
        let mut weight = p - knot as f32;

        // Open curves: t = 1.0 falls on the far edge of the last segment.
        if !self.closed && weight == 0.0 && knot == segments as isize {
            knot = segments as isize - 1;
            weight = 1.0;
        }

        let (p0, p1, p2, p3) = self.segment_knots(knot, l);
        sample_segment(p0, p1, p2, p3, weight)
    }

    /// The four knots bracketing segment `knot`. Closed curves wrap indices;
    /// open curves extrapolate phantom endpoints by reflection.
    fn segment_knots(&self, knot: isize, l: usize) -> (Vec3, Vec3, Vec3, Vec3) {
        let wrap = |i: isize| self.points[i.rem_euclid(l as isize) as usize];

        if self.closed {
            (wrap(knot - 1), wrap(knot), wrap(knot + 1), wrap(knot + 2))
        } else {
            let p0 = if knot > 0 {
                self.points[(knot - 1) as usize]
            } else {
                self.points[0] * 2.0 - self.points[1]
            };
            let p1 = self.points[knot as usize];
            let p2 = self.points[(knot + 1) as usize];
            let p3 = if (knot + 2) < l as isize {
                self.points[(knot + 2) as usize]
            } else {
                self.points[l - 1] * 2.0 - self.points[l - 2]
            };
            (p0, p1, p2, p3)
        }
    }
}

/// Evaluate one cubic segment with centripetal knot spacing.
fn sample_segment(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, w: f32) -> Vec3 {
    // Centripetal parameterization: knot intervals scale with sqrt of chord
    // length, which is what keeps the spline from looping between close knots.
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);

    // Guard coincident knots.
    if dt1 < KNOT_EPS {
        dt1 = 1.0;
    }
    if dt0 < KNOT_EPS {
        dt0 = dt1;
    }
    if dt2 < KNOT_EPS {
        dt2 = dt1;
    }

    let mut t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
    let mut t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
    t1 *= dt1;
    t2 *= dt1;

    let c0 = p1;
    let c1 = t1;
    let c2 = p1 * -3.0 + p2 * 3.0 - t1 * 2.0 - t2;
    let c3 = p1 * 2.0 - p2 * 2.0 + t1 + t2;

    c0 + c1 * w + c2 * (w * w) + c3 * (w * w * w)
}

/// Insert the 30% / 70% lerp points along each polyline segment.
///
/// Feeding the densified sequence into `CatmullRom` makes the spline hug the
/// original polyline instead of bulging across its corners, which is what the
/// rectangular domino run relies on.
pub fn densify_polyline(points: &[Vec3]) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(points.len() * 3);
    for (i, &p) in points.iter().enumerate() {
        if i + 1 == points.len() {
            out.push(p);
            break;
        }
        let next = points[i + 1];
        out.push(p);
        out.push(p.lerp(next, 0.3));
        out.push(p.lerp(next, 0.7));
    }
    out
}
