// src/placement.rs
//! Arc-length-uniform placement of poses along a curve.
//!
//! `PosePlacer` walks the curve with a fine parameter step, numerically
//! integrating arc length as the sum of chord distances between successive
//! samples. Each time the accumulated length exceeds the configured footprint
//! it emits a `Pose` and resets the accumulator, so successive poses are
//! separated by at least one footprint measured along the curve. The terminal
//! partial segment is dropped.

use glam::{Mat3, Quat, Vec3};

use crate::curve::CatmullRom;
use crate::error::{Error, Result};

/// Squared distance below which two fine samples count as coincident.
const COINCIDENT_EPS: f32 = 1e-10;

/// A placed object: world position plus unit-quaternion orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Lazy, restartable sequence of poses along a curve.
///
/// Two placers built from the same curve and parameters yield identical pose
/// sequences.
#[derive(Debug)]
pub struct PosePlacer<'a> {
    curve: &'a CatmullRom,
    footprint: f32,
    step: f32,
    t: f32,
    travelled: f32,
    last_rotation: Quat,
}

impl<'a> PosePlacer<'a> {
    /// `footprint` is the curve length one placed object occupies; `step` is
    /// the fine parameter increment used to integrate arc length. Both must
    /// be positive (zero would never terminate or divide by zero).
    pub fn new(curve: &'a CatmullRom, footprint: f32, step: f32) -> Result<Self> {
        if footprint <= 0.0 {
            return Err(Error::invalid_configuration(format!(
                "placement footprint must be positive, got {footprint}"
            )));
        }
        if step <= 0.0 {
            return Err(Error::invalid_configuration(format!(
                "sampling step must be positive, got {step}"
            )));
        }
        Ok(Self {
            curve,
            footprint,
            step,
            t: 0.0,
            travelled: 0.0,
            last_rotation: Quat::IDENTITY,
        })
    }
}

impl Iterator for PosePlacer<'_> {
    type Item = Pose;

    fn next(&mut self) -> Option<Pose> {
        while self.t < 1.0 {
            let here = self.curve.point_at(self.t);
            let ahead = self.curve.point_at(self.t + self.step);
            self.travelled += here.distance(ahead);
            self.t += self.step;

            if self.travelled > self.footprint {
                self.travelled = 0.0;
                let rotation = look_toward(here, ahead, self.last_rotation);
                self.last_rotation = rotation;
                return Some(Pose {
                    position: here,
                    rotation,
                });
            }
        }
        None
    }
}

/// Orientation aiming local +Z from `from` toward `to`, Y-up.
///
/// When the two points coincide the heading is ambiguous, so the previous
/// valid orientation is reused.
pub(crate) fn look_toward(from: Vec3, to: Vec3, previous: Quat) -> Quat {
    let forward = to - from;
    if forward.length_squared() < COINCIDENT_EPS {
        return previous;
    }
    let forward = forward.normalize();

    let mut right = Vec3::Y.cross(forward);
    if right.length_squared() < 1e-8 {
        // Aiming straight up or down: fall back to a side axis.
        right = Vec3::Z.cross(forward);
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::densify_polyline;

    fn straight_line() -> CatmullRom {
        let points: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32 * 2.5, 0.0, 0.0)).collect();
        CatmullRom::new(densify_polyline(&points), false).unwrap()
    }

    /// Arc length integrated with the same fixed step the placer walks with.
    fn measured_length(curve: &CatmullRom, step: f32) -> f32 {
        let mut length = 0.0;
        let mut t = 0.0;
        while t < 1.0 {
            length += curve.point_at(t).distance(curve.point_at(t + step));
            t += step;
        }
        length
    }

    #[test]
    fn non_positive_footprint_is_an_error() {
        let curve = straight_line();
        assert!(PosePlacer::new(&curve, 0.0, 0.001).unwrap_err().is_configuration());
        assert!(PosePlacer::new(&curve, -1.0, 0.001).unwrap_err().is_configuration());
    }

    #[test]
    fn non_positive_step_is_an_error() {
        let curve = straight_line();
        assert!(PosePlacer::new(&curve, 0.4, 0.0).unwrap_err().is_configuration());
        assert!(PosePlacer::new(&curve, 0.4, -0.1).unwrap_err().is_configuration());
    }

    #[test]
    fn pose_count_matches_curve_length_over_footprint() {
        let curve = straight_line();
        let footprint = 0.5;
        let step = 0.0001;
        let poses: Vec<Pose> = PosePlacer::new(&curve, footprint, step).unwrap().collect();
        let expected = (measured_length(&curve, step) / footprint).floor() as isize;
        let got = poses.len() as isize;
        assert!(
            (got - expected).abs() <= 1,
            "emitted {got} poses, expected about {expected}"
        );
    }

    #[test]
    fn successive_poses_are_one_footprint_apart_on_a_straight_run() {
        // Chord distance equals arc distance on a straight curve, so the
        // spacing is directly observable.
        let curve = straight_line();
        let poses: Vec<Pose> = PosePlacer::new(&curve, 0.5, 0.0001).unwrap().collect();
        assert!(poses.len() > 10);
        for pair in poses.windows(2) {
            let gap = pair[0].position.distance(pair[1].position);
            assert!(gap >= 0.5 - 5e-3, "poses only {gap} apart");
            assert!(gap <= 0.5 + 0.05, "poses {gap} apart, footprint overshoot");
        }
    }

    #[test]
    fn orientation_aims_along_the_travel_direction() {
        let curve = straight_line();
        let poses: Vec<Pose> = PosePlacer::new(&curve, 0.5, 0.0001).unwrap().collect();
        for pose in &poses {
            let heading = pose.rotation * Vec3::Z;
            assert!(
                heading.dot(Vec3::X) > 0.999,
                "pose heading {heading:?} is not along +X"
            );
        }
    }

    #[test]
    fn square_run_emits_about_perimeter_over_footprint_poses() {
        // Densified closed square of side 20: perimeter is close to 80, so a
        // 0.4 footprint yields about 200 poses.
        let corners = [
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(-10.0, 0.0, 10.0),
        ];
        let mut points = Vec::new();
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            points.push(a);
            points.push(a.lerp(b, 0.3));
            points.push(a.lerp(b, 0.7));
        }
        let curve = CatmullRom::new(points, true).unwrap();

        let footprint = 0.4;
        let step = 0.0001;
        let count = PosePlacer::new(&curve, footprint, step).unwrap().count() as isize;
        // The accumulator resets to zero on each emission, so the overshoot
        // of up to one fine-step chord per pose shaves a little off the
        // ideal count over a run this long.
        let expected = (measured_length(&curve, step) / footprint).floor() as isize;
        assert!(
            count <= expected + 1 && count >= expected - expected / 25,
            "emitted {count}, measured-length estimate {expected}"
        );
        assert!((185..=215).contains(&count), "count {count} far from 200");
    }

    #[test]
    fn coincident_samples_reuse_the_previous_orientation() {
        let previous = Quat::from_rotation_y(1.2);
        let got = look_toward(Vec3::splat(3.0), Vec3::splat(3.0), previous);
        assert_eq!(got, previous);
    }

    #[test]
    fn placer_is_restartable() {
        let curve = straight_line();
        let a: Vec<Pose> = PosePlacer::new(&curve, 0.5, 0.0001).unwrap().collect();
        let b: Vec<Pose> = PosePlacer::new(&curve, 0.5, 0.0001).unwrap().collect();
        assert_eq!(a, b);
    }
}
