//! Procedural point cloud for the rugby ball.
//!
//! The ball is a lens-shaped hull stretched along X between two poles at `x = ±2`.
//! Between the poles sit `separations` circular cross-sections of `rings` points each.
//! Cross-section positions are spaced linearly and then pushed outwards with a
//! square-root curve, so the points bunch up towards the tips where the profile
//! changes fastest. The profile radius is evaluated on the linear position.
//!
//! The output order is pole, cross-sections (increasing index, each in increasing
//! angle), opposite pole. The hull builder does not care about order; tests do.

use std::f32::consts::{PI, TAU};

use nalgebra::Point3;

use crate::error::{Result, SceneError};

/// Half-length of the ball along its long axis.
pub const BALL_HALF_LENGTH: f32 = 2.0;

/// Resolution of a generated ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallModel {
    /// Points per cross-section (angular resolution).
    pub rings: usize,
    /// Cross-sections between the two poles.
    pub separations: usize,
}

impl BallModel {
    pub const fn new(rings: usize, separations: usize) -> Self {
        Self { rings, separations }
    }

    /// Number of points `points()` produces.
    pub fn point_count(&self) -> usize {
        2 + self.rings * self.separations
    }

    pub fn points(&self) -> Result<Vec<Point3<f32>>> {
        rugby_ball_points(self.rings, self.separations)
    }
}

impl Default for BallModel {
    fn default() -> Self {
        BALL_MODELS[0]
    }
}

/// Ball presets, coarsest first. The scene cycles through these.
pub const BALL_MODELS: [BallModel; 5] = [
    BallModel::new(4, 2),
    BallModel::new(6, 3),
    BallModel::new(8, 4),
    BallModel::new(12, 12),
    BallModel::new(16, 16),
];

/// Generate the rugby ball point cloud.
///
/// Fails with [`SceneError::InvalidRings`] when `rings == 0`; a cross-section
/// without points would silently collapse the ball to its two poles.
pub fn rugby_ball_points(rings: usize, separations: usize) -> Result<Vec<Point3<f32>>> {
    if rings == 0 {
        return Err(SceneError::InvalidRings);
    }

    let mut points = Vec::with_capacity(2 + rings * separations);
    points.push(Point3::new(-BALL_HALF_LENGTH, 0.0, 0.0));

    for i in 0..separations {
        let linear = axial_linear(i, separations);
        let x = axial_reshaped(linear);
        let radius = profile_radius(linear);

        for j in 0..rings {
            let angle = j as f32 * TAU / rings as f32;
            points.push(Point3::new(x, angle.sin() * radius, angle.cos() * radius));
        }
    }

    points.push(Point3::new(BALL_HALF_LENGTH, 0.0, 0.0));
    Ok(points)
}

/// Linear position of cross-section `i`, strictly inside `(-2, 2)`.
fn axial_linear(i: usize, separations: usize) -> f32 {
    let span = 2.0 * BALL_HALF_LENGTH;
    -BALL_HALF_LENGTH + (i as f32 + 1.0) * span / (separations as f32 + 1.0)
}

/// Square-root power curve, sign preserved: `sign(x) * sqrt(|x| / 2) * 2`.
fn axial_reshaped(linear: f32) -> f32 {
    (linear / BALL_HALF_LENGTH)
        .abs()
        .sqrt()
        .copysign(linear)
        * BALL_HALF_LENGTH
}

/// Ellipsoid-like profile: 1 at the equator, 0 at the poles.
fn profile_radius(linear: f32) -> f32 {
    ((linear / (2.0 * BALL_HALF_LENGTH) + 0.5) * PI).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    fn radius(p: &Point3<f32>) -> f32 {
        (p.y * p.y + p.z * p.z).sqrt()
    }

    #[test]
    fn length_is_two_poles_plus_every_ring() {
        for rings in 1..10 {
            for separations in 0..10 {
                let points = rugby_ball_points(rings, separations).unwrap();
                assert_eq!(points.len(), 2 + rings * separations);
                assert_eq!(
                    BallModel::new(rings, separations).point_count(),
                    points.len()
                );
            }
        }
    }

    #[test]
    fn poles_bracket_the_cloud() {
        for model in BALL_MODELS {
            let points = model.points().unwrap();
            assert_eq!(points.first(), Some(&Point3::new(-2.0, 0.0, 0.0)));
            assert_eq!(points.last(), Some(&Point3::new(2.0, 0.0, 0.0)));
        }
    }

    #[test]
    fn zero_separations_gives_only_poles() {
        let points = rugby_ball_points(7, 0).unwrap();
        assert_eq!(
            points,
            vec![Point3::new(-2.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn zero_rings_is_rejected() {
        assert_eq!(rugby_ball_points(0, 3), Err(SceneError::InvalidRings));
        assert_eq!(rugby_ball_points(0, 0), Err(SceneError::InvalidRings));
    }

    #[test]
    fn four_rings_two_separations_layout() {
        let points = rugby_ball_points(4, 2).unwrap();
        assert_eq!(points.len(), 10);

        // Linear positions are -2/3 and 2/3; reshaped to -/+ 2*sqrt(1/3).
        let x = 2.0 * (1.0f32 / 3.0).sqrt();
        let r = (PI / 3.0).sin();

        for p in &points[1..5] {
            assert!((p.x + x).abs() < EPS);
            assert!((radius(p) - r).abs() < EPS);
        }
        for p in &points[5..9] {
            assert!((p.x - x).abs() < EPS);
            assert!((radius(p) - r).abs() < EPS);
        }

        // First point of a ring sits at angle 0: (y, z) = (0, r).
        assert!(points[1].y.abs() < EPS);
        assert!((points[1].z - r).abs() < EPS);
        // Quarter turn later: (y, z) = (r, 0).
        assert!((points[2].y - r).abs() < EPS);
        assert!(points[2].z.abs() < EPS);
    }

    #[test]
    fn profile_is_symmetric_about_the_midline() {
        for separations in 1..12 {
            let rings = 5;
            let points = rugby_ball_points(rings, separations).unwrap();
            let ring = |i: usize| &points[1 + i * rings..1 + (i + 1) * rings];

            for i in 0..separations {
                let a = ring(i);
                let b = ring(separations - 1 - i);
                for (pa, pb) in a.iter().zip(b) {
                    assert!((radius(pa) - radius(pb)).abs() < EPS);
                    assert!((pa.x + pb.x).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn cross_sections_stay_inside_the_poles() {
        let points = rugby_ball_points(8, 16).unwrap();
        let mut last_x = -2.0;
        for p in &points[1..points.len() - 1] {
            assert!(p.x > -2.0 && p.x < 2.0);
            assert!(p.x >= last_x);
            assert!(radius(p) <= 1.0 + EPS);
            last_x = p.x;
        }
    }

    #[test]
    fn reshaping_pushes_sections_towards_the_tips() {
        // Off-center sections move away from the equator.
        for linear in [-1.5f32, -0.5, 0.25, 1.0] {
            assert!(axial_reshaped(linear).abs() >= linear.abs());
        }
        assert_eq!(axial_reshaped(0.0), 0.0);
    }
}
