//! Small geometric helpers shared by the safety check and the steering functions

use std::f64::consts::PI;

use nalgebra::Rotation2;

use crate::common::types::{Point2D, State2D};

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics; with `min > max` the lower bound wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Wrap an angle into `[-pi, pi)`
pub fn normalize_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Smallest rotation taking `start` to `end`.
///
/// Returns the magnitude of the rotation and its direction (`1.0` for
/// counter-clockwise, `-1.0` for clockwise).
pub fn angle_diff(start: f64, end: f64) -> (f64, f64) {
    let diff = normalize_angle(end - start);
    if diff < 0.0 {
        (-diff, -1.0)
    } else {
        (diff, 1.0)
    }
}

/// Transform a footprint point from the robot frame into the global frame
pub fn robot_point_global(base: &State2D, offset: &Point2D) -> Point2D {
    let rotated = Rotation2::new(base.yaw) * offset.to_vector();
    Point2D::from(base.position().to_vector() + rotated)
}

/// Discretize the straight segment from `start` to `end` into states spaced
/// `step` apart.
///
/// Both endpoints are always yielded. Heading is interpolated along the
/// shorter rotation; velocities are taken from `start`. Samples are produced
/// lazily, so a check can stop at the first failing one.
pub fn points_along(start: &State2D, end: &State2D, step: f64) -> impl Iterator<Item = State2D> {
    let (start, end) = (*start, *end);
    let distance = start.distance(&end);
    let (ux, uy) = if distance > 0.0 {
        ((end.x - start.x) / distance, (end.y - start.y) / distance)
    } else {
        (0.0, 0.0)
    };
    let (turn, direction) = angle_diff(start.yaw, end.yaw);

    // a non-positive or non-finite step degrades to the two endpoints
    let n_steps = if distance > 0.0 && step > 0.0 && step.is_finite() {
        (distance / step).floor() as usize
    } else {
        0
    };
    let spacing = if n_steps > 0 { step } else { 0.0 };
    let tail = (distance - spacing * n_steps as f64 > 1e-9)
        .then_some(State2D { v: start.v, omega: start.omega, ..end });

    (0..=n_steps)
        .map(move |i| {
            let travelled = spacing * i as f64;
            let fraction = if distance > 0.0 { travelled / distance } else { 0.0 };
            State2D {
                x: start.x + ux * travelled,
                y: start.y + uy * travelled,
                yaw: start.yaw + direction * turn * fraction,
                ..start
            }
        })
        .chain(tail)
}
