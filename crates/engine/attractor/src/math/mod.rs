//! Quaternion and vector primitives
//!
//! Everything here is a pure function of its arguments. Degenerate inputs
//! (zero-length quaternions, points at a projection pole) resolve to fixed
//! fallback values instead of errors.

mod projection;
mod quaternion;

pub use projection::{inverse_stereographic_projection, stereographic_projection, POLE_EPSILON};
pub use quaternion::{conjugate, multiply, normalize, rotate_vector, Quaternion};

use glam::Vec3;

/// Euclidean length of `v`
pub fn magnitude(v: Vec3) -> f32 {
    v.length()
}

/// Euclidean distance between two points
pub fn distance(p1: Vec3, p2: Vec3) -> f32 {
    magnitude(p1 - p2)
}
