//! Quaternion type and the Hamilton product

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Quaternion `w + xi + yj + zk` stored as four `f32` scalars
///
/// Serialized as `[w, x, y, z]`. The product is computed with the explicit
/// component formula rather than glam's `Quat`, so results round the same way
/// on every target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// The identity rotation, also the north pole of S³
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Pure quaternion `{0, v}`
    pub const fn from_vector(v: Vec3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Rotation of `angle` radians about `axis`
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Imaginary part as a vector
    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn length_squared(&self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Exact comparison against `{1, 0, 0, 0}`
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn normalize(self) -> Self {
        normalize(self)
    }

    pub fn conjugate(self) -> Self {
        conjugate(self)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        multiply(self, rhs)
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from([w, x, y, z]: [f32; 4]) -> Self {
        Self::new(w, x, y, z)
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(q: Quaternion) -> Self {
        [q.w, q.x, q.y, q.z]
    }
}

// glam stores quaternions in (x, y, z, w) order
impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

/// Scale `q` to unit length
///
/// The zero quaternion has no direction and maps to the identity.
pub fn normalize(q: Quaternion) -> Quaternion {
    let len = q.length();
    if len == 0.0 {
        return Quaternion::IDENTITY;
    }
    let inv = 1.0 / len;
    Quaternion::new(q.w * inv, q.x * inv, q.y * inv, q.z * inv)
}

/// Hamilton product `q1 * q2`
pub fn multiply(q1: Quaternion, q2: Quaternion) -> Quaternion {
    Quaternion {
        w: q1.w * q2.w - q1.x * q2.x - q1.y * q2.y - q1.z * q2.z,
        x: q1.w * q2.x + q1.x * q2.w + q1.y * q2.z - q1.z * q2.y,
        y: q1.w * q2.y - q1.x * q2.z + q1.y * q2.w + q1.z * q2.x,
        z: q1.w * q2.z + q1.x * q2.y - q1.y * q2.x + q1.z * q2.w,
    }
}

pub fn conjugate(q: Quaternion) -> Quaternion {
    Quaternion::new(q.w, -q.x, -q.y, -q.z)
}

/// Rotate `v` by the unit quaternion `q` (`q v q*`)
///
/// `q` must already be normalized; the conjugate stands in for the inverse.
pub fn rotate_vector(v: Vec3, q: Quaternion) -> Vec3 {
    let p = Quaternion::from_vector(v);
    multiply(multiply(q, p), conjugate(q)).vector()
}
