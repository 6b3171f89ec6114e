//! Stereographic projection between S³ and ℝ³ from the north pole `{1, 0, 0, 0}`

use super::Quaternion;
use glam::Vec3;

/// Distance from the pole (or origin) below which the projections return their limit value
pub const POLE_EPSILON: f32 = 1e-10;

/// Project a unit quaternion from S³ to ℝ³
///
/// At the north pole the projection is unbounded; the origin is returned instead.
pub fn stereographic_projection(q: Quaternion) -> Vec3 {
    let denom = 1.0 - q.w;
    if denom.abs() < POLE_EPSILON {
        return Vec3::ZERO;
    }
    let scale = 1.0 / denom;
    Vec3::new(q.x * scale, q.y * scale, q.z * scale)
}

/// Lift a point of ℝ³ back onto S³
///
/// Points at (or numerically at) the origin map to the north pole.
pub fn inverse_stereographic_projection(p: Vec3) -> Quaternion {
    let r2 = p.x * p.x + p.y * p.y + p.z * p.z;
    if r2 < POLE_EPSILON {
        return Quaternion::IDENTITY;
    }
    let w = (r2 - 1.0) / (r2 + 1.0);
    let scale = 2.0 / (r2 + 1.0);
    Quaternion::new(w, p.x * scale, p.y * scale, p.z * scale)
}
