//! Seeded linear congruential generator
//!
//! `seed <- (seed * 1664525 + 1013904223) mod 2147483647`, evaluated in `i64`
//! so the product cannot overflow. The same seed yields the same sequence on
//! every platform.

use crate::math::Quaternion;
use glam::Vec3;

const A: i64 = 1664525;
const C: i64 = 1013904223;
const M: i64 = 2147483647;

/// Rejection loops that run this long indicate a broken generator
const MAX_REJECTIONS: u32 = 1 << 20;

/// Deterministic pseudo-random generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Random {
    seed: i32,
}

impl Random {
    pub fn new(seed: i32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Replace the internal state; later draws continue from `seed`
    pub fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// Advance the state and return `seed / 2147483647`
    ///
    /// Evaluated in f32, so states within rounding of the modulus return
    /// exactly `1.0`.
    pub fn next(&mut self) -> f32 {
        // |result| < M fits in i32; Rust's `%` truncates toward zero like C
        self.seed = ((self.seed as i64 * A + C) % M) as i32;
        self.seed as f32 / M as f32
    }

    /// Uniform float in `[min, max)`
    pub fn next_float(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    /// Uniform integer in `[0, max)`, or `max` when [`Random::next`] returns `1.0`
    pub fn next_int(&mut self, max: i32) -> i32 {
        (self.next() * max as f32).floor() as i32
    }

    pub fn next_boolean(&mut self) -> bool {
        self.next() < 0.5
    }

    /// Uniform point on the unit sphere S² (Marsaglia 1972)
    pub fn next_point_on_sphere(&mut self) -> Vec3 {
        let mut attempts = 0u32;
        loop {
            let x1 = self.next_float(-1.0, 1.0);
            let x2 = self.next_float(-1.0, 1.0);
            let w = x1 * x1 + x2 * x2;
            if w < 1.0 {
                let s = 2.0 * (1.0 - w).sqrt();
                return Vec3::new(x1 * s, x2 * s, 1.0 - 2.0 * w);
            }
            attempts += 1;
            debug_assert!(attempts < MAX_REJECTIONS, "sphere sampling did not terminate");
        }
    }

    /// Uniform unit quaternion on S³
    ///
    /// Draws `(w, x, y, z)` from the cube `[-1, 1]⁴`, rejects samples outside
    /// the open unit ball, and scales the survivor onto the sphere.
    pub fn next_quaternion(&mut self) -> Quaternion {
        let mut attempts = 0u32;
        loop {
            let w = self.next_float(-1.0, 1.0);
            let x = self.next_float(-1.0, 1.0);
            let y = self.next_float(-1.0, 1.0);
            let z = self.next_float(-1.0, 1.0);
            let sum = w * w + x * x + y * y + z * z;
            // The zero sample has no direction to scale
            if sum < 1.0 && sum > 0.0 {
                let scale = 1.0 / sum.sqrt();
                return Quaternion::new(w * scale, x * scale, y * scale, z * scale);
            }
            attempts += 1;
            debug_assert!(attempts < MAX_REJECTIONS, "quaternion sampling did not terminate");
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}
