//! Attractor configuration
//!
//! Configurations are plain values: the engine keeps its own copy. They can be
//! written by hand, loaded from TOML, or derived from a seed with
//! [`AttractorConfig::from_seed`].
//!
//! ```toml
//! seed = 7
//! step_vector = [0.5, 0.25, 0.125]
//! initial_position = [0.0, 0.0, 0.0]
//! side_flip_variation = "flip_smallest"
//! global_rotation = [1.0, 0.0, 0.0, 0.0]
//! ```

use crate::math::Quaternion;
use crate::{Error, Random, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Policy for correcting a candidate position that left the unit ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SideFlipVariation {
    /// Keep the previous position, only toggle the side
    #[default]
    PlainFlip = 0,
    /// Negate the axis with the smallest magnitude
    FlipSmallest = 1,
    /// Negate both axes that are not the largest in magnitude
    FlipAllExceptLargest = 2,
}

impl SideFlipVariation {
    pub const ALL: [SideFlipVariation; 3] = [
        SideFlipVariation::PlainFlip,
        SideFlipVariation::FlipSmallest,
        SideFlipVariation::FlipAllExceptLargest,
    ];

    /// Integer code used by the flat `0 | 1 | 2` interface
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SideFlipVariation {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(SideFlipVariation::PlainFlip),
            1 => Ok(SideFlipVariation::FlipSmallest),
            2 => Ok(SideFlipVariation::FlipAllExceptLargest),
            other => Err(Error::InvalidVariation(other)),
        }
    }
}

/// Parameters of one attractor trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractorConfig {
    /// Seed for the engine's generator (not consumed by the iteration rule)
    pub seed: i32,
    /// Per-axis increment, positive by convention
    pub step_vector: Vec3,
    pub initial_position: Vec3,
    pub side_flip_variation: SideFlipVariation,
    /// Applied every step unless it is exactly the identity
    pub global_rotation: Quaternion,
}

impl Default for AttractorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            step_vector: Vec3::splat(0.1),
            initial_position: Vec3::ZERO,
            side_flip_variation: SideFlipVariation::PlainFlip,
            global_rotation: Quaternion::IDENTITY,
        }
    }
}

impl AttractorConfig {
    pub fn new(step_vector: Vec3, initial_position: Vec3) -> Self {
        Self {
            step_vector,
            initial_position,
            ..Self::default()
        }
    }

    /// Derive a full configuration from `seed`
    ///
    /// Draw order is fixed: step vector (x, y, z), initial direction and
    /// radius, variation, then the optional rotation.
    pub fn from_seed(seed: i32) -> Self {
        let mut rng = Random::new(seed);

        let step_vector = Vec3::new(
            rng.next_float(0.05, 0.5),
            rng.next_float(0.05, 0.5),
            rng.next_float(0.05, 0.5),
        );

        let direction = rng.next_point_on_sphere();
        let radius = rng.next_float(0.0, 0.5);
        let initial_position = direction * radius;

        let side_flip_variation = match rng.next_int(3) {
            1 => SideFlipVariation::FlipSmallest,
            2 => SideFlipVariation::FlipAllExceptLargest,
            _ => SideFlipVariation::PlainFlip,
        };

        let global_rotation = if rng.next_boolean() {
            let axis = rng.next_point_on_sphere();
            let angle = rng.next_float(0.01, 0.2);
            Quaternion::from_axis_angle(axis, angle)
        } else {
            Quaternion::IDENTITY
        };

        Self {
            seed,
            step_vector,
            initial_position,
            side_flip_variation,
            global_rotation,
        }
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_step_vector(mut self, step_vector: Vec3) -> Self {
        self.step_vector = step_vector;
        self
    }

    pub fn with_initial_position(mut self, initial_position: Vec3) -> Self {
        self.initial_position = initial_position;
        self
    }

    pub fn with_variation(mut self, variation: SideFlipVariation) -> Self {
        self.side_flip_variation = variation;
        self
    }

    /// Set the global rotation, normalizing it first
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.global_rotation = rotation.normalize();
        self
    }

    pub fn has_rotation(&self) -> bool {
        !self.global_rotation.is_identity()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
