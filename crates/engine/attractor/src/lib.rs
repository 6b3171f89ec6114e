//! Attractor crate - Deterministic quaternion attractor point generation
//!
//! Iterates a stepping rule inside the unit ball of ℝ³, corrects boundary
//! crossings with one of three side-flip policies, and optionally rotates
//! every point through S³ via stereographic projection. The output is a flat
//! `(x, y, z, side)` buffer for a rendering layer to consume.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  AttractorEngine                         │
//! │  ├── AttractorState (position + side)                   │
//! │  ├── Boundary rule + SideFlipVariation                  │
//! │  ├── Global rotation through S³                         │
//! │  └── Fixed-capacity point buffer                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  Random (seeded LCG)                                     │
//! │  ├── Uniform float / int / bool                         │
//! │  └── Marsaglia sphere and quaternion sampling           │
//! ├─────────────────────────────────────────────────────────┤
//! │  math                                                    │
//! │  ├── Quaternion, Hamilton product, conjugate            │
//! │  └── Stereographic projection and its inverse           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use attractor::{AttractorConfig, AttractorEngine, SideFlipVariation};
//! use glam::Vec3;
//!
//! let config = AttractorConfig::new(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO)
//!     .with_variation(SideFlipVariation::PlainFlip);
//!
//! let mut engine = AttractorEngine::new(config, 1024);
//! engine.generate_points(3).unwrap();
//!
//! let stats = engine.statistics();
//! assert_eq!(stats.point_count, 3);
//! assert_eq!(stats.side_flip_count, 1);
//! assert_eq!(engine.points().len(), 3 * 4);
//! ```

mod config;
mod engine;
mod error;
pub mod math;
mod random;

pub use config::{AttractorConfig, SideFlipVariation};
pub use engine::{
    AttractorEngine, AttractorState, Point, Side, Statistics, POINT_STRIDE, STATISTICS_LEN,
};
pub use error::{Error, Result};
pub use math::Quaternion;
pub use random::Random;

// Re-export glam for convenience
pub use glam;
