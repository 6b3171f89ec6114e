//! Attractor engine: the stateful point-iteration rule
//!
//! Each step moves the position by `step_vector * side`. Candidates that stay
//! inside the closed unit ball are accepted as-is; candidates outside it are
//! corrected by the configured [`SideFlipVariation`] and toggle the side. A
//! non-identity global rotation is then applied through S³, and the result is
//! appended to the point buffer.

use crate::math::{inverse_stereographic_projection, magnitude, multiply, normalize, Quaternion};
use crate::{AttractorConfig, Error, Random, Result, SideFlipVariation};
use glam::Vec3;

/// Floats per stored point: `x, y, z, side`
pub const POINT_STRIDE: usize = 4;

/// Number of entries in [`Statistics::to_array`]
pub const STATISTICS_LEN: usize = 7;

/// Hemisphere label attached to the iterated position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Positive,
    Negative,
}

impl Side {
    pub fn as_f32(self) -> f32 {
        match self {
            Side::Positive => 1.0,
            Side::Negative => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Side::Positive => Side::Negative,
            Side::Negative => Side::Positive,
        }
    }

    /// `Positive` for `value >= 0`, `Negative` otherwise
    pub fn from_sign(value: f32) -> Self {
        if value >= 0.0 {
            Side::Positive
        } else {
            Side::Negative
        }
    }
}

/// Current iteration state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractorState {
    pub position: Vec3,
    pub side: Side,
}

impl AttractorState {
    fn initial(config: &AttractorConfig) -> Self {
        Self {
            position: config.initial_position,
            side: Side::Positive,
        }
    }
}

/// One decoded entry of the point buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec3,
    pub side: Side,
}

/// Snapshot of the engine counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total_steps: u64,
    pub side_flip_count: u64,
    pub point_count: usize,
    pub current_position: Vec3,
    pub current_side: Side,
}

impl Statistics {
    /// `[total_steps, side_flip_count, point_count, x, y, z, side]`
    pub fn to_array(&self) -> [f32; STATISTICS_LEN] {
        [
            self.total_steps as f32,
            self.side_flip_count as f32,
            self.point_count as f32,
            self.current_position.x,
            self.current_position.y,
            self.current_position.z,
            self.current_side.as_f32(),
        ]
    }
}

/// Generates attractor point sequences into a fixed-capacity buffer
///
/// The buffer is allocated once at construction and overwritten by every
/// generation.
#[derive(Debug, Clone)]
pub struct AttractorEngine {
    config: AttractorConfig,
    state: AttractorState,
    random: Random,

    /// Flat `(x, y, z, side)` quadruples
    points: Vec<f32>,
    max_points: usize,

    total_steps: u64,
    side_flip_count: u64,
}

impl AttractorEngine {
    /// Create an engine with room for `max_points` points
    ///
    /// # Panics
    /// If the buffer of `max_points * POINT_STRIDE` floats cannot be allocated.
    /// Use [`AttractorEngine::try_new`] for untrusted capacities.
    pub fn new(config: AttractorConfig, max_points: usize) -> Self {
        // An overflowing product saturates so `with_capacity` reports capacity overflow
        let len = max_points.checked_mul(POINT_STRIDE).unwrap_or(usize::MAX);
        Self::with_buffer(config, max_points, Vec::with_capacity(len))
    }

    /// Create an engine, failing with [`Error::BufferTooLarge`] instead of panicking
    pub fn try_new(config: AttractorConfig, max_points: usize) -> Result<Self> {
        let len = max_points
            .checked_mul(POINT_STRIDE)
            .ok_or(Error::BufferTooLarge(max_points))?;
        let mut points = Vec::new();
        points
            .try_reserve_exact(len)
            .map_err(|_| Error::BufferTooLarge(max_points))?;
        Ok(Self::with_buffer(config, max_points, points))
    }

    fn with_buffer(config: AttractorConfig, max_points: usize, points: Vec<f32>) -> Self {
        let state = AttractorState::initial(&config);
        let random = Random::new(config.seed);
        Self {
            config,
            state,
            random,
            points,
            max_points,
            total_steps: 0,
            side_flip_count: 0,
        }
    }

    pub fn config(&self) -> &AttractorConfig {
        &self.config
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn point_count(&self) -> usize {
        self.points.len() / POINT_STRIDE
    }

    /// Current state of the engine's generator
    ///
    /// The generator is reseeded from the config but the iteration rule
    /// never draws from it, so trajectories do not depend on the seed.
    pub fn random_seed(&self) -> i32 {
        self.random.seed()
    }

    /// Reset, then generate `count` points
    ///
    /// Fails without touching any state when `count` exceeds `max_points`.
    pub fn generate_points(&mut self, count: usize) -> Result<()> {
        if count > self.max_points {
            tracing::warn!(
                "Rejected generation of {} points, capacity is {}",
                count,
                self.max_points
            );
            return Err(Error::CapacityExceeded {
                requested: count,
                capacity: self.max_points,
            });
        }

        self.reset();
        self.random.set_seed(self.config.seed);

        for _ in 0..count {
            self.step();
        }

        tracing::debug!(
            "Generated {} points ({} side flips)",
            self.point_count(),
            self.side_flip_count
        );
        Ok(())
    }

    /// Return to the configured initial state and clear the buffer
    pub fn reset(&mut self) {
        self.state = AttractorState::initial(&self.config);
        self.points.clear();
        self.total_steps = 0;
        self.side_flip_count = 0;
        tracing::debug!("Attractor reset to {:?}", self.state.position);
    }

    /// Replace the configuration without resetting the trajectory
    pub fn update_config(&mut self, config: AttractorConfig) {
        self.random.set_seed(config.seed);
        self.config = config;
        tracing::debug!("Attractor config updated: {:?}", self.config);
    }

    /// All generated points as flat `(x, y, z, side)` quadruples
    pub fn points(&self) -> &[f32] {
        &self.points
    }

    /// Up to `count` points starting at point index `start`
    ///
    /// The range is clamped to the generated points; a start past the end
    /// yields an empty slice.
    pub fn point_range(&self, start: usize, count: usize) -> &[f32] {
        let generated = self.point_count();
        let start = start.min(generated);
        let end = start.saturating_add(count).min(generated);
        &self.points[start * POINT_STRIDE..end * POINT_STRIDE]
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        let offset = index.checked_mul(POINT_STRIDE)?;
        let chunk = self.points.get(offset..offset.checked_add(POINT_STRIDE)?)?;
        Some(decode_point(chunk))
    }

    pub fn points_iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.chunks_exact(POINT_STRIDE).map(decode_point)
    }

    pub fn current_state(&self) -> AttractorState {
        self.state
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_steps: self.total_steps,
            side_flip_count: self.side_flip_count,
            point_count: self.point_count(),
            current_position: self.state.position,
            current_side: self.state.side,
        }
    }

    /// Advance one transition and record the resulting point
    fn step(&mut self) {
        let side = self.state.side;
        let candidate = self.state.position + self.config.step_vector * side.as_f32();

        if magnitude(candidate) <= 1.0 {
            self.state.position = candidate;
        } else {
            self.state.position = match self.config.side_flip_variation {
                SideFlipVariation::PlainFlip => self.state.position,
                SideFlipVariation::FlipSmallest => flip_smallest(candidate),
                SideFlipVariation::FlipAllExceptLargest => flip_all_except_largest(candidate),
            };
            self.state.side = side.flipped();
            self.side_flip_count += 1;
            tracing::trace!(
                "Boundary crossing at step {}: |c| = {}",
                self.total_steps,
                magnitude(candidate)
            );
        }

        if self.config.has_rotation() {
            self.state = rotate_state(self.state.position, self.config.global_rotation);
        }

        self.points.extend_from_slice(&[
            self.state.position.x,
            self.state.position.y,
            self.state.position.z,
            self.state.side.as_f32(),
        ]);
        self.total_steps += 1;
    }
}

fn decode_point(chunk: &[f32]) -> Point {
    Point {
        position: Vec3::new(chunk[0], chunk[1], chunk[2]),
        side: Side::from_sign(chunk[3]),
    }
}

/// Index of the axis with the smallest magnitude; ties go to the earlier axis
fn smallest_axis(v: Vec3) -> usize {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        0
    } else if a.y <= a.z {
        1
    } else {
        2
    }
}

/// Index of the axis with the largest magnitude; ties go to the earlier axis
fn largest_axis(v: Vec3) -> usize {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}

fn flip_smallest(candidate: Vec3) -> Vec3 {
    let axis = smallest_axis(candidate);
    let mut flipped = candidate;
    flipped[axis] = -candidate[axis];
    flipped
}

fn flip_all_except_largest(candidate: Vec3) -> Vec3 {
    let keep = largest_axis(candidate);
    let mut flipped = -candidate;
    flipped[keep] = candidate[keep];
    flipped
}

/// Rotate `position` through S³ and read the side off the rotated `w`
///
/// The way back to ℝ³ scales the imaginary part by `2 / (ρ² + 1)`, which keeps
/// rotated points inside the closed unit ball.
fn rotate_state(position: Vec3, rotation: Quaternion) -> AttractorState {
    let lifted = inverse_stereographic_projection(position);
    let rotated = normalize(multiply(rotation, lifted));

    let im = rotated.vector();
    let rho2 = im.x * im.x + im.y * im.y + im.z * im.z;
    let scale = 2.0 / (rho2 + 1.0);

    AttractorState {
        position: im * scale,
        side: Side::from_sign(rotated.w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config(step: Vec3) -> AttractorConfig {
        AttractorConfig::new(step, Vec3::ZERO)
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Positive.flipped(), Side::Negative);
        assert_eq!(Side::Negative.flipped(), Side::Positive);
        assert_eq!(Side::from_sign(0.0), Side::Positive);
        assert_eq!(Side::from_sign(-0.1), Side::Negative);
        assert_eq!(Side::Negative.as_f32(), -1.0);
    }

    #[test]
    fn test_smallest_axis_ties_prefer_first() {
        assert_eq!(smallest_axis(Vec3::new(1.5, 0.0, 0.0)), 1);
        assert_eq!(smallest_axis(Vec3::new(0.2, 0.2, 0.2)), 0);
        assert_eq!(smallest_axis(Vec3::new(0.9, 0.3, 0.3)), 1);
        assert_eq!(smallest_axis(Vec3::new(0.9, 0.5, -0.3)), 2);
    }

    #[test]
    fn test_largest_axis_ties_prefer_first() {
        assert_eq!(largest_axis(Vec3::new(0.5, 0.5, 0.5)), 0);
        assert_eq!(largest_axis(Vec3::new(0.1, -0.8, 0.8)), 1);
        assert_eq!(largest_axis(Vec3::new(0.1, 0.2, -0.9)), 2);
    }

    #[test]
    fn test_flip_smallest() {
        let c = Vec3::new(0.9, -0.2, 0.5);
        assert_eq!(flip_smallest(c), Vec3::new(0.9, 0.2, 0.5));
    }

    #[test]
    fn test_flip_all_except_largest() {
        let c = Vec3::new(0.3, -0.9, 0.5);
        assert_eq!(flip_all_except_largest(c), Vec3::new(-0.3, -0.9, -0.5));
    }

    #[test]
    fn test_plain_flip_scenario() {
        let mut engine = AttractorEngine::new(plain_config(Vec3::new(0.5, 0.0, 0.0)), 16);
        engine.generate_points(4).unwrap();

        let points: Vec<Point> = engine.points_iter().collect();
        assert_eq!(points[0].position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(points[0].side, Side::Positive);

        // |c| == 1 exactly is still inside
        assert_eq!(points[1].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(points[1].side, Side::Positive);

        assert_eq!(points[2].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(points[2].side, Side::Negative);

        // Walking back along the negative side
        assert_eq!(points[3].position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(points[3].side, Side::Negative);

        let stats = engine.statistics();
        assert_eq!(stats.side_flip_count, 1);
        assert_eq!(stats.total_steps, 4);
        assert_eq!(stats.point_count, 4);
    }

    #[test]
    fn test_flip_smallest_crossing() {
        let config = AttractorConfig::new(Vec3::new(0.6, 0.1, 0.0), Vec3::ZERO)
            .with_variation(SideFlipVariation::FlipSmallest);
        let mut engine = AttractorEngine::new(config, 8);
        engine.generate_points(2).unwrap();

        // Second candidate (1.2, 0.2, 0.0) leaves the ball; z is the smallest axis
        let second = engine.point(1).unwrap();
        assert_eq!(second.side, Side::Negative);
        assert!((second.position - Vec3::new(1.2, 0.2, 0.0)).length() < 1e-6);
        assert!(second.position.z.is_sign_negative());
    }

    #[test]
    fn test_flip_all_except_largest_crossing() {
        let config = AttractorConfig::new(Vec3::new(0.6, 0.1, 0.2), Vec3::ZERO)
            .with_variation(SideFlipVariation::FlipAllExceptLargest);
        let mut engine = AttractorEngine::new(config, 8);
        engine.generate_points(2).unwrap();

        let second = engine.point(1).unwrap();
        assert_eq!(second.side, Side::Negative);
        assert!((second.position - Vec3::new(1.2, -0.2, -0.4)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_from_origin() {
        let rotation = Quaternion::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2);
        let config = plain_config(Vec3::ZERO).with_rotation(rotation);
        let mut engine = AttractorEngine::new(config, 4);
        engine.generate_points(1).unwrap();

        // Origin lifts to the pole, the pole rotates onto the rotation itself
        let im = rotation.vector();
        let expected = im * (2.0 / (im.length_squared() + 1.0));
        let point = engine.point(0).unwrap();
        assert!((point.position - expected).length() < 1e-6);
        assert!((point.position.z - 0.942_809).abs() < 1e-5);
        assert_eq!(point.side, Side::Positive);
    }

    #[test]
    fn test_rotation_sets_side_from_w() {
        // Lifted origin is the pole, so the rotated w is the rotation's own w
        let rotation = Quaternion::new(-0.2, 0.9, 0.0, 0.0).normalize();
        let config = plain_config(Vec3::ZERO).with_rotation(rotation);
        let mut engine = AttractorEngine::new(config, 4);
        engine.generate_points(1).unwrap();

        assert_eq!(engine.point(0).unwrap().side, Side::Negative);
    }

    /// Lift `position`, apply `rotation`, and project back the way `step` does
    fn rotated_by_hand(position: Vec3, rotation: Quaternion) -> (Vec3, Side) {
        let q = normalize(multiply(rotation, inverse_stereographic_projection(position)));
        let im = q.vector();
        (im * (2.0 / (im.length_squared() + 1.0)), Side::from_sign(q.w))
    }

    #[test]
    fn test_rotation_runs_after_boundary_rule() {
        let rotation = Quaternion::from_axis_angle(Vec3::Z, 0.01);
        let config = plain_config(Vec3::new(0.6, 0.0, 0.0)).with_rotation(rotation);
        let rotation = config.global_rotation;
        let mut engine = AttractorEngine::new(config, 8);
        engine.generate_points(8).unwrap();
        let points: Vec<Point> = engine.points_iter().collect();

        // Step 1: (0.6, 0, 0) is accepted, then rotated; the lift has w < 0
        let (expected, side) = rotated_by_hand(Vec3::new(0.6, 0.0, 0.0), rotation);
        assert!((points[0].position - expected).length() < 1e-6);
        let approx = Vec3::new(0.992_202, 0.004_961, -0.002_646);
        assert!((points[0].position - approx).length() < 1e-4);
        assert_eq!(side, Side::Negative);
        assert_eq!(points[0].side, Side::Negative);

        // Step 2: candidate moves back along the negative side and is accepted
        let candidate = points[0].position - Vec3::new(0.6, 0.0, 0.0);
        let (expected, _) = rotated_by_hand(candidate, rotation);
        assert!((points[1].position - expected).length() < 1e-6);

        // Steps 1-6 stay inside; step 7 crosses. PlainFlip keeps point 5's
        // position and flips Negative to Positive, then the rotation's w
        // sets the side back to Negative
        let mut flips = Vec::new();
        for count in 1..=8 {
            engine.generate_points(count).unwrap();
            flips.push(engine.statistics().side_flip_count);
        }
        assert_eq!(flips, vec![0, 0, 0, 0, 0, 0, 1, 2]);

        assert_eq!(points[5].side, Side::Negative);
        let (expected, side) = rotated_by_hand(points[5].position, rotation);
        assert!((points[6].position - expected).length() < 1e-6);
        assert_eq!(points[6].side, side);
        assert_eq!(points[6].side, Side::Negative);
        assert_ne!(points[6].side, points[5].side.flipped());
    }

    #[test]
    fn test_try_new_rejects_oversized_buffer() {
        let config = plain_config(Vec3::ZERO);
        assert!(matches!(
            AttractorEngine::try_new(config.clone(), usize::MAX),
            Err(Error::BufferTooLarge(usize::MAX))
        ));
        assert!(matches!(
            AttractorEngine::try_new(config.clone(), usize::MAX / POINT_STRIDE),
            Err(Error::BufferTooLarge(_))
        ));

        let engine = AttractorEngine::try_new(config, 16).unwrap();
        assert_eq!(engine.max_points(), 16);
        assert!(engine.points.capacity() >= 16 * POINT_STRIDE);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_new_panics_on_overflowing_capacity() {
        AttractorEngine::new(plain_config(Vec3::ZERO), usize::MAX);
    }

    #[test]
    fn test_rotated_points_stay_in_ball() {
        let config = AttractorConfig::new(Vec3::new(0.3, 0.2, 0.1), Vec3::ZERO)
            .with_variation(SideFlipVariation::FlipSmallest)
            .with_rotation(Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.3));
        let mut engine = AttractorEngine::new(config, 500);
        engine.generate_points(500).unwrap();

        for point in engine.points_iter() {
            assert!(point.position.length() <= 1.0 + 1e-5, "{:?}", point);
        }
    }

    #[test]
    fn test_capacity_exceeded_is_atomic() {
        let mut engine = AttractorEngine::new(plain_config(Vec3::new(0.3, 0.0, 0.0)), 10);
        engine.generate_points(5).unwrap();
        let before = engine.statistics();
        let points_before = engine.points().to_vec();

        let result = engine.generate_points(11);
        assert!(matches!(
            result,
            Err(Error::CapacityExceeded {
                requested: 11,
                capacity: 10
            })
        ));
        assert_eq!(engine.statistics(), before);
        assert_eq!(engine.points(), &points_before[..]);
    }

    #[test]
    fn test_point_range_clamps() {
        let mut engine = AttractorEngine::new(plain_config(Vec3::new(0.1, 0.0, 0.0)), 10);
        engine.generate_points(5).unwrap();

        assert_eq!(engine.point_range(0, 5).len(), 5 * POINT_STRIDE);
        assert_eq!(engine.point_range(3, 100).len(), 2 * POINT_STRIDE);
        assert_eq!(engine.point_range(3, 100), &engine.points()[12..20]);
        assert!(engine.point_range(5, 1).is_empty());
        assert!(engine.point_range(usize::MAX, usize::MAX).is_empty());
        assert!(engine.point(5).is_none());
    }

    #[test]
    fn test_buffer_is_reused() {
        let mut engine = AttractorEngine::new(plain_config(Vec3::new(0.1, 0.0, 0.0)), 100);
        let capacity = engine.points.capacity();

        engine.generate_points(100).unwrap();
        engine.generate_points(30).unwrap();
        assert_eq!(engine.point_count(), 30);
        assert_eq!(engine.points.capacity(), capacity);
    }

    #[test]
    fn test_update_config_does_not_reset() {
        let mut engine = AttractorEngine::new(plain_config(Vec3::new(0.1, 0.0, 0.0)), 10);
        engine.generate_points(3).unwrap();
        let state = engine.current_state();

        engine.update_config(plain_config(Vec3::new(0.0, 0.2, 0.0)).with_seed(77));
        assert_eq!(engine.current_state(), state);
        assert_eq!(engine.point_count(), 3);
        assert_eq!(engine.random_seed(), 77);

        engine.reset();
        assert_eq!(engine.current_state().position, Vec3::ZERO);
        assert_eq!(engine.statistics().total_steps, 0);
        assert_eq!(engine.point_count(), 0);
    }

    #[test]
    fn test_statistics_array_order() {
        let mut engine = AttractorEngine::new(plain_config(Vec3::new(0.5, 0.0, 0.0)), 4);
        engine.generate_points(3).unwrap();

        assert_eq!(
            engine.statistics().to_array(),
            [3.0, 1.0, 3.0, 1.0, 0.0, 0.0, -1.0]
        );
    }
}
