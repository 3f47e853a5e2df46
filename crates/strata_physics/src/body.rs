//! Rigid body parameter block
//!
//! Documents carry physics parameters for the consuming engine; nothing in
//! this workspace simulates them. The parameter set mirrors what the target
//! runtime reads back out of the file.

use serde::{Serialize, Deserialize};
use strata_math::Vec4;

/// Collision filtering data: which layer a body lives on and which group
/// it belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub layer: u8,
    pub flags: u8,
    pub group: u16,
}

impl CollisionFilter {
    pub const fn new(layer: u8, group: u16) -> Self {
        Self {
            layer,
            flags: 0,
            group,
        }
    }
}

/// How the consuming engine integrates the body's motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    Invalid,
    Dynamic,
    SphereInertia,
    BoxInertia,
    Keyframed,
    Fixed,
}

impl Default for MotionKind {
    fn default() -> Self {
        MotionKind::Dynamic
    }
}

/// Collision quality tier: how aggressively the engine resolves contacts
/// for the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityKind {
    Invalid,
    Fixed,
    Keyframed,
    Debris,
    Moving,
    Critical,
    Bullet,
    KeyframedReporting,
}

impl Default for QualityKind {
    fn default() -> Self {
        QualityKind::Fixed
    }
}

/// Full rigid-body parameter block.
///
/// Read and written wholesale; there are no per-field update operations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyParams {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
    pub linear_velocity: Vec4,
    pub angular_velocity: Vec4,
    /// Center of mass offset
    pub center: Vec4,
    pub max_linear_velocity: f32,
    pub max_angular_velocity: f32,
    pub penetration_depth: f32,
    pub filter: CollisionFilter,
    pub motion: MotionKind,
    pub quality: QualityKind,
}

impl Default for BodyParams {
    fn default() -> Self {
        // Format-conventional defaults; consumers expect these when a field
        // was never authored.
        Self {
            mass: 1.0,
            linear_damping: 0.1,
            angular_damping: 0.05,
            friction: 0.5,
            restitution: 0.4,
            linear_velocity: Vec4::ZERO,
            angular_velocity: Vec4::ZERO,
            center: Vec4::ZERO,
            max_linear_velocity: 104.4,
            max_angular_velocity: 31.57,
            penetration_depth: 0.15,
            filter: CollisionFilter::default(),
            motion: MotionKind::default(),
            quality: QualityKind::default(),
        }
    }
}

impl BodyParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the friction coefficient
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the restitution, clamped to [0, 1]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set the initial linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec4) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the motion kind
    pub fn with_motion(mut self, motion: MotionKind) -> Self {
        self.motion = motion;
        self
    }

    /// Set the collision quality tier
    pub fn with_quality(mut self, quality: QualityKind) -> Self {
        self.quality = quality;
        self
    }

    /// A fixed (never-moving) scenery body on the given filter layer
    pub fn fixed(layer: u8) -> Self {
        Self::new()
            .with_mass(0.0)
            .with_motion(MotionKind::Fixed)
            .with_quality(QualityKind::Fixed)
            .with_filter(CollisionFilter::new(layer, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BodyParams::default();
        assert_eq!(params.mass, 1.0);
        assert_eq!(params.restitution, 0.4);
        assert_eq!(params.max_linear_velocity, 104.4);
        assert_eq!(params.motion, MotionKind::Dynamic);
        assert_eq!(params.quality, QualityKind::Fixed);
    }

    #[test]
    fn test_builder_chain() {
        let params = BodyParams::new()
            .with_mass(12.5)
            .with_friction(0.8)
            .with_linear_velocity(Vec4::new(1.0, 0.0, 0.0, 0.0))
            .with_filter(CollisionFilter::new(2, 9));

        assert_eq!(params.mass, 12.5);
        assert_eq!(params.friction, 0.8);
        assert_eq!(params.linear_velocity.x, 1.0);
        assert_eq!(params.filter.layer, 2);
        assert_eq!(params.filter.group, 9);
    }

    #[test]
    fn test_restitution_clamping() {
        assert_eq!(BodyParams::new().with_restitution(1.5).restitution, 1.0);
        assert_eq!(BodyParams::new().with_restitution(-0.5).restitution, 0.0);
    }

    #[test]
    fn test_fixed_preset() {
        let params = BodyParams::fixed(1);
        assert_eq!(params.mass, 0.0);
        assert_eq!(params.motion, MotionKind::Fixed);
        assert_eq!(params.filter.layer, 1);
    }
}
