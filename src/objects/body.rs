use crate::collision::AABB;
use crate::math::{Transform, Vec2};
use crate::shapes::{Shape, WorldShape};

/// How a body reacts to collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Moves only under its own velocity (platforms, walls, sensors).
    /// Collisions never move it or change its velocity.
    Kinematic,
    /// Fully simulated: gravity, position and velocity correction.
    Dynamic,
}

/// A simulated entity owning exactly one shape.
///
/// The shape holds no transform; world-space geometry is derived from
/// `position` and `rotation` whenever it is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub shape: Shape,
    pub kind: BodyKind,

    pub position: Vec2,
    /// Position at the start of the current substep, used to reconstruct
    /// velocity after the position solve.
    pub previous_position: Vec2,
    pub rotation: f64, // radians
    pub velocity: Vec2,
    pub angular_velocity: f64, // radians per second

    pub(crate) marked_for_deletion: bool,
}

impl Body {
    pub fn new(shape: impl Into<Shape>, kind: BodyKind, position: Vec2) -> Self {
        Self {
            shape: shape.into(),
            kind,
            position,
            previous_position: position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            marked_for_deletion: false,
        }
    }

    pub fn dynamic(shape: impl Into<Shape>, position: Vec2) -> Self {
        Self::new(shape, BodyKind::Dynamic, position)
    }

    pub fn kinematic(shape: impl Into<Shape>, position: Vec2) -> Self {
        Self::new(shape, BodyKind::Kinematic, position)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    /// The body's shape placed at its current position and rotation.
    pub fn bounding_shape_in_world_space(&self) -> WorldShape {
        self.shape.to_world(&self.transform())
    }

    /// World-space bounding box at the current position and rotation.
    pub fn aabb(&self) -> AABB {
        self.bounding_shape_in_world_space().aabb()
    }
}
