//! 2D rigid-body collision detection and resolution.
//!
//! A [`PhysicsWorld`] owns circles and convex polygons, advances them in
//! substeps and pushes overlapping bodies apart. Narrow phase (SAT, GJK/EPA
//! or a box test) and broad phase are chosen once through [`WorldConfig`].
//! Contacts found while stepping are published to subscribed observers.

pub mod collision;
pub mod config;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{BroadPhaseKind, Contact, NarrowPhaseKind, Penetration};
pub use config::WorldConfig;
pub use error::{PhysicsError, PhysicsResult};
pub use math::vec2::Vec2;
pub use objects::{Body, BodyHandle, BodyKind};
pub use shapes::{Circle, Polygon, Shape, ShapeKind};
pub use world::{CollisionObserver, ObserverId, PhysicsWorld};
