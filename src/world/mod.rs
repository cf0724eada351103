pub mod events;
pub mod physics_world;
pub mod resolver;

pub use events::{CollisionObserver, ObserverId};
pub use physics_world::PhysicsWorld;
pub use resolver::Resolver;
