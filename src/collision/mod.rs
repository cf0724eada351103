pub mod aabb;
pub mod broad_phase;
pub mod contact;
pub mod gjk;
pub mod narrow_phase;
pub mod sat;
pub mod spatial_hash;

// Re-export key types
pub use aabb::AABB;
pub use broad_phase::{AllPairs, BroadPhase, BroadPhaseKind, SweepAndPrune};
pub use contact::{Contact, Edge, Penetration};
pub use narrow_phase::{GjkEpa, NaiveBox, NarrowPhase, NarrowPhaseKind, Sat};
pub use spatial_hash::SpatialHash;
