pub mod body;

pub use body::{Body, BodyKind};

slotmap::new_key_type! {
    /// Stable identifier of a body inside a `PhysicsWorld`. Stays valid until
    /// the body is purged; a purged handle never aliases a newer body.
    pub struct BodyHandle;
}
