use crate::collision::Contact;

slotmap::new_key_type! {
    /// Returned by `PhysicsWorld::subscribe`, used to unsubscribe.
    pub struct ObserverId;
}

/// Receives the contact list of every solve pass that found collisions.
///
/// Observers run while the world is mutably borrowed, so game logic reacting
/// to a contact (deleting a body, spawning another) has to record what it
/// wants and apply it after `step` returns.
pub trait CollisionObserver {
    fn on_collisions(&mut self, contacts: &[Contact]);
}

impl<F> CollisionObserver for F
where
    F: FnMut(&[Contact]),
{
    fn on_collisions(&mut self, contacts: &[Contact]) {
        self(contacts)
    }
}
