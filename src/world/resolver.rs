//! Contact resolution: position correction during the solve, velocity
//! correction after velocities are reconstructed from positions.
//!
//! Contacts are resolved one at a time in detection order. A body touching
//! several others is corrected sequentially, so the result depends on order;
//! re-detecting every substep keeps the error small.

use crate::collision::Contact;
use crate::config::WorldConfig;
use crate::objects::Body;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    pub restitution: f64,
    pub penetration_slop: f64,
}

impl Resolver {
    pub fn from_config(config: &WorldConfig) -> Self {
        Resolver { restitution: config.restitution, penetration_slop: config.penetration_slop }
    }

    /// Pushes dynamic bodies apart along the contact normal. Two dynamic
    /// bodies split the correction evenly; a kinematic side never moves.
    ///
    /// Impacts are pushed out to exactly touching so that a bounce leaves the
    /// pair apart on the next substep. Resting contacts keep up to
    /// `penetration_slop` of overlap.
    pub fn resolve_position(
        &self,
        body1: &mut Body,
        body2: &mut Body,
        contact: &Contact,
        normal_speed_before: f64,
        resting_speed: f64,
    ) {
        let depth = if is_impact(normal_speed_before, resting_speed) {
            contact.magnitude
        } else {
            (contact.magnitude - self.penetration_slop).max(0.0)
        };
        if depth <= 0.0 {
            return;
        }
        let correction = contact.normal * depth;
        match (body1.is_dynamic(), body2.is_dynamic()) {
            (true, true) => {
                body1.position += correction * 0.5;
                body2.position -= correction * 0.5;
            }
            (true, false) => body1.position += correction,
            (false, true) => body2.position -= correction,
            (false, false) => {}
        }
    }

    /// Sets the relative normal velocity of a contact from the one measured
    /// before the solve, discarding whatever the position correction added.
    ///
    /// `normal_speed_before` is `(v1 - v2) · normal` before any correction;
    /// negative means the bodies were approaching and they bounce back with
    /// `restitution` of that speed. Approaches no faster than `resting_speed`
    /// do not bounce, which keeps resting contacts still under gravity.
    /// Separating contacts keep their separation speed.
    pub fn resolve_velocity(
        &self,
        body1: &mut Body,
        body2: &mut Body,
        contact: &Contact,
        normal_speed_before: f64,
        resting_speed: f64,
    ) {
        let target = if normal_speed_before >= 0.0 {
            normal_speed_before
        } else if is_impact(normal_speed_before, resting_speed) {
            -self.restitution * normal_speed_before
        } else {
            0.0
        };
        let normal_speed = (body1.velocity - body2.velocity).dot(contact.normal);
        let delta = target - normal_speed;

        match (body1.is_dynamic(), body2.is_dynamic()) {
            (true, true) => {
                body1.velocity += contact.normal * (delta * 0.5);
                body2.velocity -= contact.normal * (delta * 0.5);
            }
            (true, false) => body1.velocity += contact.normal * delta,
            (false, true) => body2.velocity -= contact.normal * delta,
            (false, false) => {}
        }
    }
}

/// An approach faster than `resting_speed`.
fn is_impact(normal_speed_before: f64, resting_speed: f64) -> bool {
    -normal_speed_before > resting_speed
}
