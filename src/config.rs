//! Tunable simulation parameters.

use serde::{Deserialize, Serialize};

use crate::collision::{BroadPhaseKind, NarrowPhaseKind};
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::Vec2;

/// Parameters of a `PhysicsWorld`, fixed at construction.
///
/// Missing fields deserialize to their defaults, so a config file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Acceleration applied to dynamic bodies, in units per second squared.
    /// The default points down in a y-down pixel space.
    pub gravity: Vec2,
    pub gravity_enabled: bool,
    /// Substeps per `step` call.
    pub substeps: u32,
    /// Narrow phase and resolve passes per substep.
    pub solver_iterations: u32,
    /// Fraction of the approach speed kept after a bounce, in `[0, 1]`.
    pub restitution: f64,
    /// Penetration depth left uncorrected to avoid resting jitter.
    pub penetration_slop: f64,
    /// Upper bound on the elapsed time of one `step`, in milliseconds.
    pub max_step_millis: f64,
    pub narrow_phase: NarrowPhaseKind,
    pub broad_phase: BroadPhaseKind,
    /// Panic on internal narrow-phase errors instead of skipping the pair.
    pub strict: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            gravity: Vec2::new(0.0, 981.0),
            gravity_enabled: true,
            substeps: 5,
            solver_iterations: 1,
            restitution: 0.8,
            penetration_slop: 0.5,
            max_step_millis: 100.0,
            narrow_phase: NarrowPhaseKind::default(),
            broad_phase: BroadPhaseKind::default(),
            strict: cfg!(debug_assertions),
        }
    }
}

impl WorldConfig {
    /// Default config without gravity.
    pub fn zero_gravity() -> Self {
        WorldConfig { gravity_enabled: false, ..Default::default() }
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() {
            return Err(invalid(format!("gravity must be finite, got {:?}", self.gravity)));
        }
        if self.substeps == 0 {
            return Err(invalid("substeps must be at least 1".to_string()));
        }
        if self.solver_iterations == 0 {
            return Err(invalid("solver_iterations must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid(format!("restitution must be in [0, 1], got {}", self.restitution)));
        }
        if !(self.penetration_slop >= 0.0 && self.penetration_slop.is_finite()) {
            return Err(invalid(format!(
                "penetration_slop must be finite and non-negative, got {}",
                self.penetration_slop
            )));
        }
        if !(self.max_step_millis > 0.0 && self.max_step_millis.is_finite()) {
            return Err(invalid(format!(
                "max_step_millis must be finite and positive, got {}",
                self.max_step_millis
            )));
        }
        if let BroadPhaseKind::SpatialHash { cell_size } = self.broad_phase {
            if !(cell_size > 0.0 && cell_size.is_finite()) {
                return Err(invalid(format!("cell_size must be finite and positive, got {cell_size}")));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> PhysicsError {
    PhysicsError::InvalidConfig(message)
}
