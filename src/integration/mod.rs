pub mod integrator;

pub use integrator::{integrate_position, reconstruct_velocity, wrap_angle};
