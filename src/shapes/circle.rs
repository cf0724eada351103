use crate::error::{PhysicsError, PhysicsResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    /// Creates a circle centered on the body's position.
    ///
    /// The radius must be finite and strictly positive.
    pub fn new(radius: f64) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidShape(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        Ok(Self { radius })
    }
}
