//! Error types for the collision engine.
//!
//! Fallible operations return `PhysicsResult<T>`. Apart from shape and config
//! validation, every variant is a broken internal contract, not bad input.

use thiserror::Error;

use crate::objects::BodyHandle;
use crate::shapes::ShapeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// The body was already marked for deletion or purged.
    #[error("body {0:?} was already deleted")]
    AlreadyDeleted(BodyHandle),

    /// The selected narrow phase has no handler for this shape combination.
    #[error("narrow phase does not support {first:?} against {second:?}")]
    UnsupportedShapePair { first: ShapeKind, second: ShapeKind },

    /// A zero-length edge or direction showed up mid-algorithm.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// GJK simplex grew past a triangle.
    #[error("GJK simplex overflow: {0} points")]
    SimplexOverflow(usize),

    /// Shape rejected at construction time.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// World configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PhysicsError::UnsupportedShapePair {
            first: ShapeKind::Circle,
            second: ShapeKind::Polygon,
        };
        assert_eq!(err.to_string(), "narrow phase does not support Circle against Polygon");
        assert_eq!(
            PhysicsError::SimplexOverflow(4).to_string(),
            "GJK simplex overflow: 4 points"
        );
    }
}
