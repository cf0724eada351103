use super::vec2::Vec2;

/// A rigid 2D transform: rotation about the local origin, then translation.
///
/// Bodies do not store one; it is derived from the body's position and
/// rotation whenever a world-space shape is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64,
    cos: f64,
    sin: f64,
}

impl Transform {
    pub fn new(position: Vec2, rotation: f64) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Self { position, rotation, cos, sin }
    }

    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    /// Rotates a local-space direction into world space (no translation).
    pub fn rotate(&self, direction: Vec2) -> Vec2 {
        Vec2::new(
            direction.x * self.cos - direction.y * self.sin,
            direction.x * self.sin + direction.y * self.cos,
        )
    }

    /// Maps a local-space point into world space.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.rotate(point) + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_transform_identity() {
        let t = Transform::identity();
        let p = Vec2::new(5.0, -3.0);
        assert_eq!(t.apply(p), p);
    }

    #[test]
    fn test_transform_apply_translation() {
        let t = Transform::new(Vec2::new(10.0, 5.0), 0.0);
        let tp = t.apply(Vec2::new(1.0, 2.0));
        assert!((tp.x - 11.0).abs() < EPSILON);
        assert!((tp.y - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_transform_apply_combined() {
        // (1,0) rotates to (0,1), then translates to (10,6)
        let t = Transform::new(Vec2::new(10.0, 5.0), PI / 2.0);
        let tp = t.apply(Vec2::new(1.0, 0.0));
        assert!((tp.x - 10.0).abs() < EPSILON);
        assert!((tp.y - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_transform_rotate_ignores_translation() {
        let t = Transform::new(Vec2::new(100.0, 100.0), PI);
        let d = t.rotate(Vec2::new(1.0, 0.0));
        assert!((d.x - -1.0).abs() < EPSILON);
        assert!(d.y.abs() < EPSILON);
    }
}
