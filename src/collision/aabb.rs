use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, sorting the corners so `min <= max` per axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB { min: min.min(max), max: min.max(max) }
    }

    /// Overlap test. Touching boxes count as overlapping so that touching
    /// shapes are never filtered out before the narrow phase.
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Copy of this AABB grown by `margin` on every side.
    pub fn inflated(&self, margin: f64) -> AABB {
        let m = Vec2::new(margin, margin);
        AABB { min: self.min - m, max: self.max + m }
    }

    /// Creates an AABB that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = AABB { min: *first, max: *first };
        for &point in rest {
            aabb.min = aabb.min.min(point);
            aabb.max = aabb.max.max(point);
        }
        Some(aabb)
    }
}
