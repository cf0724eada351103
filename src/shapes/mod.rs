pub mod circle;
pub mod polygon;

pub use circle::Circle;
pub use polygon::Polygon;

use crate::collision::AABB;
use crate::math::{Transform, Vec2};

/// Geometric shape of a body, in the body's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

/// Discriminant of [`Shape`], used to report shape-pair dispatch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Polygon,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Distance from the local origin to the farthest point of the shape.
    /// Bounds the shape under any rotation about the origin.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Shape::Circle(circle) => circle.radius,
            Shape::Polygon(polygon) => {
                polygon.vertices().iter().map(|v| v.magnitude()).fold(0.0, f64::max)
            }
        }
    }

    /// Places the shape in world space. The local origin maps to
    /// `transform.position`.
    pub fn to_world(&self, transform: &Transform) -> WorldShape {
        match self {
            Shape::Circle(circle) => WorldShape::Circle {
                center: transform.position,
                radius: circle.radius,
            },
            Shape::Polygon(polygon) => WorldShape::Polygon(WorldPolygon {
                vertices: polygon.vertices().iter().map(|&v| transform.apply(v)).collect(),
                normals: polygon.edge_normals().iter().map(|&n| transform.rotate(n)).collect(),
                centroid: transform.apply(polygon.centroid()),
            }),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

/// A convex polygon already transformed into world space.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPolygon {
    /// Counter-clockwise world-space vertices.
    pub vertices: Vec<Vec2>,
    /// Outward unit normal of edge `i -> i+1`.
    pub normals: Vec<Vec2>,
    pub centroid: Vec2,
}

impl WorldPolygon {
    /// Edge `i` as its two endpoints.
    pub fn edge(&self, i: usize) -> (Vec2, Vec2) {
        (self.vertices[i], self.vertices[(i + 1) % self.vertices.len()])
    }

    pub fn project(&self, axis: Vec2) -> (f64, f64) {
        self.vertices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            let p = v.dot(axis);
            (min.min(p), max.max(p))
        })
    }
}

/// Shape snapshot in world space, derived from a body's position and rotation.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f64 },
    Polygon(WorldPolygon),
}

impl WorldShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            WorldShape::Circle { .. } => ShapeKind::Circle,
            WorldShape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Circle center or polygon centroid.
    pub fn center(&self) -> Vec2 {
        match self {
            WorldShape::Circle { center, .. } => *center,
            WorldShape::Polygon(polygon) => polygon.centroid,
        }
    }

    pub fn aabb(&self) -> AABB {
        match self {
            WorldShape::Circle { center, radius } => {
                let r = Vec2::new(*radius, *radius);
                AABB::new(*center - r, *center + r)
            }
            WorldShape::Polygon(polygon) => {
                // Polygons always carry at least 3 vertices
                AABB::from_points(&polygon.vertices).unwrap_or(AABB::new(polygon.centroid, polygon.centroid))
            }
        }
    }

    /// Interval covered by the shape when projected onto a unit `axis`.
    pub fn project(&self, axis: Vec2) -> (f64, f64) {
        match self {
            WorldShape::Circle { center, radius } => {
                let c = center.dot(axis);
                (c - radius, c + radius)
            }
            WorldShape::Polygon(polygon) => polygon.project(axis),
        }
    }

    /// Farthest point of the shape along a unit `direction`.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        match self {
            WorldShape::Circle { center, radius } => *center + direction * *radius,
            WorldShape::Polygon(polygon) => {
                let mut best = polygon.vertices[0];
                let mut best_dot = best.dot(direction);
                for &v in &polygon.vertices[1..] {
                    let d = v.dot(direction);
                    if d > best_dot {
                        best = v;
                        best_dot = d;
                    }
                }
                best
            }
        }
    }
}
