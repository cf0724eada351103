use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::Vec2;

const MIN_AREA: f64 = 1e-9;
const MIN_EDGE_LENGTH: f64 = 1e-9;

/// A convex polygon defined by its vertices in local space.
///
/// Vertices are stored counter-clockwise. Edge normals and the centroid are
/// computed once at construction since the local geometry never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
    centroid: Vec2,
}

impl Polygon {
    /// Creates a polygon from an ordered vertex loop.
    ///
    /// Clockwise input is reversed to counter-clockwise. Fails for fewer than
    /// 3 vertices, non-finite coordinates, zero-length edges, zero area or
    /// a non-convex (including self-intersecting) outline.
    pub fn new(mut vertices: Vec<Vec2>) -> PhysicsResult<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidShape("polygon vertex is not finite".into()));
        }

        let signed_area = signed_area(&vertices);
        if signed_area.abs() < MIN_AREA {
            return Err(PhysicsError::InvalidShape("polygon has zero area".into()));
        }
        if signed_area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        let mut turning = 0.0;
        for i in 0..n {
            let prev = vertices[(i + n - 1) % n];
            let curr = vertices[i];
            let next = vertices[(i + 1) % n];
            let e1 = curr - prev;
            let e2 = next - curr;
            if e2.magnitude() < MIN_EDGE_LENGTH {
                return Err(PhysicsError::InvalidShape(format!("polygon edge {i} has zero length")));
            }
            let cross = e1.cross(e2);
            if cross < -MIN_AREA {
                return Err(PhysicsError::InvalidShape(format!("polygon is not convex at vertex {i}")));
            }
            turning += cross.atan2(e1.dot(e2));
        }
        // A convex loop turns exactly once; a pentagram turns twice.
        if (turning - std::f64::consts::TAU).abs() > 1e-6 {
            return Err(PhysicsError::InvalidShape("polygon outline self-intersects".into()));
        }

        let normals = (0..n)
            .map(|i| {
                let edge = vertices[(i + 1) % n] - vertices[i];
                Vec2::new(edge.y, -edge.x).normalize()
            })
            .collect();
        let centroid = centroid(&vertices, signed_area.abs());

        Ok(Polygon { vertices, normals, centroid })
    }

    /// Axis-aligned rectangle centered on the local origin.
    pub fn rectangle(width: f64, height: f64) -> PhysicsResult<Self> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`.
    pub fn regular(sides: usize, radius: f64) -> PhysicsResult<Self> {
        let step = std::f64::consts::TAU / sides as f64;
        Self::new(
            (0..sides)
                .map(|i| Vec2::new(radius, 0.0).rotate(step * i as f64))
                .collect(),
        )
    }

    /// Vertices in local space, counter-clockwise.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Outward unit normal of edge `i -> i+1`, in local space.
    pub fn edge_normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Center of area in local space.
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Area via the shoelace formula.
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }
}

fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n).map(|i| vertices[i].cross(vertices[(i + 1) % n])).sum();
    twice / 2.0
}

/// Area-weighted centroid of a fan of triangles rooted at the first vertex.
fn centroid(vertices: &[Vec2], area: f64) -> Vec2 {
    let origin = vertices[0];
    let mut weighted = Vec2::ZERO;
    for i in 1..(vertices.len() - 1) {
        let v2 = vertices[i];
        let v3 = vertices[i + 1];
        let tri_area = (v2 - origin).cross(v3 - origin) / 2.0;
        weighted += (origin + v2 + v3) / 3.0 * tri_area;
    }
    weighted / area
}
