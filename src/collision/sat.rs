//! Separating Axis Theorem narrow phase.
//!
//! Every candidate axis (edge normals of each polygon, plus the closest-vertex
//! axis for circles) is projected onto; one gap proves separation, otherwise
//! the axis with the smallest overlap is the minimum translation vector.

use crate::collision::contact::{Edge, Penetration};
use crate::math::vec2::Vec2;
use crate::shapes::{WorldPolygon, WorldShape};

/// Below this length a direction is considered degenerate.
const DIRECTION_EPSILON: f64 = 1e-12;

/// Used when two circle centers coincide and no direction can be derived.
const FALLBACK_NORMAL: Vec2 = Vec2::Y;

/// Tests two world-space shapes for overlap.
///
/// Touching shapes (zero gap) count as colliding with zero magnitude.
/// The returned normal points from `b` toward `a`.
pub fn collide(a: &WorldShape, b: &WorldShape) -> Option<Penetration> {
    match (a, b) {
        (
            WorldShape::Circle { center: ca, radius: ra },
            WorldShape::Circle { center: cb, radius: rb },
        ) => circle_circle(*ca, *ra, *cb, *rb),
        (WorldShape::Polygon(pa), WorldShape::Polygon(pb)) => polygon_polygon(a, pa, b, pb),
        (WorldShape::Polygon(polygon), WorldShape::Circle { center, .. }) => {
            polygon_circle(a, polygon, b, *center)
        }
        (WorldShape::Circle { center, .. }, WorldShape::Polygon(polygon)) => {
            polygon_circle(b, polygon, a, *center).map(Penetration::flipped)
        }
    }
}

fn circle_circle(ca: Vec2, ra: f64, cb: Vec2, rb: f64) -> Option<Penetration> {
    let delta = ca - cb;
    let radii = ra + rb;
    if delta.magnitude_squared() > radii * radii {
        return None;
    }
    let distance = delta.magnitude();
    let normal = delta.try_normalize(DIRECTION_EPSILON).unwrap_or(FALLBACK_NORMAL);
    Some(Penetration { normal, magnitude: radii - distance, edge: None })
}

fn polygon_polygon(
    a: &WorldShape,
    pa: &WorldPolygon,
    b: &WorldShape,
    pb: &WorldPolygon,
) -> Option<Penetration> {
    // Every edge of both polygons is a candidate axis, the first one included.
    let axes = edge_axes(pa).chain(edge_axes(pb));
    min_overlap(a, b, axes)
}

fn polygon_circle(
    polygon_shape: &WorldShape,
    polygon: &WorldPolygon,
    circle_shape: &WorldShape,
    center: Vec2,
) -> Option<Penetration> {
    let closest_vertex = polygon
        .vertices
        .iter()
        .copied()
        .min_by(|p, q| p.distance_squared(center).total_cmp(&q.distance_squared(center)))?;
    // A circle centered exactly on a vertex has no vertex axis; the edge
    // normals alone still decide the overlap.
    let vertex_axis = (center - closest_vertex)
        .try_normalize(DIRECTION_EPSILON)
        .map(|axis| (axis, None));
    let axes = edge_axes(polygon).chain(vertex_axis);
    min_overlap(polygon_shape, circle_shape, axes)
}

fn edge_axes(polygon: &WorldPolygon) -> impl Iterator<Item = (Vec2, Option<Edge>)> + '_ {
    polygon.normals.iter().enumerate().map(move |(i, &normal)| {
        let (start, end) = polygon.edge(i);
        (normal, Some(Edge { start, end }))
    })
}

/// Core SAT loop over unit axes. Returns `None` on the first separating axis.
fn min_overlap(
    a: &WorldShape,
    b: &WorldShape,
    axes: impl Iterator<Item = (Vec2, Option<Edge>)>,
) -> Option<Penetration> {
    let mut best: Option<Penetration> = None;
    for (axis, edge) in axes {
        let (min_a, max_a) = a.project(axis);
        let (min_b, max_b) = b.project(axis);
        if max_a < min_b || max_b < min_a {
            return None;
        }

        // Pushing `a` along +axis clears it by `max_b - min_a`,
        // along -axis by `max_a - min_b`.
        let push_positive = max_b - min_a;
        let push_negative = max_a - min_b;
        let (normal, magnitude) = if push_positive <= push_negative {
            (axis, push_positive)
        } else {
            (-axis, push_negative)
        };

        if best.map_or(true, |p| magnitude < p.magnitude) {
            best = Some(Penetration { normal, magnitude, edge });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::shapes::{Polygon, Shape};
    const EPSILON: f64 = 1e-9;

    fn circle(x: f64, y: f64, r: f64) -> WorldShape {
        WorldShape::Circle { center: Vec2::new(x, y), radius: r }
    }

    fn rect(x: f64, y: f64, w: f64, h: f64, rotation: f64) -> WorldShape {
        Shape::from(Polygon::rectangle(w, h).unwrap())
            .to_world(&Transform::new(Vec2::new(x, y), rotation))
    }

    #[test]
    fn test_circle_circle_no_collision() {
        assert!(collide(&circle(0.0, 0.0, 1.0), &circle(3.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_circle_circle_touching_counts() {
        let p = collide(&circle(0.0, 0.0, 1.0), &circle(2.0, 0.0, 1.0)).unwrap();
        assert!(p.magnitude.abs() < EPSILON);
    }

    #[test]
    fn test_circle_circle_colliding() {
        let p = collide(&circle(0.0, 0.0, 1.0), &circle(1.5, 0.0, 1.0)).unwrap();
        assert!((p.magnitude - 0.5).abs() < EPSILON);
        // Points from b toward a
        assert!((p.normal.x - -1.0).abs() < EPSILON);
        assert!(p.normal.y.abs() < EPSILON);
        assert!(p.edge.is_none());
    }

    #[test]
    fn test_circle_circle_concentric_uses_fallback_normal() {
        let p = collide(&circle(5.0, 5.0, 1.0), &circle(5.0, 5.0, 2.0)).unwrap();
        assert_eq!(p.normal, FALLBACK_NORMAL);
        assert!((p.magnitude - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_polygon_overlap_along_x() {
        let a = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect(1.5, 0.2, 2.0, 2.0, 0.0);
        let p = collide(&a, &b).unwrap();
        assert!((p.magnitude - 0.5).abs() < EPSILON);
        assert!((p.normal.x - -1.0).abs() < EPSILON);
        assert!(p.edge.is_some());
    }

    #[test]
    fn test_polygon_polygon_separated() {
        let a = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect(2.5, 0.0, 2.0, 2.0, 0.0);
        assert!(collide(&a, &b).is_none());
    }

    #[test]
    fn test_polygon_polygon_separated_only_by_first_edge_of_a() {
        // Triangle whose first edge (bottom, normal (0,-1)) is the only axis
        // separating it from the box beneath. Dropping that axis would report
        // a false collision.
        let triangle = Shape::from(
            Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)]).unwrap(),
        )
        .to_world(&Transform::identity());
        let below = Shape::from(
            Polygon::new(vec![
                Vec2::new(0.5, -0.1),
                Vec2::new(1.0, -0.6),
                Vec2::new(1.5, -0.1),
                Vec2::new(1.0, -0.05),
            ])
            .unwrap(),
        )
        .to_world(&Transform::identity());
        assert!(collide(&triangle, &below).is_none());
    }

    #[test]
    fn test_polygon_polygon_rotated_diamond() {
        // Square rotated 45 degrees has corners at distance sqrt(2)
        let a = rect(0.0, 0.0, 2.0, 2.0, std::f64::consts::FRAC_PI_4);
        let b = rect(2.0, 0.0, 2.0, 2.0, 0.0);
        let p = collide(&a, &b).unwrap();
        let expected = 2f64.sqrt() - 1.0;
        assert!((p.magnitude - expected).abs() < 1e-6);
        assert!(p.normal.x < 0.0);
    }

    #[test]
    fn test_polygon_circle_edge_contact() {
        let square = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let ball = circle(1.5, 0.0, 1.0);
        let p = collide(&square, &ball).unwrap();
        assert!((p.magnitude - 0.5).abs() < EPSILON);
        assert!((p.normal.x - -1.0).abs() < EPSILON);

        // Argument order flips the normal, not the depth
        let q = collide(&ball, &square).unwrap();
        assert!((q.magnitude - 0.5).abs() < EPSILON);
        assert!((q.normal.x - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_circle_corner_uses_vertex_axis() {
        let square = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        // Near the (1,1) corner but outside along the diagonal
        let outside = circle(1.8, 1.8, 1.0);
        assert!(collide(&square, &outside).is_none());

        let inside = circle(1.6, 1.6, 1.0);
        let p = collide(&inside, &square).unwrap();
        let expected = 1.0 - (0.6f64 * 0.6 * 2.0).sqrt();
        assert!((p.magnitude - expected).abs() < 1e-6);
        assert!(p.normal.x > 0.0 && p.normal.y > 0.0);
    }

    #[test]
    fn test_polygon_circle_touching_edge() {
        let square = rect(0.0, 0.0, 2.0, 2.0, 0.0);
        let p = collide(&square, &circle(0.0, 2.0, 1.0)).unwrap();
        assert!(p.magnitude.abs() < EPSILON);
    }
}
