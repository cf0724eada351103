//! GJK overlap test with EPA penetration recovery.
//!
//! Both algorithms only talk to the shapes through support functions, so any
//! convex [`WorldShape`] pair works without per-pair code. All search
//! directions are normalized before use and both loops are iteration-bounded.

use log::warn;

use crate::collision::contact::Penetration;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::Vec2;
use crate::shapes::WorldShape;

const MAX_GJK_ITERATIONS: usize = 64;
const MAX_EPA_ITERATIONS: usize = 64;

/// EPA stops once a new support point lies this close to the closest edge.
pub const EPA_TOLERANCE: f64 = 1e-4;

/// Below this length a direction is considered degenerate.
const DIRECTION_EPSILON: f64 = 1e-12;
/// Twice-area below which three polytope points are treated as collinear.
const AREA_EPSILON: f64 = 1e-12;

const SEED_DIRECTIONS: [Vec2; 8] = [
    Vec2::X,
    Vec2::Y,
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    Vec2::new(-std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    Vec2::new(-std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
    Vec2::new(std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
];

/// Point of the Minkowski difference `a - b` farthest along a unit `direction`.
fn support(a: &WorldShape, b: &WorldShape, direction: Vec2) -> Vec2 {
    a.support(direction) - b.support(-direction)
}

/// Up to three Minkowski-difference points, newest last.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Simplex {
    points: [Vec2; 3],
    len: usize,
}

impl Simplex {
    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.len]
    }

    fn push(&mut self, point: Vec2) -> PhysicsResult<()> {
        if self.len == self.points.len() {
            return Err(PhysicsError::SimplexOverflow(self.len + 1));
        }
        self.points[self.len] = point;
        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, index: usize) {
        for i in index..self.len - 1 {
            self.points[i] = self.points[i + 1];
        }
        self.len -= 1;
    }
}

enum SimplexStep {
    ContainsOrigin,
    Search(Vec2),
}

/// Runs GJK and returns the terminal simplex when the shapes overlap.
///
/// Touching shapes (origin on the simplex boundary) count as overlapping.
pub fn gjk(a: &WorldShape, b: &WorldShape) -> PhysicsResult<Option<Simplex>> {
    gjk_bounded(a, b, MAX_GJK_ITERATIONS)
}

fn gjk_bounded(
    a: &WorldShape,
    b: &WorldShape,
    max_iterations: usize,
) -> PhysicsResult<Option<Simplex>> {
    let mut direction = (a.center() - b.center())
        .try_normalize(DIRECTION_EPSILON)
        .unwrap_or(Vec2::X);
    let mut simplex = Simplex::default();
    let first = support(a, b, direction);
    simplex.push(first)?;
    direction = -first;

    for _ in 0..max_iterations {
        let Some(d) = direction.try_normalize(DIRECTION_EPSILON) else {
            // Origin sits on the current simplex
            return Ok(Some(simplex));
        };
        let point = support(a, b, d);
        if point.dot(d) <= 0.0 {
            return Ok(None);
        }
        simplex.push(point)?;
        match evolve(&mut simplex)? {
            SimplexStep::ContainsOrigin => return Ok(Some(simplex)),
            SimplexStep::Search(next) => direction = next,
        }
    }

    warn!("GJK hit {max_iterations} iterations without converging; reporting no overlap");
    Ok(None)
}

/// Shrinks the simplex to the feature closest to the origin and picks the
/// next search direction.
fn evolve(simplex: &mut Simplex) -> PhysicsResult<SimplexStep> {
    let current = *simplex;
    match *current.points() {
        [b, a] => {
            let ab = b - a;
            let ao = -a;
            if ab.magnitude_squared() < DIRECTION_EPSILON {
                return Err(PhysicsError::DegenerateGeometry("GJK line simplex has zero length"));
            }
            let mut perp = ab.perpendicular();
            if perp.dot(ao) < 0.0 {
                perp = -perp;
            }
            if perp.dot(ao).abs() < DIRECTION_EPSILON {
                // Origin on the segment: a lies past it, b before it
                return Ok(SimplexStep::ContainsOrigin);
            }
            Ok(SimplexStep::Search(perp))
        }
        [c, b, a] => {
            let ab = b - a;
            let ac = c - a;
            let ao = -a;

            let mut ab_perp = ab.perpendicular();
            if ab_perp.dot(ac) > 0.0 {
                ab_perp = -ab_perp;
            }
            let mut ac_perp = ac.perpendicular();
            if ac_perp.dot(ab) > 0.0 {
                ac_perp = -ac_perp;
            }

            if ab_perp.dot(ao) > 0.0 {
                simplex.remove(0); // drop c
                Ok(SimplexStep::Search(ab_perp))
            } else if ac_perp.dot(ao) > 0.0 {
                simplex.remove(1); // drop b
                Ok(SimplexStep::Search(ac_perp))
            } else {
                Ok(SimplexStep::ContainsOrigin)
            }
        }
        _ => Err(PhysicsError::SimplexOverflow(simplex.len)),
    }
}

struct ClosestEdge {
    /// Index of the edge's end vertex; a new point is inserted here.
    insert_at: usize,
    normal: Vec2,
    distance: f64,
}

/// Expands the GJK simplex into the penetration polygon's closest edge.
///
/// The result's normal points from `b` toward `a`.
pub fn epa(a: &WorldShape, b: &WorldShape, simplex: &Simplex) -> PhysicsResult<Penetration> {
    epa_bounded(a, b, simplex, MAX_EPA_ITERATIONS)
}

fn epa_bounded(
    a: &WorldShape,
    b: &WorldShape,
    simplex: &Simplex,
    max_iterations: usize,
) -> PhysicsResult<Penetration> {
    let mut polytope = seed_polytope(a, b, simplex)?;

    for _ in 0..max_iterations {
        let edge = closest_edge(&polytope)?;
        let point = support(a, b, edge.normal);
        if point.dot(edge.normal) - edge.distance < EPA_TOLERANCE {
            return Ok(to_penetration(&edge));
        }
        polytope.insert(edge.insert_at, point);
    }

    warn!("EPA hit {max_iterations} iterations; using the closest edge found so far");
    closest_edge(&polytope).map(|edge| to_penetration(&edge))
}

fn to_penetration(edge: &ClosestEdge) -> Penetration {
    // The edge normal points out of a - b; separating a means moving it
    // against that normal.
    Penetration { normal: -edge.normal, magnitude: edge.distance.max(0.0), edge: None }
}

/// Turns the terminal simplex into a counter-clockwise triangle with
/// non-zero area, adding support points when GJK stopped early on contact.
fn seed_polytope(a: &WorldShape, b: &WorldShape, simplex: &Simplex) -> PhysicsResult<Vec<Vec2>> {
    let mut polytope: Vec<Vec2> = Vec::with_capacity(MAX_EPA_ITERATIONS + 3);
    for &point in simplex.points() {
        try_add_seed_point(&mut polytope, point);
    }

    let mut directions: Vec<Vec2> = Vec::with_capacity(SEED_DIRECTIONS.len() + 2);
    if let [p0, p1] = polytope[..] {
        let normal = (p1 - p0).perpendicular().normalize();
        directions.extend([normal, -normal]);
    }
    directions.extend(SEED_DIRECTIONS);

    for direction in directions {
        if polytope.len() == 3 {
            break;
        }
        try_add_seed_point(&mut polytope, support(a, b, direction));
    }

    if polytope.len() < 3 {
        return Err(PhysicsError::DegenerateGeometry("EPA could not build an initial polytope"));
    }
    if (polytope[1] - polytope[0]).cross(polytope[2] - polytope[0]) < 0.0 {
        polytope.swap(1, 2);
    }
    Ok(polytope)
}

fn try_add_seed_point(polytope: &mut Vec<Vec2>, point: Vec2) {
    if polytope.len() >= 3 || polytope.iter().any(|&p| p.distance_squared(point) < AREA_EPSILON) {
        return;
    }
    if let [p0, p1] = polytope[..] {
        if (p1 - p0).cross(point - p0).abs() < AREA_EPSILON {
            return;
        }
    }
    polytope.push(point);
}

fn closest_edge(polytope: &[Vec2]) -> PhysicsResult<ClosestEdge> {
    let n = polytope.len();
    let mut best: Option<ClosestEdge> = None;
    for i in 0..n {
        let j = (i + 1) % n;
        let edge = polytope[j] - polytope[i];
        // Right-hand perpendicular is outward for a counter-clockwise loop
        let Some(normal) = Vec2::new(edge.y, -edge.x).try_normalize(DIRECTION_EPSILON) else {
            continue;
        };
        let distance = normal.dot(polytope[i]);
        if best.as_ref().map_or(true, |e| distance < e.distance) {
            best = Some(ClosestEdge { insert_at: i + 1, normal, distance });
        }
    }
    best.ok_or(PhysicsError::DegenerateGeometry("EPA polytope has no usable edge"))
}

/// Full GJK + EPA query. The returned normal points from `b` toward `a`.
pub fn collide(a: &WorldShape, b: &WorldShape) -> PhysicsResult<Option<Penetration>> {
    match gjk(a, b)? {
        Some(simplex) => epa(a, b, &simplex).map(Some),
        None => Ok(None),
    }
}
