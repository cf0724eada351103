//! Interchangeable narrow-phase strategies.
//!
//! A world picks one strategy at construction and uses it for every pair.

use serde::{Deserialize, Serialize};

use crate::collision::contact::Penetration;
use crate::collision::{gjk, sat};
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::Vec2;
use crate::shapes::WorldShape;

/// Exact overlap test for a candidate pair.
pub trait NarrowPhase {
    fn name(&self) -> &'static str;

    /// Returns the minimum translation vector when `a` and `b` overlap.
    /// The normal points from `b` toward `a`.
    fn collide(&self, a: &WorldShape, b: &WorldShape) -> PhysicsResult<Option<Penetration>>;
}

/// Separating Axis Theorem.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sat;

impl NarrowPhase for Sat {
    fn name(&self) -> &'static str {
        "sat"
    }

    fn collide(&self, a: &WorldShape, b: &WorldShape) -> PhysicsResult<Option<Penetration>> {
        Ok(sat::collide(a, b))
    }
}

/// GJK distance test, expanded with EPA when the shapes overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct GjkEpa;

impl NarrowPhase for GjkEpa {
    fn name(&self) -> &'static str {
        "gjk-epa"
    }

    fn collide(&self, a: &WorldShape, b: &WorldShape) -> PhysicsResult<Option<Penetration>> {
        gjk::collide(a, b)
    }
}

/// Treats polygons as their world-space bounding boxes.
///
/// Exact only for unrotated rectangles. Circles are not handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveBox;

impl NarrowPhase for NaiveBox {
    fn name(&self) -> &'static str {
        "naive-box"
    }

    fn collide(&self, a: &WorldShape, b: &WorldShape) -> PhysicsResult<Option<Penetration>> {
        let (WorldShape::Polygon(_), WorldShape::Polygon(_)) = (a, b) else {
            return Err(PhysicsError::UnsupportedShapePair { first: a.kind(), second: b.kind() });
        };
        let (box_a, box_b) = (a.aabb(), b.aabb());
        if !box_a.overlaps(&box_b) {
            return Ok(None);
        }

        let candidates = [
            (Vec2::X, box_b.max.x - box_a.min.x),
            (Vec2::new(-1.0, 0.0), box_a.max.x - box_b.min.x),
            (Vec2::Y, box_b.max.y - box_a.min.y),
            (Vec2::new(0.0, -1.0), box_a.max.y - box_b.min.y),
        ];
        let (normal, magnitude) = candidates
            .into_iter()
            .fold((Vec2::X, f64::INFINITY), |best, c| if c.1 < best.1 { c } else { best });
        Ok(Some(Penetration { normal, magnitude, edge: None }))
    }
}

/// Serializable selector for the narrow-phase strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrowPhaseKind {
    #[default]
    Sat,
    GjkEpa,
    NaiveBox,
}

impl NarrowPhaseKind {
    pub fn build(self) -> Box<dyn NarrowPhase> {
        match self {
            NarrowPhaseKind::Sat => Box::new(Sat),
            NarrowPhaseKind::GjkEpa => Box::new(GjkEpa),
            NarrowPhaseKind::NaiveBox => Box::new(NaiveBox),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::shapes::{Circle, Polygon, Shape, ShapeKind};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f64 = 1e-6;

    fn random_shape(rng: &mut StdRng) -> WorldShape {
        let position = Vec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
        let rotation = rng.gen_range(0.0..std::f64::consts::TAU);
        let shape: Shape = match rng.gen_range(0..3) {
            0 => Circle::new(rng.gen_range(5.0..30.0)).unwrap().into(),
            1 => Polygon::rectangle(rng.gen_range(5.0..40.0), rng.gen_range(5.0..40.0))
                .unwrap()
                .into(),
            _ => Polygon::regular(rng.gen_range(3..9), rng.gen_range(5.0..30.0)).unwrap().into(),
        };
        shape.to_world(&Transform::new(position, rotation))
    }

    #[test]
    fn test_sat_and_gjk_agree_on_random_pairs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut colliding = 0;
        for i in 0..1000 {
            let a = random_shape(&mut rng);
            let b = random_shape(&mut rng);
            let by_sat = Sat.collide(&a, &b).unwrap();
            let by_gjk = GjkEpa.collide(&a, &b).unwrap();
            assert_eq!(by_sat.is_some(), by_gjk.is_some(), "pair {i} disagrees: {a:?} vs {b:?}");

            if let (Some(s), Some(g)) = (by_sat, by_gjk) {
                colliding += 1;
                assert!((g.normal.magnitude() - 1.0).abs() < EPSILON);
                if a.kind() == ShapeKind::Polygon && b.kind() == ShapeKind::Polygon {
                    assert!((s.magnitude - g.magnitude).abs() < 1e-3, "pair {i}: {s:?} vs {g:?}");
                }
            }
        }
        // The scene is dense enough that both outcomes are exercised
        assert!(colliding > 100 && colliding < 900, "colliding = {colliding}");
    }

    #[test]
    fn test_circle_property_against_distance() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let ca = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            let cb = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            let (ra, rb) = (rng.gen_range(1.0..30.0), rng.gen_range(1.0..30.0));
            let a = WorldShape::Circle { center: ca, radius: ra };
            let b = WorldShape::Circle { center: cb, radius: rb };
            let distance = ca.distance(cb);

            let result = Sat.collide(&a, &b).unwrap();
            assert_eq!(result.is_some(), distance <= ra + rb);
            if let Some(p) = result {
                assert!((p.magnitude - (ra + rb - distance)).abs() < EPSILON);
                assert!((p.normal.magnitude() - 1.0).abs() < EPSILON);
                assert!(p.normal.dot(ca - cb) >= 0.0);
            }
        }
    }

    #[test]
    fn test_naive_box_rejects_circles() {
        let circle = WorldShape::Circle { center: Vec2::ZERO, radius: 1.0 };
        let square = Shape::from(Polygon::rectangle(2.0, 2.0).unwrap()).to_world(&Transform::identity());
        let err = NaiveBox.collide(&circle, &square).unwrap_err();
        assert_eq!(
            err,
            PhysicsError::UnsupportedShapePair { first: ShapeKind::Circle, second: ShapeKind::Polygon }
        );
    }

    #[test]
    fn test_naive_box_axis_aligned_overlap() {
        let a = Shape::from(Polygon::rectangle(2.0, 2.0).unwrap()).to_world(&Transform::identity());
        let b = Shape::from(Polygon::rectangle(2.0, 2.0).unwrap())
            .to_world(&Transform::new(Vec2::new(0.5, 1.5), 0.0));
        let p = NaiveBox.collide(&a, &b).unwrap().unwrap();
        assert!((p.magnitude - 0.5).abs() < EPSILON);
        assert_eq!(p.normal, Vec2::new(0.0, -1.0));

        let far = Shape::from(Polygon::rectangle(2.0, 2.0).unwrap())
            .to_world(&Transform::new(Vec2::new(5.0, 0.0), 0.0));
        assert!(NaiveBox.collide(&a, &far).unwrap().is_none());
    }

    #[test]
    fn test_kind_builds_matching_strategy() {
        assert_eq!(NarrowPhaseKind::Sat.build().name(), "sat");
        assert_eq!(NarrowPhaseKind::GjkEpa.build().name(), "gjk-epa");
        assert_eq!(NarrowPhaseKind::NaiveBox.build().name(), "naive-box");
        assert_eq!(NarrowPhaseKind::default(), NarrowPhaseKind::Sat);
    }
}
