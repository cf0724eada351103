use crate::math::vec2::Vec2;
use crate::objects::BodyHandle;

/// A world-space polygon edge, kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
}

/// Narrow-phase result for one overlapping shape pair (the MTV).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit normal pointing from the second shape toward the first.
    /// Moving the first shape by `normal * magnitude` separates the pair.
    pub normal: Vec2,
    /// Penetration depth, never negative.
    pub magnitude: f64,
    /// Edge whose normal produced the MTV (SAT polygon axes only).
    pub edge: Option<Edge>,
}

impl Penetration {
    /// Same penetration seen from the other shape.
    pub fn flipped(self) -> Self {
        Self { normal: -self.normal, ..self }
    }
}

/// A collision between two bodies in one substep.
///
/// Contacts are rebuilt every substep and never cached across steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body1: BodyHandle,
    pub body2: BodyHandle,
    /// Unit normal pointing from `body2` toward `body1`.
    pub normal: Vec2,
    pub magnitude: f64,
    pub edge: Option<Edge>,
}

impl Contact {
    pub fn new(body1: BodyHandle, body2: BodyHandle, penetration: Penetration) -> Self {
        Self {
            body1,
            body2,
            normal: penetration.normal,
            magnitude: penetration.magnitude,
            edge: penetration.edge,
        }
    }

    /// Minimum translation vector that moves `body1` out of `body2`.
    pub fn mtv(&self) -> Vec2 {
        self.normal * self.magnitude
    }

    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.body1 == handle || self.body2 == handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_contact_mtv_and_involves() {
        let mut keys: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        let (a, b, c) = (keys.insert(()), keys.insert(()), keys.insert(()));
        let penetration = Penetration { normal: Vec2::new(0.0, -1.0), magnitude: 2.5, edge: None };
        let contact = Contact::new(a, b, penetration);

        assert_eq!(contact.mtv(), Vec2::new(0.0, -2.5));
        assert!(contact.involves(a) && contact.involves(b));
        assert!(!contact.involves(c));
        assert_eq!(penetration.flipped().normal, Vec2::Y);
        assert_eq!(penetration.flipped().magnitude, 2.5);
    }
}
