use crate::core::BodyHandle;

/// Unordered pair of bodies, used as a key for contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// The smaller handle of the pair
    pub body_a: BodyHandle,

    /// The larger handle of the pair
    pub body_b: BodyHandle,
}

impl CollisionPair {
    /// Creates a new collision pair
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        // Always sort the handles to ensure consistent ordering
        if body_a <= body_b {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }

    /// Checks if this collision pair contains the specified body
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Returns the other body in the pair
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_order_independent() {
        let a = BodyHandle::new(1, 0);
        let b = BodyHandle::new(4, 2);
        assert_eq!(CollisionPair::new(a, b), CollisionPair::new(b, a));
        let pair = CollisionPair::new(b, a);
        assert_eq!(pair.body_a, a);
        assert_eq!(pair.other(a), Some(b));
        assert_eq!(pair.other(BodyHandle::new(9, 0)), None);
        assert!(pair.contains(b));
    }
}
