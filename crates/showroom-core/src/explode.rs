//! Exploded view: pushes meshes away from the scene origin.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::geometry::Point3;
use crate::view::clamp_explode;

/// Original positions captured at load time plus the current explode amount
#[derive(Debug, Clone)]
pub struct ExplodeRig<N> {
    originals: HashMap<N, Point3>,
    amount: f32,
    dirty: HashSet<N>,
}

impl<N: Copy + Eq + Hash> ExplodeRig<N> {
    /// Capture reference positions. They are never rewritten afterwards.
    pub fn capture(nodes: impl IntoIterator<Item = (N, Point3)>) -> Self {
        Self {
            originals: nodes.into_iter().collect(),
            amount: 0.0,
            dirty: HashSet::new(),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn original(&self, node: N) -> Option<Point3> {
        self.originals.get(&node).copied()
    }

    /// Set the explode amount, clamped to the slider range
    pub fn set_amount(&mut self, amount: f32) {
        let amount = clamp_explode(amount);
        if amount == self.amount {
            return;
        }
        self.amount = amount;
        self.dirty.extend(self.originals.keys().copied());
    }

    /// Displaced position for a node at the current amount
    pub fn position(&self, node: N) -> Option<Point3> {
        self.originals
            .get(&node)
            .map(|original| displaced(*original, self.amount))
    }

    /// Positions changed since the last call
    pub fn take_dirty(&mut self) -> Vec<(N, Point3)> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .filter_map(|node| self.position(node).map(|p| (node, p)))
            .collect()
    }
}

/// `original + normalize(original) * amount`; zero amount is the identity.
/// Nodes sitting on the origin have no direction and stay put.
pub fn displaced(original: Point3, amount: f32) -> Point3 {
    if amount == 0.0 {
        return original;
    }
    original.add(original.normalize_or_zero().scale(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> ExplodeRig<u32> {
        ExplodeRig::capture([
            (0, Point3::new(1.0, 0.0, 0.0)),
            (1, Point3::new(0.3, 0.7, -1.2)),
            (2, Point3::ZERO),
        ])
    }

    #[test]
    fn test_round_trip_restores_originals() {
        let mut rig = rig();
        rig.set_amount(1.7);
        rig.set_amount(2.3);
        rig.set_amount(0.0);

        for node in [0, 1, 2] {
            let restored = rig.position(node).unwrap();
            assert!(restored.approx_eq(rig.original(node).unwrap()));
        }
    }

    #[test]
    fn test_displacement_along_direction() {
        let mut rig = rig();
        rig.set_amount(2.0);
        assert!(rig.position(0).unwrap().approx_eq(Point3::new(3.0, 0.0, 0.0)));
        // Origin node has no direction
        assert_eq!(rig.position(2), Some(Point3::ZERO));
    }

    #[test]
    fn test_repeated_amounts_do_not_drift() {
        let mut rig = rig();
        for _ in 0..10 {
            rig.set_amount(1.0);
            rig.set_amount(0.5);
        }
        rig.set_amount(1.0);
        let expected = displaced(Point3::new(0.3, 0.7, -1.2), 1.0);
        assert!(rig.position(1).unwrap().approx_eq(expected));
    }

    #[test]
    fn test_amount_is_clamped_and_dirty_tracked() {
        let mut rig = rig();
        rig.set_amount(99.0);
        assert_eq!(rig.amount(), 3.0);
        assert_eq!(rig.take_dirty().len(), 3);

        rig.set_amount(3.0);
        assert!(rig.take_dirty().is_empty());
    }
}
