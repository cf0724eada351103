//! Candidate pair generation.
//!
//! Every strategy takes one AABB per body (indexed like the world's body
//! order) and returns index pairs `(i, j)` with `i < j`, sorted ascending.
//! Pruning strategies may report false positives but never drop a pair
//! whose boxes overlap.

use serde::{Deserialize, Serialize};

use crate::collision::spatial_hash::SpatialHash;
use crate::collision::AABB;

pub trait BroadPhase {
    fn name(&self) -> &'static str;

    fn pairs(&mut self, aabbs: &[AABB]) -> Vec<(usize, usize)>;
}

/// Every pair is a candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPairs;

impl BroadPhase for AllPairs {
    fn name(&self) -> &'static str {
        "all-pairs"
    }

    fn pairs(&mut self, aabbs: &[AABB]) -> Vec<(usize, usize)> {
        let n = aabbs.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        pairs
    }
}

/// Sorts boxes on their minimum x and sweeps along the axis.
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    // Reused between calls to avoid reallocating every step
    order: Vec<usize>,
}

impl BroadPhase for SweepAndPrune {
    fn name(&self) -> &'static str {
        "sweep-and-prune"
    }

    fn pairs(&mut self, aabbs: &[AABB]) -> Vec<(usize, usize)> {
        self.order.clear();
        self.order.extend(0..aabbs.len());
        self.order.sort_by(|&a, &b| aabbs[a].min.x.total_cmp(&aabbs[b].min.x).then(a.cmp(&b)));

        let mut pairs = Vec::new();
        for (k, &i) in self.order.iter().enumerate() {
            for &j in &self.order[k + 1..] {
                if aabbs[j].min.x > aabbs[i].max.x {
                    break;
                }
                if aabbs[i].overlaps(&aabbs[j]) {
                    pairs.push((i.min(j), i.max(j)));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

/// Serializable selector for the broad-phase strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseKind {
    #[default]
    AllPairs,
    SweepAndPrune,
    SpatialHash { cell_size: f64 },
}

impl BroadPhaseKind {
    pub fn build(self) -> Box<dyn BroadPhase> {
        match self {
            BroadPhaseKind::AllPairs => Box::new(AllPairs),
            BroadPhaseKind::SweepAndPrune => Box::new(SweepAndPrune::default()),
            BroadPhaseKind::SpatialHash { cell_size } => Box::new(SpatialHash::new(cell_size)),
        }
    }
}
