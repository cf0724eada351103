// Unbounded uniform hash grid for broad-phase pair generation.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::collision::broad_phase::BroadPhase;
use crate::collision::AABB;
use crate::math::vec2::Vec2;

/// Boxes covering more cells than this skip the grid and are paired with
/// every other box instead (huge ground planes, non-finite bounds).
const MAX_CELLS_PER_BOX: i64 = 1024;

/// Buckets boxes by the grid cells they cover. Two boxes become a candidate
/// pair when they share at least one cell and their boxes overlap.
#[derive(Debug)]
pub struct SpatialHash {
    cell_size: f64,
    inv_cell_size: f64, // 1.0 / cell_size, cached
    cells: HashMap<(i64, i64), Vec<usize>>,
    oversized: Vec<usize>,
}

impl SpatialHash {
    /// `cell_size` must be positive and finite; `WorldConfig::validate`
    /// rejects anything else before a world builds one.
    pub fn new(cell_size: f64) -> Self {
        SpatialHash {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    /// Converts world coordinates to cell indices (col, row).
    #[inline]
    fn get_cell_indices(&self, point: Vec2) -> (i64, i64) {
        let col = (point.x * self.inv_cell_size).floor() as i64;
        let row = (point.y * self.inv_cell_size).floor() as i64;
        (col, row)
    }

    /// Inclusive range of cells covered by `aabb`, or `None` when it is too
    /// large (or not finite) to bucket.
    fn get_cell_range(&self, aabb: &AABB) -> Option<((i64, i64), (i64, i64))> {
        if !aabb.min.is_finite() || !aabb.max.is_finite() {
            return None;
        }
        let (min_col, min_row) = self.get_cell_indices(aabb.min);
        let (max_col, max_row) = self.get_cell_indices(aabb.max);
        let cols = max_col.saturating_sub(min_col).saturating_add(1);
        let rows = max_row.saturating_sub(min_row).saturating_add(1);
        let covered = cols.saturating_mul(rows);
        (covered <= MAX_CELLS_PER_BOX).then_some(((min_col, min_row), (max_col, max_row)))
    }

    pub fn clear(&mut self) {
        // Keep the per-cell allocations, drop emptied cells lazily
        self.cells.retain(|_, bucket| {
            let keep = !bucket.is_empty();
            bucket.clear();
            keep
        });
        self.oversized.clear();
    }

    /// Adds box `index` to every cell it covers.
    pub fn insert(&mut self, index: usize, aabb: &AABB) {
        let Some(((min_col, min_row), (max_col, max_row))) = self.get_cell_range(aabb) else {
            self.oversized.push(index);
            return;
        };
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                self.cells.entry((col, row)).or_default().push(index);
            }
        }
    }

    /// Pairs sharing a cell, plus every pairing with an oversized box.
    /// Sorted, without duplicates.
    pub fn query_potential_pairs(&self, aabbs: &[AABB]) -> Vec<(usize, usize)> {
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for bucket in self.cells.values() {
            for (k, &a) in bucket.iter().enumerate() {
                for &b in &bucket[k + 1..] {
                    seen.insert((a.min(b), a.max(b)));
                }
            }
        }
        for &big in &self.oversized {
            for other in (0..aabbs.len()).filter(|&other| other != big) {
                seen.insert((big.min(other), big.max(other)));
            }
        }

        let mut pairs: Vec<(usize, usize)> =
            seen.into_iter().filter(|&(i, j)| aabbs[i].overlaps(&aabbs[j])).collect();
        pairs.sort_unstable();
        pairs
    }
}

impl BroadPhase for SpatialHash {
    fn name(&self) -> &'static str {
        "spatial-hash"
    }

    fn pairs(&mut self, aabbs: &[AABB]) -> Vec<(usize, usize)> {
        self.clear();
        for (index, aabb) in aabbs.iter().enumerate() {
            self.insert(index, aabb);
        }
        if !self.oversized.is_empty() {
            warn!(
                "{} bounding boxes exceed {MAX_CELLS_PER_BOX} cells of size {}",
                self.oversized.len(),
                self.cell_size
            );
        }
        self.query_potential_pairs(aabbs)
    }
}
