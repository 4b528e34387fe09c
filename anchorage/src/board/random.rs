// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Random placement of the vessels that are still pending.
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    board::{Board, Coordinate, Footprint},
    vessels::VesselId,
};

/// Anchorages up to this many cells are searched exhaustively.
const EXHAUSTIVE_LIMIT: u64 = 1 << 16;

/// Random origins tried per vessel on anchorages too large to search.
const SAMPLE_ATTEMPTS: usize = 1024;

impl Board {
    /// Place every pending vessel at a uniformly chosen free position, in either
    /// orientation. Vessels that fit nowhere stay pending. Returns how many were placed.
    ///
    /// Small anchorages are searched exhaustively. On larger ones a bounded number of
    /// random origins is tried instead, so a vessel may stay pending even though a free
    /// position exists.
    pub fn place_remaining<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let pending: Vec<VesselId> = self.pending_vessels().map(|vessel| vessel.id()).collect();
        let exhaustive = self.dimensions().area() <= EXHAUSTIVE_LIMIT;
        let mut placed = 0;
        for id in pending {
            let position = if exhaustive {
                self.free_positions(id).choose(rng).copied()
            } else {
                self.sample_position(id, rng)
            };
            if let Some((origin, rotated)) = position {
                if rotated {
                    self.rotate(id);
                }
                if self.commit_placement(id, origin.x, origin.y) {
                    placed += 1;
                }
            } else {
                debug!(vessel = %id, "no free position for vessel");
            }
        }
        placed
    }

    /// Orientations to try for the vessel: its current one, then the rotated one unless
    /// the vessel is square.
    fn shapes(&self, id: VesselId) -> Vec<(i32, i32, bool)> {
        match self.vessel(id) {
            Some(vessel) if vessel.width() == vessel.height() => {
                vec![(vessel.width(), vessel.height(), false)]
            }
            Some(vessel) => vec![
                (vessel.width(), vessel.height(), false),
                (vessel.height(), vessel.width(), true),
            ],
            None => Vec::new(),
        }
    }

    /// Try random origins until one fits, giving up after [`SAMPLE_ATTEMPTS`].
    fn sample_position<R: Rng + ?Sized>(
        &self,
        id: VesselId,
        rng: &mut R,
    ) -> Option<(Coordinate, bool)> {
        let shapes = self.shapes(id);
        let dim = self.dimensions();
        for _ in 0..SAMPLE_ATTEMPTS {
            let &(w, h, rotated) = shapes.choose(rng)?;
            let max_x = i64::from(dim.width) - i64::from(w.max(1));
            let max_y = i64::from(dim.height) - i64::from(h.max(1));
            if max_x < 0 || max_y < 0 {
                continue;
            }
            let origin = Coordinate::new(
                rng.gen_range(0, max_x + 1) as i32,
                rng.gen_range(0, max_y + 1) as i32,
            );
            let footprint = Footprint::new(origin, w, h);
            if dim.contains(&footprint) && self.grid.is_free(&footprint, None) {
                return Some((origin, rotated));
            }
        }
        None
    }

    /// Every origin where the vessel fits, paired with whether it must be rotated first.
    /// Square vessels are only listed once.
    fn free_positions(&self, id: VesselId) -> Vec<(Coordinate, bool)> {
        let shapes = self.shapes(id);
        let dim = self.dimensions();
        let mut candidates = Vec::new();
        for &(w, h, rotated) in shapes.iter() {
            for coord in dim.iter_coordinates().flatten() {
                let footprint = Footprint::new(coord, w, h);
                if dim.contains(&footprint) && self.grid.is_free(&footprint, None) {
                    candidates.push((coord, rotated));
                }
            }
        }
        candidates
    }
}
