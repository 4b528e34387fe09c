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

//! Occupancy of the anchorage, keyed by cell.
//!
//! Only covered cells are stored, so memory follows the placed vessels rather than the
//! area of the anchorage. Any dimensions a descriptor carries can be represented.

use std::{borrow::Borrow, collections::HashMap};

use crate::{
    board::{Coordinate, Dimensions, Footprint},
    vessels::VesselId,
};

/// Occupancy matrix of the anchorage. Each covered cell records the vessel whose
/// footprint covers it.
#[derive(Debug, Clone)]
pub(super) struct Grid {
    /// Dimensions of this grid.
    pub(super) dim: Dimensions,
    /// Covered cells. Absent cells are free.
    cells: HashMap<Coordinate, VesselId>,
}

impl Grid {
    /// Create an all-free grid.
    pub(super) fn new(dim: Dimensions) -> Self {
        Self {
            dim,
            cells: HashMap::new(),
        }
    }

    /// Get the occupant of the cell at the given [`Coordinate`]. Returns `None` if the
    /// coordinate is out of bounds, `Some(None)` for a free cell.
    pub(super) fn get<B: Borrow<Coordinate>>(&self, coord: B) -> Option<Option<VesselId>> {
        let coord = coord.borrow();
        if self.dim.in_bounds(coord) {
            Some(self.cells.get(coord).copied())
        } else {
            None
        }
    }

    /// Returns true if every cell of the footprint is in bounds and either free or
    /// covered by `ignore`.
    pub(super) fn is_free(&self, footprint: &Footprint, ignore: Option<VesselId>) -> bool {
        footprint.cells().all(|coord| match self.get(coord) {
            None => false,
            Some(None) => true,
            Some(Some(id)) => Some(id) == ignore,
        })
    }

    /// Mark every cell of the footprint as covered by `id`. The caller must have
    /// checked that the footprint is in bounds.
    pub(super) fn fill(&mut self, footprint: &Footprint, id: VesselId) {
        debug_assert!(self.dim.contains(footprint));
        self.cells.extend(footprint.cells().map(|coord| (coord, id)));
    }

    /// Free every cell of the footprint still attributed to `id`.
    pub(super) fn clear(&mut self, footprint: &Footprint, id: VesselId) {
        for coord in footprint.cells() {
            if self.cells.get(&coord) == Some(&id) {
                self.cells.remove(&coord);
            }
        }
    }

    /// Number of occupied cells.
    pub(super) fn occupied_count(&self) -> usize {
        self.cells.len()
    }
}
