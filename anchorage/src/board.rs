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

//! The occupancy grid model: anchorage dimensions, the vessel inventory and the
//! placements committed onto the grid.
//!
//! The occupancy matrix is derived state. A cell is occupied exactly when the footprint
//! of one committed [`Placement`] covers it, and footprints never overlap. Every
//! mutation keeps the two in lockstep.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    fleet::FleetResponse,
    vessels::{Vessel, VesselGroup, VesselId},
};

use self::grid::Grid;
pub use self::{
    coordinate::{Coordinate, Footprint},
    dimensions::Dimensions,
    errors::{CannotPlaceReason, PlaceError},
};

mod coordinate;
mod dimensions;
mod errors;
mod grid;
#[cfg(feature = "rng_gen")]
mod random;

/// A committed position of a vessel on the grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Placement {
    vessel: VesselId,
    footprint: Footprint,
}

impl Placement {
    /// The vessel that was placed.
    pub fn vessel_id(&self) -> VesselId {
        self.vessel
    }

    pub fn x(&self) -> i32 {
        self.footprint.origin().x
    }

    pub fn y(&self) -> i32 {
        self.footprint.origin().y
    }

    /// Cells covered by this placement.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }
}

/// The anchorage and everything placed on it.
#[derive(Debug, Clone)]
pub struct Board {
    /// Occupancy of each cell.
    grid: Grid,

    /// Vessel pools, one per fleet entry, in descriptor order.
    groups: Vec<VesselGroup>,

    /// Mapping of placed vessel ids to their placement.
    placements: HashMap<VesselId, Placement>,

    /// Whether a fleet descriptor has been applied.
    initialized: bool,
}

impl Board {
    /// Construct an empty, uninitialized board with a 0x0 anchorage.
    pub fn new() -> Self {
        Self {
            grid: Grid::new(Dimensions::default()),
            groups: Vec::new(),
            placements: HashMap::new(),
            initialized: false,
        }
    }

    /// Construct a board and initialize it from the given descriptor.
    pub fn from_fleet(fleet: &FleetResponse) -> Self {
        let mut board = Self::new();
        board.initialize(fleet);
        board
    }

    /// Replace the whole board with the one described by `fleet`: new dimensions, a free
    /// grid, and a fresh vessel inventory with new ids. Nothing of the previous state
    /// survives, so ids obtained before the call no longer resolve.
    pub fn initialize(&mut self, fleet: &FleetResponse) {
        let dim = Dimensions::new(fleet.anchorage_size.width, fleet.anchorage_size.height);
        let groups: Vec<_> = fleet
            .fleets
            .iter()
            .enumerate()
            .map(|(index, item)| VesselGroup::from_fleet(index, item))
            .collect();

        self.grid = Grid::new(dim);
        self.groups = groups;
        self.placements.clear();
        self.initialized = true;
        debug!(
            width = dim.width,
            height = dim.height,
            groups = self.groups.len(),
            vessels = self.total_vessels(),
            "board initialized"
        );
    }

    /// Get the [`Dimensions`] of the anchorage.
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dim
    }

    /// Returns true once a fleet descriptor has been applied.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Vessel groups in descriptor order.
    pub fn groups(&self) -> &[VesselGroup] {
        &self.groups
    }

    /// Iterate every vessel, group by group.
    pub fn vessels(&self) -> impl Iterator<Item = &Vessel> {
        self.groups.iter().flat_map(|group| group.vessels().iter())
    }

    /// Get the vessel with the specified id if it exists.
    pub fn vessel(&self, id: VesselId) -> Option<&Vessel> {
        self.vessels().find(|vessel| vessel.id() == id)
    }

    pub fn total_vessels(&self) -> usize {
        self.groups.iter().map(|group| group.vessels().len()).sum()
    }

    /// Vessels that still need to be placed, group by group.
    pub fn pending_vessels(&self) -> impl Iterator<Item = &Vessel> {
        let placements = &self.placements;
        self.vessels()
            .filter(move |vessel| !placements.contains_key(&vessel.id()))
    }

    /// Explain whether `vessel` could be placed with its top-left cell at `(x, y)`. The
    /// rectangle must lie inside the anchorage and every covered cell must be free.
    /// Does not modify the board.
    pub fn check_placement(&self, vessel: &Vessel, x: i32, y: i32) -> Result<(), PlaceError> {
        let footprint = Footprint::new(Coordinate::new(x, y), vessel.width(), vessel.height());
        self.check_footprint(vessel.id(), footprint, None)
    }

    /// Returns true if `vessel` fits with its top-left cell at `(x, y)`.
    pub fn can_place(&self, vessel: &Vessel, x: i32, y: i32) -> bool {
        self.check_placement(vessel, x, y).is_ok()
    }

    /// Check a footprint against the bounds and the grid. Cells covered by `ignore` count
    /// as free.
    fn check_footprint(
        &self,
        vessel: VesselId,
        footprint: Footprint,
        ignore: Option<VesselId>,
    ) -> Result<(), PlaceError> {
        if !self.grid.dim.contains(&footprint) {
            Err(PlaceError::new(
                CannotPlaceReason::OutOfBounds,
                vessel,
                footprint,
            ))
        } else if !self.grid.is_free(&footprint, ignore) {
            Err(PlaceError::new(
                CannotPlaceReason::AlreadyOccupied,
                vessel,
                footprint,
            ))
        } else {
            Ok(())
        }
    }

    /// Place the vessel with its top-left cell at `(x, y)`, returning why placement was
    /// rejected if it was. A vessel that is already placed is moved: its current cells
    /// do not block the new position, and they are freed as the new ones are taken.
    pub fn place(&mut self, id: VesselId, x: i32, y: i32) -> Result<(), PlaceError> {
        let origin = Coordinate::new(x, y);
        let footprint = match self.vessel(id) {
            Some(vessel) => Footprint::new(origin, vessel.width(), vessel.height()),
            None => {
                return Err(PlaceError::new(
                    CannotPlaceReason::UnknownVessel,
                    id,
                    Footprint::new(origin, 0, 0),
                ))
            }
        };
        self.check_footprint(id, footprint, Some(id))?;

        if let Some(previous) = self.placements.remove(&id) {
            self.grid.clear(&previous.footprint, id);
        }
        // Already ensured that every cell is in bounds and free.
        self.grid.fill(&footprint, id);
        self.placements.insert(
            id,
            Placement {
                vessel: id,
                footprint,
            },
        );
        debug!(vessel = %id, x, y, "placement committed");
        Ok(())
    }

    /// Boolean form of [`Board::place`]. Returns false and leaves the board untouched if
    /// the position is invalid or the vessel is unknown.
    pub fn commit_placement(&mut self, id: VesselId, x: i32, y: i32) -> bool {
        self.place(id, x, y).is_ok()
    }

    /// Clear the placement of the vessel, freeing its cells. Returns the previous
    /// placement, or `None` if the vessel was not placed.
    pub fn release(&mut self, id: VesselId) -> Option<Placement> {
        self.placements.remove(&id).map(|placement| {
            self.grid.clear(&placement.footprint, id);
            debug!(vessel = %id, "placement released");
            placement
        })
    }

    /// Release every placement. Returns true if anything was placed.
    pub fn clear_placements(&mut self) -> bool {
        let ids: Vec<_> = self.placements.keys().copied().collect();
        for id in ids.iter() {
            self.release(*id);
        }
        !ids.is_empty()
    }

    /// Swap the width and height of the vessel. Returns false if no such vessel exists.
    ///
    /// A placed vessel keeps its origin: the rotated rectangle must fit there, with the
    /// vessel's own cells counting as free, and the footprint is re-committed in the same
    /// step. If it does not fit, the rotation is refused and false is returned.
    pub fn rotate(&mut self, id: VesselId) -> bool {
        let (width, height) = match self.vessel(id) {
            Some(vessel) => (vessel.width(), vessel.height()),
            None => return false,
        };

        if let Some(placement) = self.placements.get(&id).copied() {
            let rotated = Footprint::new(placement.footprint.origin(), height, width);
            if let Err(err) = self.check_footprint(id, rotated, Some(id)) {
                warn!(vessel = %id, reason = %err.reason(), "rotation refused");
                return false;
            }
            self.grid.clear(&placement.footprint, id);
            self.grid.fill(&rotated, id);
            self.placements.insert(
                id,
                Placement {
                    vessel: id,
                    footprint: rotated,
                },
            );
        }

        for group in self.groups.iter_mut() {
            if let Some(vessel) = group.vessel_mut(id) {
                vessel.rotate();
                break;
            }
        }
        debug!(vessel = %id, width = height, height = width, "vessel rotated");
        true
    }

    /// Returns true if the vessel currently occupies the grid.
    pub fn is_placed(&self, id: VesselId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Get the placement of the vessel, if it is placed.
    pub fn placement(&self, id: VesselId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    /// Iterate all current placements, in no particular order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.placements.values()
    }

    /// Returns true when every vessel of the inventory is placed.
    pub fn is_complete(&self) -> bool {
        self.placements.len() == self.total_vessels()
    }

    /// Get the vessel covering the cell at `(x, y)`. Returns `None` for free or
    /// out-of-bounds cells.
    pub fn occupant(&self, x: i32, y: i32) -> Option<VesselId> {
        self.grid.get(Coordinate::new(x, y)).flatten()
    }

    /// Returns true if some placement covers the cell at `(x, y)`.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.occupant(x, y).is_some()
    }

    /// Number of occupied cells on the grid.
    pub fn occupied_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Get an iterator over the rows of the grid. Each row is an iterator over the
    /// occupants of that row.
    pub fn iter_rows<'a>(
        &'a self,
    ) -> impl 'a + Iterator<Item = impl 'a + Iterator<Item = Option<VesselId>>> {
        let grid = &self.grid;
        self.grid
            .dim
            .iter_coordinates()
            .map(move |row| row.map(move |coord| grid.get(coord).flatten()))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{AnchorageSize, FleetItem, ShipDimensions};

    fn fleet(width: i32, height: i32, items: &[(&str, i32, i32, i32)]) -> FleetResponse {
        FleetResponse {
            anchorage_size: AnchorageSize { width, height },
            fleets: items
                .iter()
                .map(|&(name, count, w, h)| FleetItem {
                    single_ship_dimensions: ShipDimensions {
                        width: w,
                        height: h,
                    },
                    ship_designation: name.to_string(),
                    ship_count: count,
                })
                .collect(),
        }
    }

    fn sample() -> Board {
        Board::from_fleet(&fleet(
            10,
            10,
            &[("Destroyer", 2, 3, 1), ("Cruiser", 1, 2, 2)],
        ))
    }

    fn nth(board: &Board, group: usize, index: usize) -> Vessel {
        board.groups()[group].vessels()[index].clone()
    }

    /// Every occupied cell must belong to exactly the placement whose footprint
    /// covers it.
    fn assert_consistent(board: &Board) {
        let mut covered = 0;
        for placement in board.placements() {
            for cell in placement.footprint().cells() {
                assert_eq!(board.occupant(cell.x, cell.y), Some(placement.vessel_id()));
            }
            covered += placement.footprint().area();
        }
        assert_eq!(covered, board.occupied_count());
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        assert!(!board.is_initialized());
        assert_eq!(board.dimensions(), Dimensions::new(0, 0));
        assert!(board.groups().is_empty());
        assert_eq!(board.placements().count(), 0);
    }

    #[test]
    fn initialize_builds_inventory() {
        let board = sample();
        assert!(board.is_initialized());
        assert_eq!(board.dimensions(), Dimensions::new(10, 10));
        assert_eq!(board.groups().len(), 2);
        assert_eq!(board.groups()[0].vessels().len(), 2);
        assert_eq!(board.groups()[1].type_name(), "Cruiser");
        assert_ne!(board.groups()[0].color(), board.groups()[1].color());
        assert_eq!(board.total_vessels(), 3);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn reinitialize_discards_everything() {
        let mut board = sample();
        let first = nth(&board, 0, 0);
        assert!(board.commit_placement(first.id(), 0, 0));

        board.initialize(&fleet(6, 4, &[("Tug", 1, 1, 1)]));
        assert_eq!(board.dimensions(), Dimensions::new(6, 4));
        assert_eq!(board.placements().count(), 0);
        assert_eq!(board.occupied_count(), 0);
        assert!(board.vessel(first.id()).is_none());
        assert!(!board.commit_placement(first.id(), 0, 0));
    }

    #[test]
    fn check_placement_reports_reason() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        let d2 = nth(&board, 0, 1);
        assert_eq!(
            board.check_placement(&d1, 8, 0).unwrap_err().reason(),
            CannotPlaceReason::OutOfBounds
        );
        assert!(board.commit_placement(d1.id(), 0, 0));
        assert_eq!(
            board.check_placement(&d2, 2, 0).unwrap_err().reason(),
            CannotPlaceReason::AlreadyOccupied
        );
    }

    #[test]
    fn negative_coordinates_never_fit() {
        let board = sample();
        let d1 = nth(&board, 0, 0);
        assert!(!board.can_place(&d1, -1, 0));
        assert!(!board.can_place(&d1, 0, -1));
    }

    #[test]
    fn far_edge_placements() {
        let board = sample();
        let d1 = nth(&board, 0, 0);
        assert!(board.can_place(&d1, 0, 0));
        assert!(board.can_place(&d1, 7, 9));
        assert!(!board.can_place(&d1, 8, 9));
        assert!(!board.can_place(&d1, 0, 10));
    }

    #[test]
    fn degenerate_anchorage_rejects_all() {
        let board = Board::from_fleet(&fleet(0, -3, &[("Tug", 1, 1, 1)]));
        let tug = nth(&board, 0, 0);
        assert!(board.is_initialized());
        assert!(!board.can_place(&tug, 0, 0));
        assert_eq!(board.iter_rows().count(), 0);
    }

    #[test]
    fn largest_anchorage_initializes_and_places() {
        let mut board = Board::from_fleet(&fleet(
            i32::MAX,
            i32::MAX,
            &[("Destroyer", 1, 3, 1)],
        ));
        let d1 = nth(&board, 0, 0);
        assert!(board.is_initialized());
        assert_eq!(board.dimensions(), Dimensions::new(i32::MAX, i32::MAX));
        assert_eq!(board.occupied_count(), 0);

        assert!(board.commit_placement(d1.id(), i32::MAX - 3, i32::MAX - 1));
        assert!(!board.can_place(&d1, i32::MAX - 2, i32::MAX - 1));
        assert_eq!(board.occupant(i32::MAX - 1, i32::MAX - 1), Some(d1.id()));
        assert!(board.is_complete());
        assert_consistent(&board);

        // Standing up would run off the bottom edge.
        assert!(!board.rotate(d1.id()));
        assert!(board.release(d1.id()).is_some());
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn commit_marks_cells() {
        let mut board = sample();
        let cruiser = nth(&board, 1, 0);
        assert!(board.commit_placement(cruiser.id(), 2, 2));
        assert!(board.is_placed(cruiser.id()));
        let placement = board.placement(cruiser.id()).unwrap();
        assert_eq!((placement.x(), placement.y()), (2, 2));
        for (x, y) in &[(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(board.occupant(*x, *y), Some(cruiser.id()));
        }
        assert!(!board.is_occupied(4, 2));
        assert_eq!(board.occupied_count(), 4);
        assert_consistent(&board);
    }

    #[test]
    fn failed_commit_changes_nothing() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        assert!(!board.commit_placement(d1.id(), 8, 8));
        assert!(!board.is_placed(d1.id()));
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn commit_of_placed_vessel_moves_it() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        assert!(board.commit_placement(d1.id(), 0, 0));
        // Overlaps its own cells only.
        assert!(board.commit_placement(d1.id(), 1, 0));
        assert_eq!(board.placement(d1.id()).unwrap().x(), 1);
        assert!(!board.is_occupied(0, 0));
        assert_eq!(board.occupied_count(), 3);
        assert_consistent(&board);
    }

    #[test]
    fn release_frees_cells() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        let d2 = nth(&board, 0, 1);
        assert!(board.commit_placement(d1.id(), 2, 2));
        assert!(board.release(d1.id()).is_some());
        assert!(!board.is_placed(d1.id()));
        assert!(board.can_place(&d2, 2, 2));
        assert_eq!(board.occupied_count(), 0);
        assert!(board.release(d1.id()).is_none());
    }

    #[test]
    fn rotate_unplaced_vessel() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        assert!(board.rotate(d1.id()));
        let rotated = board.vessel(d1.id()).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (1, 3));
        assert!(board.rotate(d1.id()));
        let restored = board.vessel(d1.id()).unwrap();
        assert_eq!((restored.width(), restored.height()), (3, 1));
    }

    #[test]
    fn rotate_unknown_vessel_is_noop() {
        let mut board = sample();
        let before: Vec<_> = board.vessels().cloned().collect();
        assert!(!board.rotate(VesselId::random()));
        let after: Vec<_> = board.vessels().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn rotate_placed_vessel_recommits() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        assert!(board.commit_placement(d1.id(), 0, 0));
        assert!(board.rotate(d1.id()));
        for y in 0..3 {
            assert_eq!(board.occupant(0, y), Some(d1.id()));
        }
        assert!(!board.is_occupied(1, 0));
        assert_eq!(board.placement(d1.id()).unwrap().footprint().height(), 3);
        assert_consistent(&board);
    }

    #[test]
    fn rotate_placed_vessel_refused_when_blocked() {
        let mut board = sample();
        let d1 = nth(&board, 0, 0);
        let d2 = nth(&board, 0, 1);
        assert!(board.commit_placement(d1.id(), 0, 0));
        assert!(board.commit_placement(d2.id(), 0, 1));
        assert!(!board.rotate(d1.id()));
        let unchanged = board.vessel(d1.id()).unwrap();
        assert_eq!((unchanged.width(), unchanged.height()), (3, 1));
        assert_consistent(&board);

        // Against the bottom edge.
        assert!(board.commit_placement(d1.id(), 5, 9));
        assert!(!board.rotate(d1.id()));
        assert_consistent(&board);
    }

    #[test]
    fn completion_tracks_placements() {
        let mut board = sample();
        let ids: Vec<_> = board.vessels().map(Vessel::id).collect();
        assert!(!board.is_complete());
        assert!(board.commit_placement(ids[0], 0, 0));
        assert!(board.commit_placement(ids[1], 0, 1));
        assert!(!board.is_complete());
        assert_eq!(board.pending_vessels().count(), 1);
        assert!(board.commit_placement(ids[2], 0, 2));
        assert!(board.is_complete());
        assert!(board.clear_placements());
        assert!(!board.is_complete());
        assert_eq!(board.occupied_count(), 0);
        assert!(!board.clear_placements());
    }

    #[test]
    fn rows_report_occupants() {
        let mut board = Board::from_fleet(&fleet(3, 2, &[("Tug", 1, 2, 1)]));
        let tug = nth(&board, 0, 0);
        assert!(board.commit_placement(tug.id(), 1, 1));
        let rows: Vec<Vec<_>> = board.iter_rows().map(|row| row.collect()).collect();
        assert_eq!(
            rows,
            vec![
                vec![None, None, None],
                vec![None, Some(tug.id()), Some(tug.id())],
            ]
        );
    }
}
