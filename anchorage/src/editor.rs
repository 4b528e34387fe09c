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

//! The editor: a [`Board`] plus the drag session that moves vessels onto it.
//!
//! The drag lifecycle is a two-state machine. [`Editor::begin_drag`] picks a vessel up,
//! releasing it from the grid if it was placed. [`Editor::try_place`] attempts to drop
//! it at a cell and may be called any number of times. [`Editor::end_drag`] finishes the
//! session: a vessel that was never successfully dropped ends up unplaced, even if it
//! was placed before the drag began.
//!
//! Observers registered with [`Editor::subscribe`] are notified once per operation that
//! changed anything, after the change has been applied.

use std::mem;

use enumflags2::BitFlags;
use tracing::debug;

use crate::{
    board::{Board, PlaceError, Placement},
    fleet::FleetResponse,
    notify::{Change, Observers, Subscription},
    vessels::{Vessel, VesselId},
};

/// Transient state of a vessel being dragged.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragSession {
    /// The vessel being dragged.
    vessel: VesselId,
    /// Horizontal offset of the grab point from the vessel's top-left corner.
    offset_x: f64,
    /// Vertical offset of the grab point from the vessel's top-left corner.
    offset_y: f64,
    /// Whether a drop succeeded during this session.
    succeeded: bool,
}

impl DragSession {
    pub fn vessel_id(&self) -> VesselId {
        self.vessel
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Returns true once a drop has succeeded during this session.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }
}

/// Owned editor state: the board and the current drag session, if any.
#[derive(Debug, Default)]
pub struct Editor {
    board: Board,
    drag: Option<DragSession>,
    observers: Observers<Editor>,
}

impl Editor {
    /// Create an editor around an empty, uninitialized board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor around a board initialized from `fleet`.
    pub fn from_fleet(fleet: &FleetResponse) -> Self {
        Self {
            board: Board::from_fleet(fleet),
            ..Self::default()
        }
    }

    /// Read access to the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current drag session, if a vessel is being dragged.
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The vessel being dragged, if any.
    pub fn dragging_vessel(&self) -> Option<&Vessel> {
        self.drag
            .as_ref()
            .and_then(|drag| self.board.vessel(drag.vessel))
    }

    /// Register an observer called after every change.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&Editor, BitFlags<Change>) + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    /// Notify observers. The registry is moved out for the duration so callbacks can read
    /// the editor.
    fn notify(&mut self, changes: BitFlags<Change>) {
        if changes.is_empty() {
            return;
        }
        let mut observers = mem::take(&mut self.observers);
        observers.emit(self, changes);
        self.observers = observers;
    }

    /// Replace the board with the one described by `fleet`, abandoning any drag in
    /// progress. Always notifies.
    pub fn initialize(&mut self, fleet: &FleetResponse) {
        self.drag = None;
        self.board.initialize(fleet);
        self.notify(BitFlags::all());
    }

    /// See [`Board::can_place`].
    pub fn can_place(&self, vessel: &Vessel, x: i32, y: i32) -> bool {
        self.board.can_place(vessel, x, y)
    }

    /// See [`Board::check_placement`].
    pub fn check_placement(&self, vessel: &Vessel, x: i32, y: i32) -> Result<(), PlaceError> {
        self.board.check_placement(vessel, x, y)
    }

    /// See [`Board::commit_placement`].
    pub fn commit_placement(&mut self, id: VesselId, x: i32, y: i32) -> bool {
        let placed = self.board.commit_placement(id, x, y);
        if placed {
            self.notify(Change::Placements.into());
        }
        placed
    }

    /// Release the vessel's placement. Returns the placement that was removed.
    pub fn release(&mut self, id: VesselId) -> Option<Placement> {
        let released = self.board.release(id);
        if released.is_some() {
            self.notify(Change::Placements.into());
        }
        released
    }

    /// Release every placement.
    pub fn clear_placements(&mut self) -> bool {
        let cleared = self.board.clear_placements();
        if cleared {
            self.notify(Change::Placements.into());
        }
        cleared
    }

    /// See [`Board::rotate`].
    pub fn rotate(&mut self, id: VesselId) -> bool {
        let placed = self.board.is_placed(id);
        let rotated = self.board.rotate(id);
        if rotated {
            let mut changes = BitFlags::from(Change::Fleet);
            if placed {
                changes |= Change::Placements;
            }
            self.notify(changes);
        }
        rotated
    }

    /// Randomly place every pending vessel, see [`Board::place_remaining`]. A drag in
    /// progress is ended first, so a dragged vessel that was never dropped is back in its
    /// pool and gets placed like any other. Sends a single notification covering both.
    #[cfg(feature = "rng_gen")]
    pub fn place_remaining<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut changes = self.finish_drag();
        let placed = self.board.place_remaining(rng);
        if placed > 0 {
            changes |= Change::Fleet | Change::Placements;
        }
        self.notify(changes);
        placed
    }

    pub fn is_placed(&self, id: VesselId) -> bool {
        self.board.is_placed(id)
    }

    pub fn is_complete(&self) -> bool {
        self.board.is_complete()
    }

    /// Pick up a vessel, grabbed at the given offset from its top-left corner. A placed
    /// vessel is released so its cells are free while it is dragged. A drag already in
    /// progress is ended first. Returns false, changing nothing, for an unknown vessel.
    pub fn begin_drag(&mut self, id: VesselId, offset_x: f64, offset_y: f64) -> bool {
        if self.board.vessel(id).is_none() {
            return false;
        }
        let mut changes = self.finish_drag();
        if self.board.release(id).is_some() {
            changes |= Change::Placements;
        }
        self.drag = Some(DragSession {
            vessel: id,
            offset_x,
            offset_y,
            succeeded: false,
        });
        debug!(vessel = %id, offset_x, offset_y, "drag started");
        self.notify(changes | Change::Drag);
        true
    }

    /// Attempt to drop the dragged vessel with its top-left cell at `(x, y)`. A failed
    /// attempt leaves the session as it was, including an earlier success. Returns false
    /// if nothing is being dragged.
    pub fn try_place(&mut self, x: i32, y: i32) -> bool {
        let vessel = match self.drag {
            Some(ref drag) => drag.vessel,
            None => return false,
        };
        if !self.board.commit_placement(vessel, x, y) {
            return false;
        }
        if let Some(ref mut drag) = self.drag {
            drag.succeeded = true;
        }
        self.notify(Change::Placements | Change::Drag);
        true
    }

    /// End the drag. If no drop succeeded the vessel is released, so it never ends up
    /// without a placement record while still appearing on the grid. Returns false if
    /// nothing was being dragged.
    pub fn end_drag(&mut self) -> bool {
        if self.drag.is_none() {
            return false;
        }
        let changes = self.finish_drag();
        self.notify(changes);
        true
    }

    /// Clear the drag session, rolling back an unsuccessful one. Returns what changed.
    fn finish_drag(&mut self) -> BitFlags<Change> {
        let drag = match self.drag.take() {
            Some(drag) => drag,
            None => return BitFlags::empty(),
        };
        let mut changes = BitFlags::from(Change::Drag);
        if !drag.succeeded && self.board.release(drag.vessel).is_some() {
            changes |= Change::Placements;
        }
        debug!(vessel = %drag.vessel, succeeded = drag.succeeded, "drag ended");
        changes
    }
}
