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

//! Errors used by the [`Board`][crate::board::Board].

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::{board::Footprint, vessels::VesselId};

/// Reason why a vessel could not be placed at a given position.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// Part of the vessel would lie outside the anchorage.
    #[error("the vessel does not fit inside the anchorage at that position")]
    OutOfBounds,
    /// One or more of the cells is covered by another vessel.
    #[error("the requested position overlaps another vessel")]
    AlreadyOccupied,
    /// No vessel with the given id exists on this board.
    #[error("no such vessel")]
    UnknownVessel,
}

/// Error caused when attempting to place a vessel in an invalid position.
#[derive(Error)]
#[error("could not place vessel {vessel}: {reason}")]
pub struct PlaceError {
    #[source]
    reason: CannotPlaceReason,
    vessel: VesselId,
    footprint: Footprint,
}

impl Debug for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PlaceError {
    pub(super) fn new(reason: CannotPlaceReason, vessel: VesselId, footprint: Footprint) -> Self {
        Self {
            reason,
            vessel,
            footprint,
        }
    }

    /// Get the reason placement was rejected.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// Id of the vessel that was being placed.
    pub fn vessel(&self) -> VesselId {
        self.vessel
    }

    /// The rectangle where placement was attempted.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }
}
