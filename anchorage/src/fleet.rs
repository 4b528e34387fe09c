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

//! Fleet descriptor consumed by [`Board::initialize`][crate::board::Board::initialize].
//!
//! The descriptor is produced by a remote service as a JSON document:
//!
//! ```json
//! {
//!   "anchorageSize": { "width": 12, "height": 10 },
//!   "fleets": [
//!     {
//!       "singleShipDimensions": { "width": 3, "height": 1 },
//!       "shipDesignation": "Destroyer",
//!       "shipCount": 2
//!     }
//!   ]
//! }
//! ```
//!
//! Keys are case-sensitive. Absent fields default to zero or empty.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "fetch")]
pub use self::client::{FleetClient, DEFAULT_URL};

#[cfg(feature = "fetch")]
mod client;

/// Top level fleet descriptor.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetResponse {
    pub anchorage_size: AnchorageSize,
    pub fleets: Vec<FleetItem>,
}

impl FleetResponse {
    /// Decode a descriptor from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, FleetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of vessels described, ignoring negative counts.
    pub fn vessel_count(&self) -> usize {
        self.fleets
            .iter()
            .map(|fleet| fleet.ship_count.max(0) as usize)
            .sum()
    }
}

/// Size of the anchorage in cells.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorageSize {
    pub width: i32,
    pub height: i32,
}

/// One vessel type and how many of it the fleet contains.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetItem {
    pub single_ship_dimensions: ShipDimensions,
    pub ship_designation: String,
    pub ship_count: i32,
}

/// Extent of a single vessel of a fleet entry.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipDimensions {
    pub width: i32,
    pub height: i32,
}

/// Error produced while obtaining a fleet descriptor.
#[derive(Debug, Error)]
pub enum FleetError {
    /// Transport failure talking to the fleet service.
    #[cfg(feature = "fetch")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("fleet service returned status {0}")]
    Status(u16),

    /// The payload was not a valid fleet descriptor.
    #[error("malformed fleet descriptor: {0}")]
    Json(#[from] serde_json::Error),

    /// The fetch was abandoned before it completed.
    #[error("fleet fetch cancelled")]
    Cancelled,
}
