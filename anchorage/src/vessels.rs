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

//! Vessels and the groups they are pooled in before being placed.
use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fleet::FleetItem;

/// Colors handed out to vessel groups, by group position.
pub const PALETTE: [Color; 5] = [
    Color("#1F77B4"),
    Color("#2CA02C"),
    Color("#D62728"),
    Color("#9467BD"),
    Color("#8C564B"),
];

/// Display color token of a vessel group.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Color(&'static str);

impl Color {
    /// Color assigned to the group at the given position. Wraps around the palette, so
    /// groups past the fifth share colors with earlier ones.
    pub fn for_group(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    /// The hex color string.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.0)
    }
}

/// Unique identity of a vessel. Fresh ids are drawn every time a board is initialized,
/// so ids from a previous fleet never resolve on the new one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselId(Uuid);

impl VesselId {
    pub(crate) fn random() -> Self {
        VesselId(Uuid::new_v4())
    }

    /// The underlying uuid.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for VesselId {
    fn from(id: Uuid) -> Self {
        VesselId(id)
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A placeable rectangular token.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Vessel {
    id: VesselId,
    type_name: String,
    width: i32,
    height: i32,
    color: Color,
    /// 1-based position of this vessel within its group.
    sequence_index: usize,
}

impl Vessel {
    pub fn id(&self) -> VesselId {
        self.id
    }

    /// Designation of the vessel type, shared by every vessel of the group.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Current extent along `x`. Swaps with the height on rotation.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Current extent along `y`.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Distinguishes vessels of the same type. Starts at 1.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    /// Human readable label, `<type>-<index>`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.type_name, self.sequence_index)
    }

    pub(crate) fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }
}

/// Same-type vessels created from one fleet entry.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct VesselGroup {
    type_name: String,
    color: Color,
    vessels: Vec<Vessel>,
}

impl VesselGroup {
    /// Build the group for the fleet entry at position `index`, drawing a new id for each
    /// of its `ship_count` vessels. A zero or negative count yields an empty group.
    pub(crate) fn from_fleet(index: usize, item: &FleetItem) -> Self {
        let color = Color::for_group(index);
        let count = usize::try_from(item.ship_count).unwrap_or(0);
        let vessels = (1..=count)
            .map(|sequence_index| Vessel {
                id: VesselId::random(),
                type_name: item.ship_designation.clone(),
                width: item.single_ship_dimensions.width,
                height: item.single_ship_dimensions.height,
                color,
                sequence_index,
            })
            .collect();
        Self {
            type_name: item.ship_designation.clone(),
            color,
            vessels,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Vessels of this group, ordered by sequence index.
    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub(crate) fn vessel_mut(&mut self, id: VesselId) -> Option<&mut Vessel> {
        self.vessels.iter_mut().find(|vessel| vessel.id == id)
    }
}
