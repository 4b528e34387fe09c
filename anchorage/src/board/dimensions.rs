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

//! Extent of the anchorage grid.

use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, Footprint};

/// Width and height of the anchorage, in cells. Values are taken as provided by the
/// fleet descriptor: zero or negative extents are allowed and simply leave no room for
/// any placement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width of the anchorage. This corresponds to the `x` [`Coordinate`].
    pub width: i32,
    /// Height of the anchorage. This corresponds to the `y` [`Coordinate`].
    pub height: i32,
}

impl Dimensions {
    /// Create new [`Dimensions`] with the specified width and height.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of cells in an anchorage of this size. Never overflows: the product of two
    /// non-negative `i32` values always fits in a `u64`.
    pub fn area(&self) -> u64 {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Returns true if the whole footprint lies within these dimensions.
    pub fn contains(&self, footprint: &Footprint) -> bool {
        let origin = footprint.origin();
        origin.x >= 0
            && origin.y >= 0
            && footprint.end_x() <= i64::from(self.width)
            && footprint.end_y() <= i64::from(self.height)
    }

    /// Returns true if the cell at `coord` lies within these dimensions.
    pub fn in_bounds(&self, coord: &Coordinate) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the
    /// coordinates of that row.
    pub fn iter_coordinates(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let width = self.width.max(0);
        (0..self.height.max(0)).map(move |y| (0..width).map(move |x| Coordinate::new(x, y)))
    }
}
