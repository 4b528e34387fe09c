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

//! Cell coordinates and rectangular footprints on the anchorage.

/// The coordinates of a cell in the anchorage. Signed so that positions computed from
/// pointer locations left of or above the grid can be expressed and rejected.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Coordinate {
    /// Horizontal position of the cell.
    pub x: i32,
    /// Vertical position of the cell.
    pub y: i32,
}

impl Coordinate {
    /// Construct a [`Coordinate`] from the given `x` and `y`.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coordinate {
    /// Construct a [`Coordinate`] from the given `(x, y)` pair.
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The set of cells covered by a vessel's rectangle at a given origin.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Footprint {
    /// Top-left cell of the rectangle.
    origin: Coordinate,
    /// Extent along `x`.
    width: i32,
    /// Extent along `y`.
    height: i32,
}

impl Footprint {
    /// Construct the footprint of a `width` x `height` rectangle anchored at `origin`.
    pub fn new(origin: Coordinate, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Top-left cell of this footprint.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// One past the rightmost column covered. Widened so that huge extents cannot
    /// overflow.
    pub(crate) fn end_x(&self) -> i64 {
        i64::from(self.origin.x) + i64::from(self.width)
    }

    /// One past the bottom row covered.
    pub(crate) fn end_y(&self) -> i64 {
        i64::from(self.origin.y) + i64::from(self.height)
    }

    /// Number of cells covered. Degenerate rectangles cover nothing.
    pub fn area(&self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Returns true if the given cell lies inside this footprint.
    pub fn contains(&self, coord: Coordinate) -> bool {
        let (x, y) = (i64::from(coord.x), i64::from(coord.y));
        x >= i64::from(self.origin.x)
            && y >= i64::from(self.origin.y)
            && x < self.end_x()
            && y < self.end_y()
    }

    /// Iterate the cells of this footprint, column by column.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let Footprint {
            origin,
            width,
            height,
        } = *self;
        (0..width.max(0))
            .flat_map(move |dx| (0..height.max(0)).map(move |dy| (dx, dy)))
            .map(move |(dx, dy)| Coordinate::new(origin.x + dx, origin.y + dy))
    }
}
