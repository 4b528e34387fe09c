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

//! Core of an anchorage board editor: vessels of various rectangular sizes are dragged
//! from their pools onto a fixed-size grid, without leaving the grid and without
//! overlapping each other.
//!
//! [`board`] holds the occupancy grid model, [`editor`] the drag session controller that
//! drives it, and [`fleet`] the descriptor (and, with the `fetch` feature, the client)
//! that a session starts from.
//!
//! ```
//! use anchorage::{fleet::FleetResponse, Editor};
//!
//! let fleet = FleetResponse::from_json(
//!     r#"{"anchorageSize":{"width":10,"height":10},
//!         "fleets":[{"singleShipDimensions":{"width":3,"height":1},
//!                    "shipDesignation":"Destroyer","shipCount":1}]}"#,
//! )
//! .unwrap();
//! let mut editor = Editor::from_fleet(&fleet);
//! let id = editor.board().groups()[0].vessels()[0].id();
//!
//! editor.begin_drag(id, 0.0, 0.0);
//! assert!(editor.try_place(7, 9));
//! editor.end_drag();
//! assert!(editor.is_complete());
//! ```

pub mod board;
pub mod editor;
pub mod fleet;
pub mod notify;
pub mod vessels;

pub use crate::{
    board::Board,
    editor::{DragSession, Editor},
    notify::Change,
    vessels::{Vessel, VesselGroup, VesselId},
};
