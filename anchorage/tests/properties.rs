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

use anchorage::{
    fleet::{AnchorageSize, FleetItem, FleetResponse, ShipDimensions},
    Board, Editor, VesselId,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Commit(usize, i32, i32),
    Release(usize),
    Rotate(usize),
    Drag(usize, Vec<(i32, i32)>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6, -2i32..12, -2i32..12).prop_map(|(v, x, y)| Op::Commit(v, x, y)),
        (0usize..6).prop_map(Op::Release),
        (0usize..6).prop_map(Op::Rotate),
        (0usize..6, prop::collection::vec((-2i32..12, -2i32..12), 0..3))
            .prop_map(|(v, drops)| Op::Drag(v, drops)),
    ]
}

fn fleet(width: i32, height: i32) -> FleetResponse {
    FleetResponse {
        anchorage_size: AnchorageSize { width, height },
        fleets: vec![
            FleetItem {
                single_ship_dimensions: ShipDimensions {
                    width: 3,
                    height: 1,
                },
                ship_designation: "Destroyer".to_string(),
                ship_count: 3,
            },
            FleetItem {
                single_ship_dimensions: ShipDimensions {
                    width: 2,
                    height: 2,
                },
                ship_designation: "Cruiser".to_string(),
                ship_count: 2,
            },
            FleetItem {
                single_ship_dimensions: ShipDimensions {
                    width: 4,
                    height: 1,
                },
                ship_designation: "Carrier".to_string(),
                ship_count: 1,
            },
        ],
    }
}

/// Occupied cells are exactly the union of placement footprints, and footprints are
/// disjoint.
fn occupancy_matches_placements(board: &Board) -> Result<(), TestCaseError> {
    let dim = board.dimensions();
    let mut covered = 0;
    for y in 0..dim.height {
        for x in 0..dim.width {
            let covering: Vec<VesselId> = board
                .placements()
                .filter(|p| p.footprint().contains((x, y).into()))
                .map(|p| p.vessel_id())
                .collect();
            prop_assert!(covering.len() <= 1, "overlap at ({}, {})", x, y);
            prop_assert_eq!(board.occupant(x, y), covering.first().copied());
            covered += covering.len();
        }
    }
    let area: usize = board.placements().map(|p| p.footprint().area()).sum();
    prop_assert_eq!(area, covered);
    prop_assert_eq!(area, board.occupied_count());
    Ok(())
}

proptest! {
    #[test]
    fn occupancy_invariant_holds(
        width in 3i32..11,
        height in 3i32..11,
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut editor = Editor::from_fleet(&fleet(width, height));
        let ids: Vec<VesselId> = editor.board().vessels().map(|v| v.id()).collect();
        for op in ops {
            match op {
                Op::Commit(v, x, y) => {
                    let vessel = editor.board().vessel(ids[v]).unwrap().clone();
                    let allowed = editor.can_place(&vessel, x, y);
                    let placed = editor.commit_placement(ids[v], x, y);
                    if allowed {
                        prop_assert!(placed);
                    }
                    if placed {
                        prop_assert!(editor.is_placed(ids[v]));
                    }
                }
                Op::Release(v) => {
                    editor.release(ids[v]);
                    prop_assert!(!editor.is_placed(ids[v]));
                }
                Op::Rotate(v) => {
                    editor.rotate(ids[v]);
                }
                Op::Drag(v, drops) => {
                    editor.begin_drag(ids[v], 0.0, 0.0);
                    let mut any = false;
                    for (x, y) in drops {
                        any |= editor.try_place(x, y);
                    }
                    editor.end_drag();
                    prop_assert_eq!(editor.is_placed(ids[v]), any);
                }
            }
            occupancy_matches_placements(editor.board())?;
            prop_assert_eq!(
                editor.is_complete(),
                editor.board().placements().count() == ids.len()
            );
        }
    }

    #[test]
    fn release_restores_placeability(x in 0i32..8, y in 0i32..10) {
        let mut board = Board::from_fleet(&fleet(10, 10));
        let vessel = board.vessels().next().unwrap().clone();
        prop_assert!(board.can_place(&vessel, x, y));
        prop_assert!(board.commit_placement(vessel.id(), x, y));
        prop_assert!(!board.can_place(&vessel, x, y));
        prop_assert!(board.release(vessel.id()).is_some());
        prop_assert!(board.can_place(&vessel, x, y));
    }

    #[test]
    fn double_rotation_restores_extent(index in 0usize..6) {
        let mut board = Board::from_fleet(&fleet(10, 10));
        let vessel = board.vessels().nth(index).unwrap().clone();
        prop_assert!(board.rotate(vessel.id()));
        prop_assert!(board.rotate(vessel.id()));
        let after = board.vessel(vessel.id()).unwrap();
        prop_assert_eq!((after.width(), after.height()), (vessel.width(), vessel.height()));
    }

    #[test]
    fn boundary_along_x(width in 4i32..20, height in 1i32..20) {
        let board = Board::from_fleet(&fleet(width, height));
        let vessel = board.vessels().next().unwrap().clone();
        prop_assert!(board.can_place(&vessel, width - vessel.width(), 0));
        prop_assert!(!board.can_place(&vessel, width - vessel.width() + 1, 0));
    }
}
