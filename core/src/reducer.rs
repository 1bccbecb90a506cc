use serde::{Deserialize, Serialize};

use crate::*;

/// Reducer state: a board snapshot plus its cached flag count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState<G = SquareGrid> {
    pub board: G,
    /// Always recomputed from `board`, never adjusted incrementally.
    pub flags_count: CellCount,
}

impl<G: Grid> BoardState<G> {
    pub fn new(board: G) -> Self {
        let flags_count = board::count_flags(&board);
        Self { board, flags_count }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoardAction<G: Grid = SquareGrid> {
    InitializeBoard(G),
    PlaceMines {
        exclude: NodeId<G>,
        count: CellCount,
        seed: u64,
    },
    RevealCell(NodeId<G>),
    ToggleFlag(NodeId<G>),
    ChordCell(NodeId<G>),
}

/// Next state, and for reveal and chord actions what opening cells led to.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardUpdate<G = SquareGrid> {
    pub state: BoardState<G>,
    pub result: Option<RevealOutcome>,
}

impl<G> BoardUpdate<G> {
    fn unchanged(state: BoardState<G>) -> Self {
        Self {
            state,
            result: None,
        }
    }
}

/// Pure transition from `state` under `action`.
///
/// Hitting a mine, whether directly or through a chord, reveals every mine on
/// the board. Otherwise a reveal or chord that leaves no safe cell hidden
/// yields [`RevealOutcome::Won`].
pub fn board_reducer<G: Grid>(state: &BoardState<G>, action: BoardAction<G>) -> BoardUpdate<G> {
    use BoardAction::*;

    match action {
        InitializeBoard(board) => BoardUpdate::unchanged(BoardState {
            board,
            flags_count: 0,
        }),
        PlaceMines {
            exclude,
            count,
            seed,
        } => BoardUpdate::unchanged(BoardState {
            board: board::place_mines(&state.board, count, exclude, seed),
            flags_count: state.flags_count,
        }),
        RevealCell(id) => {
            let Some(cell) = state.board.node(id) else {
                return BoardUpdate::unchanged(state.clone());
            };
            if cell.is_revealed() || cell.is_flagged() {
                return BoardUpdate::unchanged(state.clone());
            }

            if cell.is_mine() {
                return BoardUpdate {
                    state: BoardState {
                        board: board::reveal_all_mines(&state.board),
                        flags_count: state.flags_count,
                    },
                    result: Some(RevealOutcome::HitMine),
                };
            }

            let board = board::open_cell(&state.board, id);
            let result = if board::check_win_condition(&board) {
                RevealOutcome::Won
            } else {
                RevealOutcome::Revealed
            };
            BoardUpdate {
                state: BoardState {
                    board,
                    flags_count: state.flags_count,
                },
                result: Some(result),
            }
        }
        ToggleFlag(id) => {
            let board = board::toggle_flag(&state.board, id);
            let flags_count = board::count_flags(&board);
            BoardUpdate::unchanged(BoardState { board, flags_count })
        }
        ChordCell(id) => {
            let (board, outcome) = board::chord_cell(&state.board, id);
            let (board, result) = match outcome {
                RevealOutcome::HitMine => (board::reveal_all_mines(&board), outcome),
                RevealOutcome::Revealed if board::check_win_condition(&board) => {
                    (board, RevealOutcome::Won)
                }
                _ => (board, outcome),
            };
            BoardUpdate {
                state: BoardState {
                    board,
                    flags_count: state.flags_count,
                },
                result: Some(result),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(size: Coord2, mines: &[Coord2]) -> BoardState {
        BoardState::new(SquareGrid::with_mines(size, mines).unwrap())
    }

    fn id(coords: Coord2) -> CellId {
        CellId::new(coords)
    }

    #[test]
    fn initialize_replaces_board_and_clears_flags() {
        let mut current = state((3, 3), &[(0, 0)]);
        current = board_reducer(&current, BoardAction::ToggleFlag(id((0, 0)))).state;
        assert_eq!(current.flags_count, 1);

        let fresh = SquareGrid::new(4, 4);
        let next = board_reducer(&current, BoardAction::InitializeBoard(fresh.clone())).state;

        assert_eq!(next.board, fresh);
        assert_eq!(next.flags_count, 0);
    }

    #[test]
    fn place_mines_keeps_ring_clear() {
        let current = BoardState::new(SquareGrid::new(9, 9));
        let action = BoardAction::PlaceMines {
            exclude: id((0, 8)),
            count: 10,
            seed: 5,
        };

        let next = board_reducer(&current, action).state;

        assert_eq!(next.board.mine_count(), 10);
        for coords in [(0, 8), (1, 8), (0, 7), (1, 7)] {
            assert!(!next.board.node(id(coords)).unwrap().is_mine);
        }
        assert_eq!(current.board.mine_count(), 0);
    }

    #[test]
    fn reveal_mine_exposes_all_mines() {
        let current = state((3, 3), &[(0, 0), (2, 2)]);

        let update = board_reducer(&current, BoardAction::RevealCell(id((0, 0))));

        assert_eq!(update.result, Some(RevealOutcome::HitMine));
        for cell in update.state.board.all_nodes() {
            assert_eq!(cell.is_revealed, cell.is_mine);
        }
    }

    #[test]
    fn reveal_last_safe_cell_wins() {
        let current = state((2, 1), &[(0, 0)]);

        let update = board_reducer(&current, BoardAction::RevealCell(id((1, 0))));

        assert_eq!(update.result, Some(RevealOutcome::Won));
    }

    #[test]
    fn reveal_flagged_cell_is_ignored() {
        let current = state((3, 3), &[(0, 0)]);
        let current = board_reducer(&current, BoardAction::ToggleFlag(id((1, 1)))).state;

        let update = board_reducer(&current, BoardAction::RevealCell(id((1, 1))));

        assert_eq!(update.result, None);
        assert_eq!(update.state, current);
    }

    #[test]
    fn flag_count_is_recounted() {
        let mut current = state((3, 3), &[(0, 0)]);
        // drifted cache is corrected by the next toggle
        current.flags_count = 7;

        let next = board_reducer(&current, BoardAction::ToggleFlag(id((2, 2)))).state;
        assert_eq!(next.flags_count, 1);

        let next = board_reducer(&next, BoardAction::ToggleFlag(id((2, 2)))).state;
        assert_eq!(next.flags_count, 0);
    }

    #[test]
    fn chord_onto_mine_exposes_all_mines() {
        let current = state((3, 3), &[(0, 1), (2, 2)]);
        let current = board_reducer(&current, BoardAction::RevealCell(id((1, 1)))).state;
        let current = board_reducer(&current, BoardAction::ToggleFlag(id((0, 0)))).state;
        let current = board_reducer(&current, BoardAction::ToggleFlag(id((1, 0)))).state;

        let update = board_reducer(&current, BoardAction::ChordCell(id((1, 1))));

        assert_eq!(update.result, Some(RevealOutcome::HitMine));
        assert!(update.state.board.node(id((0, 1))).unwrap().is_revealed);
        assert!(update.state.board.node(id((2, 2))).unwrap().is_revealed);
        assert_eq!(update.state.flags_count, 2);
    }

    #[test]
    fn chord_clearing_board_wins() {
        let current = state((3, 1), &[(0, 0)]);
        let current = board_reducer(&current, BoardAction::RevealCell(id((1, 0)))).state;
        let current = board_reducer(&current, BoardAction::ToggleFlag(id((0, 0)))).state;

        let update = board_reducer(&current, BoardAction::ChordCell(id((1, 0))));

        assert_eq!(update.result, Some(RevealOutcome::Won));
    }
}
