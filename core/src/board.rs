//! Copy-on-write board operations.
//!
//! Every function takes a board snapshot and returns a new one; the input is
//! never touched. With [`SquareGrid`] the returned board shares storage with
//! the input until something actually changes, so an ignored operation is
//! free.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::*;

/// Unmined board sized by `settings`.
pub fn create_board<G: Grid>(settings: &GameSettings) -> G {
    G::generate(settings)
}

/// Places `count` mines away from `exclude` and its neighbors, shuffling with
/// a generator seeded by `seed`.
pub fn place_mines<G: Grid>(board: &G, count: CellCount, exclude: NodeId<G>, seed: u64) -> G {
    let mut next = board.clone();
    let mut rng = SmallRng::seed_from_u64(seed);
    next.place_mines(count, Some(exclude), &mut rng);
    next
}

/// Reveals `id`, flooding through zero cells. A flagged, revealed or missing
/// cell leaves the board as it was.
pub fn open_cell<G: Grid>(board: &G, id: NodeId<G>) -> G {
    let mut next = board.clone();
    next.open(id);
    next
}

/// Opens the unflagged neighbors of a satisfied numbered cell.
pub fn chord_cell<G: Grid>(board: &G, id: NodeId<G>) -> (G, RevealOutcome) {
    let mut next = board.clone();
    let outcome = next.chord(id);
    (next, outcome)
}

pub fn toggle_flag<G: Grid>(board: &G, id: NodeId<G>) -> G {
    let mut next = board.clone();
    next.toggle_flag(id);
    next
}

pub fn reveal_all_mines<G: Grid>(board: &G) -> G {
    let mut next = board.clone();
    next.reveal_all_mines();
    next
}

pub fn check_win_condition<G: Grid>(board: &G) -> bool {
    board.is_cleared()
}

pub fn count_flags<G: Grid>(board: &G) -> CellCount {
    board.flag_count()
}
