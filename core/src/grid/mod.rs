//! Shape-independent board rules.
//!
//! A [`Grid`] only has to say which nodes exist and which ones touch; mine
//! placement, flood fill, flagging, chording and the win check are written
//! once here against that capability. [`SquareGrid`] is the one shape shipped.

use std::collections::VecDeque;
use core::fmt::Debug;
use core::hash::Hash;
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::*;
pub use square::*;

mod square;

/// Neighbor list, inline up to the 8 neighbors of a square cell.
pub type Neighbors<Id> = SmallVec<[Id; 8]>;

/// Identity type of the nodes of grid `G`.
pub type NodeId<G> = <<G as Grid>::Node as Node>::Id;

/// A single position of a grid, whatever its shape.
pub trait Node {
    type Id: Copy + Eq + Ord + Hash + Debug;

    fn id(&self) -> Self::Id;
    fn is_mine(&self) -> bool;
    fn is_revealed(&self) -> bool;
    fn is_flagged(&self) -> bool;
    fn adjacent_mines(&self) -> u8;

    fn set_mine(&mut self, is_mine: bool);
    fn set_revealed(&mut self, is_revealed: bool);
    fn set_flagged(&mut self, is_flagged: bool);
    fn set_adjacent_mines(&mut self, count: u8);
}

pub trait Grid: Clone {
    type Node: Node;

    /// Builds an unmined grid sized by `settings`.
    fn generate(settings: &GameSettings) -> Self;

    fn node(&self, id: NodeId<Self>) -> Option<&Self::Node>;

    fn node_mut(&mut self, id: NodeId<Self>) -> Option<&mut Self::Node>;

    /// Ids of the nodes touching `id`, empty if `id` is not on the grid.
    fn adjacent_ids(&self, id: NodeId<Self>) -> Neighbors<NodeId<Self>>;

    fn all_nodes(&self) -> impl Iterator<Item = &Self::Node>;

    fn all_nodes_mut(&mut self) -> impl Iterator<Item = &mut Self::Node>;

    fn adjacent_nodes(&self, id: NodeId<Self>) -> impl Iterator<Item = &Self::Node> {
        self.adjacent_ids(id)
            .into_iter()
            .filter_map(move |adjacent| self.node(adjacent))
    }

    fn node_ids(&self) -> Vec<NodeId<Self>> {
        self.all_nodes().map(Node::id).collect()
    }

    fn contains(&self, id: NodeId<Self>) -> bool {
        self.node(id).is_some()
    }

    fn count_adjacent_mines(&self, id: NodeId<Self>) -> u8 {
        let count = self.adjacent_nodes(id).filter(|node| node.is_mine()).count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    fn count_flagged_neighbors(&self, id: NodeId<Self>) -> u8 {
        let count = self
            .adjacent_nodes(id)
            .filter(|node| node.is_flagged())
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    fn mine_count(&self) -> CellCount {
        count_where(self.all_nodes(), Node::is_mine)
    }

    fn flag_count(&self) -> CellCount {
        count_where(self.all_nodes(), Node::is_flagged)
    }

    /// Places up to `count` mines uniformly among the nodes that are neither
    /// `exclude` nor adjacent to it, then recounts adjacency. Returns how many
    /// mines were actually placed, which is capped by the number of candidates.
    fn place_mines<R: Rng + ?Sized>(
        &mut self,
        count: CellCount,
        exclude: Option<NodeId<Self>>,
        rng: &mut R,
    ) -> CellCount {
        let safe_zone: Neighbors<NodeId<Self>> = match exclude {
            Some(exclude) if self.contains(exclude) => {
                let mut zone = self.adjacent_ids(exclude);
                zone.push(exclude);
                zone
            }
            _ => Neighbors::new(),
        };

        let mut candidates: Vec<_> = self
            .all_nodes()
            .map(Node::id)
            .filter(|id| !safe_zone.contains(id))
            .collect();
        candidates.shuffle(rng);

        let placed = candidates.len().min(usize::from(count));
        if placed < usize::from(count) {
            log::warn!(
                "Not enough room for mines, requested {} but only {} cells are eligible",
                count,
                candidates.len()
            );
        }

        for &id in &candidates[..placed] {
            if let Some(node) = self.node_mut(id) {
                node.set_mine(true);
            }
        }
        self.recount_adjacent_mines();

        let placed = CellCount::try_from(placed).unwrap_or(CellCount::MAX);
        log::debug!("Placed {} mines, safe zone around {:?}", placed, exclude);
        placed
    }

    /// Recomputes `adjacent_mines` of every non-mine node.
    fn recount_adjacent_mines(&mut self) {
        let counts: Vec<_> = self
            .all_nodes()
            .filter(|node| !node.is_mine())
            .map(|node| (node.id(), self.count_adjacent_mines(node.id())))
            .collect();

        for (id, count) in counts {
            if let Some(node) = self.node_mut(id) {
                node.set_adjacent_mines(count);
            }
        }
    }

    /// Reveals a hidden, unflagged node. A zero node floods outwards through
    /// every connected zero node, opening the numbered border as well.
    ///
    /// Never reports [`RevealOutcome::Won`]; that is for the caller to decide.
    fn open(&mut self, id: NodeId<Self>) -> RevealOutcome {
        match self.node(id) {
            Some(node) if !node.is_revealed() && !node.is_flagged() => {}
            _ => return RevealOutcome::NoChange,
        }

        let Some(node) = self.node_mut(id) else {
            return RevealOutcome::NoChange;
        };
        node.set_revealed(true);
        if node.is_mine() {
            log::debug!("Opened mine at {:?}", id);
            return RevealOutcome::HitMine;
        }
        if node.adjacent_mines() != 0 {
            return RevealOutcome::Revealed;
        }

        let mut opened = 1usize;
        let mut to_visit = VecDeque::from([id]);
        while let Some(visit_id) = to_visit.pop_front() {
            for adjacent in self.adjacent_ids(visit_id) {
                let Some(node) = self.node_mut(adjacent) else {
                    continue;
                };
                // revealed nodes are never queued twice
                if node.is_revealed() || node.is_flagged() {
                    continue;
                }

                node.set_revealed(true);
                opened += 1;
                if node.adjacent_mines() == 0 && !node.is_mine() {
                    to_visit.push_back(adjacent);
                }
            }
        }
        log::trace!("Flood fill from {:?} opened {} cells", id, opened);

        RevealOutcome::Revealed
    }

    /// Flips the flag of an unrevealed node.
    fn toggle_flag(&mut self, id: NodeId<Self>) -> MarkOutcome {
        match self.node(id) {
            Some(node) if !node.is_revealed() => {}
            _ => return MarkOutcome::NoChange,
        }

        match self.node_mut(id) {
            Some(node) => {
                node.set_flagged(!node.is_flagged());
                MarkOutcome::Changed
            }
            None => MarkOutcome::NoChange,
        }
    }

    /// Opens every hidden, unflagged neighbor of a revealed numbered node
    /// whose flagged neighbor count matches its number exactly.
    fn chord(&mut self, id: NodeId<Self>) -> RevealOutcome {
        let count = match self.node(id) {
            Some(node) if node.is_revealed() && !node.is_mine() && node.adjacent_mines() > 0 => {
                node.adjacent_mines()
            }
            _ => return RevealOutcome::NoChange,
        };

        if self.count_flagged_neighbors(id) != count {
            return RevealOutcome::NoChange;
        }

        self.adjacent_ids(id)
            .into_iter()
            .map(|adjacent| self.open(adjacent))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor)
    }

    /// Whether every non-mine node has been revealed.
    fn is_cleared(&self) -> bool {
        self.all_nodes()
            .all(|node| node.is_mine() || node.is_revealed())
    }

    /// Reveals every mine, leaving the other nodes untouched.
    fn reveal_all_mines(&mut self) {
        for node in self.all_nodes_mut() {
            if node.is_mine() {
                node.set_revealed(true);
            }
        }
    }
}

fn count_where<'a, N: Node + 'a>(
    nodes: impl Iterator<Item = &'a N>,
    predicate: impl Fn(&N) -> bool,
) -> CellCount {
    let count = nodes.filter(|node| predicate(node)).count();
    CellCount::try_from(count).unwrap_or(CellCount::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn grid(size: Coord2, mines: &[Coord2]) -> SquareGrid {
        SquareGrid::with_mines(size, mines).unwrap()
    }

    fn id(coords: Coord2) -> CellId {
        CellId::new(coords)
    }

    fn revealed(grid: &SquareGrid) -> usize {
        grid.all_nodes().filter(|cell| cell.is_revealed).count()
    }

    #[test]
    fn placement_keeps_first_click_ring_clear() {
        for seed in 0..64 {
            let mut board = SquareGrid::new(9, 9);
            let mut rng = SmallRng::seed_from_u64(seed);

            let placed = board.place_mines(72, Some(id((4, 4))), &mut rng);

            assert_eq!(placed, 72);
            for cell in board.all_nodes() {
                if chebyshev(cell.coords(), (4, 4)) <= 1 {
                    assert!(!cell.is_mine, "mine inside safe zone at {}", cell.id);
                } else {
                    assert!(cell.is_mine);
                }
            }
        }
    }

    #[test]
    fn placement_in_corner_clears_only_existing_neighbors() {
        let mut board = SquareGrid::new(9, 9);
        let mut rng = SmallRng::seed_from_u64(7);

        let placed = board.place_mines(81, Some(id((0, 0))), &mut rng);

        assert_eq!(placed, 77);
        assert_eq!(board.mine_count(), 77);
    }

    #[test]
    fn placement_caps_at_candidate_count() {
        let mut board = SquareGrid::new(3, 3);
        let mut rng = SmallRng::seed_from_u64(1);

        let placed = board.place_mines(5, Some(id((1, 1))), &mut rng);

        assert_eq!(placed, 0);
        assert_eq!(board.mine_count(), 0);
    }

    #[test]
    fn placement_without_exclusion_can_fill_board() {
        let mut board = SquareGrid::new(4, 4);
        let mut rng = SmallRng::seed_from_u64(3);

        assert_eq!(board.place_mines(16, None, &mut rng), 16);
        assert!(board.all_nodes().all(|cell| cell.is_mine));
    }

    #[test]
    fn placement_is_reproducible_per_seed() {
        let place = |seed| {
            let mut board = SquareGrid::new(16, 30);
            board.place_mines(99, Some(id((10, 10))), &mut SmallRng::seed_from_u64(seed));
            board
        };

        assert_eq!(place(42), place(42));
        assert_ne!(place(42), place(43));
    }

    #[test]
    fn adjacency_matches_mine_neighbors() {
        let mut board = SquareGrid::new(16, 16);
        board.place_mines(40, Some(id((0, 0))), &mut SmallRng::seed_from_u64(9));

        for cell in board.all_nodes().filter(|cell| !cell.is_mine) {
            let expected = board
                .all_nodes()
                .filter(|other| other.is_mine && chebyshev(other.coords(), cell.coords()) == 1)
                .count();
            assert_eq!(usize::from(cell.adjacent_mines), expected);
        }
    }

    #[test]
    fn open_number_reveals_single_cell() {
        let mut board = grid((3, 3), &[(0, 0)]);

        assert_eq!(board.open(id((1, 1))), RevealOutcome::Revealed);
        assert_eq!(revealed(&board), 1);
    }

    #[test]
    fn open_zero_floods_region_and_border() {
        // column 3 walls off the right side of the board
        let mut board = grid((5, 3), &[(3, 0), (3, 1), (3, 2)]);

        assert_eq!(board.open(id((0, 1))), RevealOutcome::Revealed);

        for cell in board.all_nodes() {
            assert_eq!(cell.is_revealed, cell.x <= 2, "unexpected state at {}", cell.id);
        }
        assert_eq!(board.node(id((2, 1))).unwrap().adjacent_mines, 3);
    }

    #[test]
    fn open_unmined_board_reveals_everything() {
        let mut board = SquareGrid::new(9, 9);

        board.open(id((4, 4)));

        assert_eq!(revealed(&board), 81);
        assert!(board.is_cleared());
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut board = SquareGrid::new(1, 5);
        board.toggle_flag(id((2, 0)));

        board.open(id((0, 0)));

        assert!(board.node(id((1, 0))).unwrap().is_revealed);
        assert!(!board.node(id((2, 0))).unwrap().is_revealed);
        assert!(!board.node(id((3, 0))).unwrap().is_revealed);
    }

    #[test]
    fn open_ignores_revealed_flagged_and_missing_cells() {
        let mut board = grid((3, 3), &[(0, 0)]);
        board.open(id((2, 2)));
        board.toggle_flag(id((0, 0)));

        assert_eq!(board.open(id((2, 2))), RevealOutcome::NoChange);
        assert_eq!(board.open(id((0, 0))), RevealOutcome::NoChange);
        assert_eq!(board.open(id((9, 9))), RevealOutcome::NoChange);
    }

    #[test]
    fn open_mine_reports_hit() {
        let mut board = grid((2, 2), &[(1, 1)]);

        assert_eq!(board.open(id((1, 1))), RevealOutcome::HitMine);
        assert!(board.node(id((1, 1))).unwrap().is_revealed);
        assert_eq!(revealed(&board), 1);
    }

    #[test]
    fn toggle_flag_twice_restores_cell() {
        let mut board = grid((3, 3), &[(0, 0)]);
        let before = board.clone();

        assert_eq!(board.toggle_flag(id((0, 0))), MarkOutcome::Changed);
        assert_eq!(board.flag_count(), 1);
        assert_eq!(board.toggle_flag(id((0, 0))), MarkOutcome::Changed);

        assert_eq!(board, before);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn toggle_flag_ignores_revealed_cell() {
        let mut board = grid((3, 3), &[(0, 0)]);
        board.open(id((1, 1)));

        assert_eq!(board.toggle_flag(id((1, 1))), MarkOutcome::NoChange);
        assert!(!board.node(id((1, 1))).unwrap().is_flagged);
    }

    #[test]
    fn chord_requires_exact_flag_count() {
        let mut board = grid((3, 3), &[(0, 1), (2, 1)]);
        board.open(id((1, 1)));
        board.toggle_flag(id((0, 1)));

        assert_eq!(board.chord(id((1, 1))), RevealOutcome::NoChange);
        assert_eq!(revealed(&board), 1);

        board.toggle_flag(id((2, 1)));
        board.toggle_flag(id((0, 0)));
        assert_eq!(board.chord(id((1, 1))), RevealOutcome::NoChange);

        board.toggle_flag(id((0, 0)));
        assert_eq!(board.chord(id((1, 1))), RevealOutcome::Revealed);
        assert_eq!(revealed(&board), 7);
        assert!(board.is_cleared());
    }

    #[test]
    fn chord_with_misplaced_flag_hits_mine() {
        let mut board = grid((3, 3), &[(0, 1)]);
        board.open(id((1, 1)));
        board.toggle_flag(id((2, 2)));

        assert_eq!(board.chord(id((1, 1))), RevealOutcome::HitMine);
        assert!(board.node(id((0, 1))).unwrap().is_revealed);
        assert!(!board.node(id((2, 2))).unwrap().is_revealed);
    }

    #[test]
    fn chord_ignores_hidden_and_zero_cells() {
        let mut board = grid((3, 1), &[(2, 0)]);

        assert_eq!(board.chord(id((1, 0))), RevealOutcome::NoChange);

        board.open(id((0, 0)));
        assert_eq!(board.node(id((0, 0))).unwrap().adjacent_mines, 0);
        assert_eq!(board.chord(id((0, 0))), RevealOutcome::NoChange);
    }

    #[test]
    fn reveal_all_mines_leaves_safe_cells() {
        let mut board = grid((3, 3), &[(0, 0), (2, 2)]);

        board.reveal_all_mines();

        for cell in board.all_nodes() {
            assert_eq!(cell.is_revealed, cell.is_mine);
        }
    }
}
