use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Playing, on the first reveal
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> Ready, on reset or difficulty change
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No mines placed yet
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Whether reveal and flag moves are accepted.
    pub const fn accepts_moves(self) -> bool {
        matches!(self, Self::Ready | Self::Playing)
    }
}

/// One game session: board, status, settings and clock.
///
/// Mines are placed on the first reveal, around the revealed cell, so the
/// first click is always safe. Illegal moves are ignored and report
/// `NoChange`.
#[derive(Clone, Debug)]
pub struct Game<G: Grid = SquareGrid> {
    board_state: BoardState<G>,
    status: GameStatus,
    difficulty: Difficulty,
    settings: GameSettings,
    mines_count: CellCount,
    timer: Timer,
    first_click: bool,
    rng: SmallRng,
}

impl<G: Grid> Game<G> {
    /// New game with a random seed. `custom` is required for
    /// [`Difficulty::Custom`] and ignored otherwise.
    pub fn new(difficulty: Difficulty, custom: Option<GameSettings>) -> Result<Self> {
        Self::with_seed(difficulty, custom, rand::random())
    }

    /// New game whose mine layouts are fully determined by `seed`.
    pub fn with_seed(
        difficulty: Difficulty,
        custom: Option<GameSettings>,
        seed: u64,
    ) -> Result<Self> {
        let settings = difficulty.resolve(custom)?;
        log::debug!("New {} game {:?}, seed: {}", difficulty, settings, seed);
        Ok(Self {
            board_state: BoardState::new(board::create_board(&settings)),
            status: GameStatus::Ready,
            difficulty,
            settings,
            mines_count: settings.mines,
            timer: Timer::default(),
            first_click: true,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn from_preferences(preferences: &Preferences) -> Result<Self> {
        let difficulty = preferences.difficulty;
        match preferences.seed {
            Some(seed) => Self::with_seed(difficulty, preferences.custom, seed),
            None => Self::new(difficulty, preferences.custom),
        }
    }

    pub fn board(&self) -> &G {
        &self.board_state.board
    }

    pub fn board_state(&self) -> &BoardState<G> {
        &self.board_state
    }

    pub fn cell(&self, id: impl Into<NodeId<G>>) -> Option<&G::Node> {
        self.board().node(id.into())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn total_mines(&self) -> CellCount {
        self.mines_count
    }

    pub fn flags_count(&self) -> CellCount {
        self.board_state.flags_count
    }

    /// Mines not yet accounted for by a flag, never below zero.
    pub fn mines_remaining(&self) -> CellCount {
        self.mines_count.saturating_sub(self.flags_count())
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// One-second clock tick, counted only while playing.
    pub fn tick(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => self.timer.tick(),
            _ => false,
        }
    }

    pub fn reveal_cell(&mut self, id: impl Into<NodeId<G>>) -> RevealOutcome {
        let id = id.into();
        if !self.status.accepts_moves() {
            return RevealOutcome::NoChange;
        }

        match self.board().node(id) {
            Some(cell) if !cell.is_revealed() && !cell.is_flagged() => {}
            _ => return RevealOutcome::NoChange,
        }

        if self.first_click {
            let seed = self.rng.random();
            self.dispatch(BoardAction::PlaceMines {
                exclude: id,
                count: self.mines_count,
                seed,
            });
            self.first_click = false;
            self.set_status(GameStatus::Playing);
        }

        let outcome = self
            .dispatch(BoardAction::RevealCell(id))
            .unwrap_or(RevealOutcome::NoChange);
        self.settle(outcome);
        outcome
    }

    pub fn toggle_flag(&mut self, id: impl Into<NodeId<G>>) -> MarkOutcome {
        let id = id.into();
        if !self.status.accepts_moves() {
            return MarkOutcome::NoChange;
        }

        match self.board().node(id) {
            Some(cell) if !cell.is_revealed() => {}
            _ => return MarkOutcome::NoChange,
        }

        self.dispatch(BoardAction::ToggleFlag(id));
        MarkOutcome::Changed
    }

    /// Opens the neighbors of a revealed number once exactly that many of
    /// them are flagged.
    pub fn chord_cell(&mut self, id: impl Into<NodeId<G>>) -> RevealOutcome {
        let id = id.into();
        if self.status != GameStatus::Playing {
            return RevealOutcome::NoChange;
        }

        let outcome = self
            .dispatch(BoardAction::ChordCell(id))
            .unwrap_or(RevealOutcome::NoChange);
        self.settle(outcome);
        outcome
    }

    /// Fresh unmined board with the current settings.
    pub fn reset_game(&mut self) {
        let board = board::create_board(&self.settings);
        self.dispatch(BoardAction::InitializeBoard(board));
        self.first_click = true;
        self.mines_count = self.settings.mines;
        self.set_status(GameStatus::Ready);
        self.timer.reset(0);
    }

    /// Switches settings and resets. Leaves the game untouched when the
    /// settings can't be resolved.
    pub fn change_difficulty(
        &mut self,
        difficulty: Difficulty,
        custom: Option<GameSettings>,
    ) -> Result<()> {
        let settings = difficulty.resolve(custom)?;
        log::debug!("Difficulty {} -> {} {:?}", self.difficulty, difficulty, settings);
        self.difficulty = difficulty;
        self.settings = settings;
        self.mines_count = settings.mines;
        self.reset_game();
        Ok(())
    }

    fn dispatch(&mut self, action: BoardAction<G>) -> Option<RevealOutcome> {
        let update = board_reducer(&self.board_state, action);
        self.board_state = update.state;
        update.result
    }

    fn settle(&mut self, outcome: RevealOutcome) {
        match outcome {
            RevealOutcome::HitMine => self.set_status(GameStatus::Lost),
            RevealOutcome::Won => self.set_status(GameStatus::Won),
            RevealOutcome::NoChange | RevealOutcome::Revealed => {}
        }
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status == status {
            return;
        }

        log::debug!("Status {:?} -> {:?}", self.status, status);
        self.status = status;
        match status {
            GameStatus::Playing => self.timer.start(),
            GameStatus::Won | GameStatus::Lost => self.timer.stop(),
            GameStatus::Ready => self.timer.reset(0),
        }
    }
}
