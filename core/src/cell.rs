use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Stable identity of a square cell, packed from its coordinates alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(u16);

impl CellId {
    pub const fn new((x, y): Coord2) -> Self {
        Self(((x as u16) << 8) | y as u16)
    }

    pub const fn coords(self) -> Coord2 {
        ((self.0 >> 8) as Coord, (self.0 & 0xff) as Coord)
    }

    pub const fn x(self) -> Coord {
        self.coords().0
    }

    pub const fn y(self) -> Coord {
        self.coords().1
    }
}

impl From<Coord2> for CellId {
    fn from(coords: Coord2) -> Self {
        Self::new(coords)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.coords();
        write!(f, "{},{}", x, y)
    }
}

impl FromStr for CellId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s.split_once(',').ok_or(GameError::InvalidCellId)?;
        let x = x.trim().parse().map_err(|_| GameError::InvalidCellId)?;
        let y = y.trim().parse().map_err(|_| GameError::InvalidCellId)?;
        Ok(Self::new((x, y)))
    }
}

/// One square of the board.
///
/// `adjacent_mines` is only meaningful when `!is_mine`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub x: Coord,
    pub y: Coord,
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn new((x, y): Coord2) -> Self {
        Self {
            id: CellId::new((x, y)),
            x,
            y,
            is_mine: false,
            is_revealed: false,
            is_flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    /// What the player is allowed to see of this cell.
    pub const fn view(&self) -> CellView {
        match (self.is_revealed, self.is_mine, self.is_flagged) {
            (true, true, _) => CellView::Mine,
            (true, false, _) => CellView::Revealed(self.adjacent_mines),
            (false, _, true) => CellView::Flagged,
            (false, _, false) => CellView::Hidden,
        }
    }
}

impl Node for Cell {
    type Id = CellId;

    fn id(&self) -> CellId {
        self.id
    }

    fn is_mine(&self) -> bool {
        self.is_mine
    }

    fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    fn set_mine(&mut self, is_mine: bool) {
        self.is_mine = is_mine;
    }

    fn set_revealed(&mut self, is_revealed: bool) {
        self.is_revealed = is_revealed;
    }

    fn set_flagged(&mut self, is_flagged: bool) {
        self.is_flagged = is_flagged;
    }

    fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }
}

/// Player-visible state of a cell, what a renderer draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_depends_only_on_coordinates() {
        assert_eq!(CellId::new((3, 7)), CellId::from((3, 7)));
        assert_ne!(CellId::new((3, 7)), CellId::new((7, 3)));
        assert_eq!(CellId::new((255, 0)).coords(), (255, 0));
        assert_eq!(CellId::new((0, 255)).coords(), (0, 255));
    }

    #[test]
    fn id_displays_and_parses_as_pair() {
        let id = CellId::new((12, 4));

        assert_eq!(id.to_string(), "12,4");
        assert_eq!("12,4".parse::<CellId>(), Ok(id));
        assert_eq!(" 12 , 4 ".parse::<CellId>(), Ok(id));
    }

    #[test]
    fn malformed_id_is_rejected() {
        assert_eq!("12".parse::<CellId>(), Err(GameError::InvalidCellId));
        assert_eq!("a,b".parse::<CellId>(), Err(GameError::InvalidCellId));
        assert_eq!("-1,0".parse::<CellId>(), Err(GameError::InvalidCellId));
        assert_eq!("300,0".parse::<CellId>(), Err(GameError::InvalidCellId));
    }

    #[test]
    fn view_hides_unrevealed_mines() {
        let mut cell = Cell::new((0, 0));
        cell.is_mine = true;
        assert_eq!(cell.view(), CellView::Hidden);

        cell.is_flagged = true;
        assert_eq!(cell.view(), CellView::Flagged);

        cell.is_revealed = true;
        assert_eq!(cell.view(), CellView::Mine);
    }

    #[test]
    fn view_shows_count_once_revealed() {
        let mut cell = Cell::new((1, 1));
        cell.adjacent_mines = 3;
        assert!(cell.view().is_unrevealed());

        cell.is_revealed = true;
        assert_eq!(cell.view(), CellView::Revealed(3));
    }
}
