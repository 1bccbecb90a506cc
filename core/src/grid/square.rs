use ndarray::{ArcArray2, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular board of `rows × cols` square cells, stored row by row.
///
/// Cells live in a shared copy-on-write array: cloning a grid is O(1) and the
/// first mutation of a clone copies the cells, so an older snapshot never
/// observes later changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArcArray2<Cell>", into = "ArcArray2<Cell>")]
pub struct SquareGrid {
    cells: ArcArray2<Cell>,
}

impl SquareGrid {
    /// Unmined board of `rows` rows by `cols` columns.
    pub fn new(rows: Coord, cols: Coord) -> Self {
        let cells = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |(y, x)| {
            Cell::new((x as Coord, y as Coord))
        });
        Self {
            cells: cells.into_shared(),
        }
    }

    /// Board of `size = (cols, rows)` with mines on exactly `mine_coords`.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let (cols, rows) = size;
        let mut grid = Self::new(rows, cols);

        for &coords in mine_coords {
            let cell = grid
                .node_mut(CellId::new(coords))
                .ok_or(GameError::InvalidBoardShape)?;
            cell.is_mine = true;
        }
        grid.recount_adjacent_mines();

        Ok(grid)
    }

    pub fn rows(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    pub fn cols(&self) -> Coord {
        self.cells.ncols() as Coord
    }

    /// Board size as `(cols, rows)`.
    pub fn size(&self) -> Coord2 {
        (self.cols(), self.rows())
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.cols(), self.rows())
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    /// Rows of cells, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.axis_iter(Axis(0))
    }

    /// Whether both grids still share the same cell storage.
    pub fn is_same_snapshot(&self, other: &Self) -> bool {
        self.cells.as_ptr() == other.cells.as_ptr()
    }
}

impl Grid for SquareGrid {
    type Node = Cell;

    fn generate(settings: &GameSettings) -> Self {
        Self::new(settings.rows, settings.cols)
    }

    fn node(&self, id: CellId) -> Option<&Cell> {
        self.cell_at(id.coords())
    }

    fn node_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.coords().to_nd_index())
    }

    fn adjacent_ids(&self, id: CellId) -> Neighbors<CellId> {
        if !self.contains(id) {
            return Neighbors::new();
        }
        NeighborIter::new(id.coords(), self.size())
            .map(CellId::new)
            .collect()
    }

    fn all_nodes(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    fn all_nodes_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }
}

impl TryFrom<ArcArray2<Cell>> for SquareGrid {
    type Error = GameError;

    fn try_from(cells: ArcArray2<Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if rows > Coord::MAX.into() || cols > Coord::MAX.into() {
            return Err(GameError::InvalidBoardShape);
        }

        let consistent = cells.indexed_iter().all(|((y, x), cell)| {
            let coords = (x as Coord, y as Coord);
            cell.coords() == coords && cell.id == CellId::new(coords)
        });
        if !consistent {
            return Err(GameError::InvalidBoardShape);
        }

        Ok(Self { cells })
    }
}

impl From<SquareGrid> for ArcArray2<Cell> {
    fn from(grid: SquareGrid) -> Self {
        grid.cells
    }
}
