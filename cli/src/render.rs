use core::fmt::Write;

use sapper_core::*;

fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Mine => '*',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from_digit(u32::from(count), 10).unwrap_or('?'),
    }
}

/// One text line per row, top row first.
pub fn board(board: &SquareGrid) -> String {
    let mut text = String::with_capacity(board.total_cells() as usize + board.rows() as usize);
    for row in board.iter_rows() {
        text.extend(row.iter().map(|cell| glyph(cell.view())));
        text.push('\n');
    }
    text
}

pub fn summary(game: &Game) -> String {
    let settings = game.settings();
    let mut text = String::new();
    let _ = write!(
        text,
        "{:?} | {} {}x{} | mines left: {} | flags: {} | time: {}s",
        game.status(),
        game.difficulty(),
        settings.cols,
        settings.rows,
        game.mines_remaining(),
        game.flags_count(),
        game.elapsed_secs(),
    );
    text
}
