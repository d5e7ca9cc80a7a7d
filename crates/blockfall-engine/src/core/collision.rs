//! Cell-exact collision tests between a piece and the board.
//!
//! Every test works on the piece's snapped cells, so a piece that is halfway
//! between two rows is judged by the row its cells are drawn in.

use super::{board::Board, piece::Piece};

/// Horizontal slide direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Returns whether `piece` may slide one step towards `direction`.
///
/// A piece touching the wall on that side is rejected outright; otherwise the
/// snapped piece is shifted one column and checked against locked cells.
#[must_use]
pub fn can_slide(piece: &Piece, board: &Board, direction: Direction) -> bool {
    let last_col = board.size().width() - 1;
    let at_wall = piece.snapped_cells().any(|pos| match direction {
        Direction::Left => pos.col <= 0,
        Direction::Right => pos.col >= last_col,
    });
    if at_wall {
        return false;
    }
    !piece
        .snapped_cells()
        .any(|pos| board.is_occupied(pos.offset(direction.dx(), 0)))
}

/// Returns whether `piece` cannot advance one more row.
#[must_use]
pub fn is_landed(piece: &Piece, board: &Board) -> bool {
    let height = board.size().height();
    piece.snapped_cells().any(|pos| {
        let below = pos.offset(0, 1);
        below.row >= height || board.is_occupied(below)
    })
}

/// Returns whether every cell of `piece` has entered the visible board.
#[must_use]
pub fn is_fully_visible(piece: &Piece) -> bool {
    piece.snapped_cells().all(|pos| pos.row >= 0)
}

/// Returns whether `piece` leaves the board sideways or through the floor, or
/// overlaps a locked cell.
///
/// Rows above the board are not bounded, so a piece still entering from above
/// never collides with the ceiling.
#[must_use]
pub fn is_colliding(piece: &Piece, board: &Board) -> bool {
    let size = board.size();
    piece.snapped_cells().any(|pos| {
        !size.contains_col(pos.col) || pos.row >= size.height() || board.is_occupied(pos)
    })
}
