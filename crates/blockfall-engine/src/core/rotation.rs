use super::{
    board::Board,
    collision,
    piece::{Piece, Position},
};

/// Rotates `piece` a quarter turn about its centroid.
///
/// The rotation always turns the same way. The result is accepted only when
/// every cell stays inside the board columns, above the floor and off locked
/// cells; otherwise the original piece is returned unchanged. Rows above the
/// board are allowed. There is no kick search.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, BoardSize, Piece, PieceKind, rotate};
///
/// let board = Board::new(BoardSize::new(8, 16));
/// let piece = Piece::spawn(PieceKind::T, 4).translated(0.0, 6.0);
/// let mut turned = piece;
/// for _ in 0..4 {
///     turned = rotate(&turned, &board);
/// }
/// assert_eq!(turned, piece);
/// ```
#[must_use]
pub fn rotate(piece: &Piece, board: &Board) -> Piece {
    try_rotate(piece, board).unwrap_or(*piece)
}

/// Like [`rotate`], but returns `None` when the rotation is rejected.
#[must_use]
pub fn try_rotate(piece: &Piece, board: &Board) -> Option<Piece> {
    let candidate = rotated_about_centroid(piece);
    (!collision::is_colliding(&candidate, board)).then_some(candidate)
}

/// Maps every cell `(x, y)` to `(cx - (y - cy), cy + (x - cx))` without any
/// bounds check.
#[must_use]
pub fn rotated_about_centroid(piece: &Piece) -> Piece {
    let center = piece.centroid();
    piece.map_cells(|cell| {
        let dx = cell.x - center.x;
        let dy = cell.y - center.y;
        Position::new(center.x - dy, center.y + dx)
    })
}
