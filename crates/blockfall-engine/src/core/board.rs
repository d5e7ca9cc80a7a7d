use std::{collections::BTreeMap, mem};

use serde::{Deserialize, Serialize};

use super::piece::{GridPos, Piece, PieceKind};

/// Board dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub cols: u16,
    pub rows: u16,
}

impl BoardSize {
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    #[must_use]
    pub fn width(self) -> i32 {
        i32::from(self.cols)
    }

    #[must_use]
    pub fn height(self) -> i32 {
        i32::from(self.rows)
    }

    /// Column the spawn pivot is measured from.
    #[must_use]
    pub fn center_col(self) -> i32 {
        self.width() / 2
    }

    #[must_use]
    pub fn contains_col(self, col: i32) -> bool {
        (0..self.width()).contains(&col)
    }
}

/// Locked cells keyed by grid position.
///
/// The board only stores cells that have been merged from landed pieces; the
/// falling piece is tracked separately by the session. Keying by position
/// keeps two locked cells from ever sharing a grid cell.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, BoardSize, GridPos, PieceKind};
///
/// let mut board = Board::new(BoardSize::new(8, 16));
/// for col in 0..8 {
///     board.fill_cell(GridPos::new(col, 15), PieceKind::I);
/// }
/// assert_eq!(board.clear_lines(), 1);
/// assert!(board.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardSnapshot", from = "BoardSnapshot")]
pub struct Board {
    size: BoardSize,
    cells: BTreeMap<GridPos, PieceKind>,
}

impl Board {
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    #[must_use]
    pub fn cell(&self, pos: GridPos) -> Option<PieceKind> {
        self.cells.get(&pos).copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = (GridPos, PieceKind)> + '_ {
        self.cells.iter().map(|(pos, kind)| (*pos, *kind))
    }

    pub fn fill_cell(&mut self, pos: GridPos, kind: PieceKind) {
        self.cells.insert(pos, kind);
    }

    /// Snaps every cell of `piece` to the grid and locks it with the piece's kind.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for pos in piece.snapped_cells() {
            let previous = self.cells.insert(pos, piece.kind());
            debug_assert!(previous.is_none(), "locked cell overwritten at {pos:?}");
        }
    }

    /// Returns whether any locked cell sits on the top row or above it.
    #[must_use]
    pub fn touches_ceiling(&self) -> bool {
        self.cells.keys().any(|pos| pos.row <= 0)
    }

    /// Rows inside the board whose every column is occupied, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> Vec<i32> {
        let cols = usize::from(self.size.cols);
        (0..self.size.height())
            .filter(|&row| self.cells.keys().filter(|pos| pos.row == row).count() == cols)
            .collect()
    }

    /// Clears full rows and returns the number of rows cleared.
    ///
    /// Each remaining cell falls by the number of cleared rows below it, so the
    /// stack collapses into the gaps. Cells below every cleared row stay put.
    pub fn clear_lines(&mut self) -> usize {
        let full_rows = self.full_rows();
        if full_rows.is_empty() {
            return 0;
        }

        let cells = mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|(pos, _)| !full_rows.contains(&pos.row))
            .map(|(pos, kind)| {
                let drop = full_rows.iter().filter(|&&row| row > pos.row).count();
                (pos.offset(0, row_count(drop)), kind)
            })
            .collect();
        full_rows.len()
    }

    /// Removes every locked cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn row_count(n: usize) -> i32 {
    // bounded by the board height, which is a u16
    n as i32
}

/// Serialized form of a [`Board`]: its size and a flat list of locked cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: BoardSize,
    pub cells: Vec<LockedCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedCell {
    pub col: i32,
    pub row: i32,
    pub kind: PieceKind,
}

impl From<Board> for BoardSnapshot {
    fn from(board: Board) -> Self {
        let cells = board
            .cells()
            .map(|(pos, kind)| LockedCell {
                col: pos.col,
                row: pos.row,
                kind,
            })
            .collect();
        Self {
            size: board.size,
            cells,
        }
    }
}

impl From<BoardSnapshot> for Board {
    fn from(snapshot: BoardSnapshot) -> Self {
        let mut board = Board::new(snapshot.size);
        for cell in snapshot.cells {
            board.fill_cell(GridPos::new(cell.col, cell.row), cell.kind);
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLS: u16 = 8;
    const ROWS: u16 = 16;

    fn board() -> Board {
        Board::new(BoardSize::new(COLS, ROWS))
    }

    fn fill_row(board: &mut Board, row: i32) {
        for col in 0..i32::from(COLS) {
            board.fill_cell(GridPos::new(col, row), PieceKind::I);
        }
    }

    fn row_len(board: &Board, row: i32) -> usize {
        board.cells().filter(|(pos, _)| pos.row == row).count()
    }

    #[test]
    fn test_clear_lines_without_full_row_is_noop() {
        let mut board = board();
        for col in 0..i32::from(COLS) - 1 {
            board.fill_cell(GridPos::new(col, 15), PieceKind::T);
        }
        board.fill_cell(GridPos::new(3, 14), PieceKind::S);
        let before = board.clone();

        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_single_row_drops_row_above() {
        let mut board = board();
        let r = 12;
        fill_row(&mut board, r);
        board.fill_cell(GridPos::new(0, r - 1), PieceKind::L);
        board.fill_cell(GridPos::new(3, r - 1), PieceKind::Z);
        board.fill_cell(GridPos::new(7, r - 1), PieceKind::T);

        assert_eq!(board.clear_lines(), 1);
        assert_eq!(row_len(&board, r - 1), 0);
        assert_eq!(board.len(), 3);
        assert_eq!(board.cell(GridPos::new(0, r)), Some(PieceKind::L));
        assert_eq!(board.cell(GridPos::new(3, r)), Some(PieceKind::Z));
        assert_eq!(board.cell(GridPos::new(7, r)), Some(PieceKind::T));
    }

    #[test]
    fn test_cells_below_cleared_rows_stay() {
        let mut board = board();
        fill_row(&mut board, 10);
        board.fill_cell(GridPos::new(2, 11), PieceKind::O);
        board.fill_cell(GridPos::new(2, 15), PieceKind::O);

        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.cell(GridPos::new(2, 11)), Some(PieceKind::O));
        assert_eq!(board.cell(GridPos::new(2, 15)), Some(PieceKind::O));
    }

    #[test]
    fn test_clear_separated_rows() {
        let mut board = board();
        fill_row(&mut board, 15);
        fill_row(&mut board, 13);
        board.fill_cell(GridPos::new(1, 14), PieceKind::J);
        board.fill_cell(GridPos::new(4, 12), PieceKind::S);
        board.fill_cell(GridPos::new(5, 9), PieceKind::Z);

        assert_eq!(board.full_rows(), vec![13, 15]);
        assert_eq!(board.clear_lines(), 2);

        // one cleared row below row 14, two below rows 12 and 9
        assert_eq!(board.cell(GridPos::new(1, 15)), Some(PieceKind::J));
        assert_eq!(board.cell(GridPos::new(4, 14)), Some(PieceKind::S));
        assert_eq!(board.cell(GridPos::new(5, 11)), Some(PieceKind::Z));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_touches_ceiling() {
        let mut board = board();
        board.fill_cell(GridPos::new(0, 1), PieceKind::T);
        assert!(!board.touches_ceiling());
        board.fill_cell(GridPos::new(4, 0), PieceKind::T);
        assert!(board.touches_ceiling());

        let mut board = self::board();
        board.fill_cell(GridPos::new(4, -1), PieceKind::I);
        assert!(board.touches_ceiling());
    }

    #[test]
    fn test_fill_piece_snaps_cells() {
        let mut board = board();
        let piece = Piece::spawn(PieceKind::O, 3).translated(0.5, 5.75);
        board.fill_piece(&piece);

        let cells: Vec<_> = board.cells().map(|(pos, _)| pos).collect();
        assert_eq!(
            cells,
            vec![
                GridPos::new(3, 3),
                GridPos::new(3, 4),
                GridPos::new(4, 3),
                GridPos::new(4, 4),
            ]
        );
    }

    #[test]
    fn test_board_serialization() {
        let mut board = board();
        board.fill_cell(GridPos::new(1, 15), PieceKind::S);
        board.fill_cell(GridPos::new(2, 15), PieceKind::Z);

        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(
            serialized,
            r#"{"size":{"cols":8,"rows":16},"cells":[{"col":1,"row":15,"kind":"S"},{"col":2,"row":15,"kind":"Z"}]}"#
        );

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
    }
}
