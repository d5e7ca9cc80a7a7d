use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Number of cells in every piece.
pub const PIECE_CELLS: usize = 4;

/// Integer grid cell on the board.
///
/// Column 0 is the left wall side, row 0 is the top visible row and rows grow
/// downward. Rows may be negative for cells that are still above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self::new(self.col + dcol, self.row + drow)
    }
}

/// Continuously animated position of a single cell, in cell units.
///
/// A piece moves by fractions of a cell every tick; every geometric decision is
/// made on the [`snapped`](Self::snapped) grid cell instead.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds both coordinates down to the grid cell containing this position.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn snapped(self) -> GridPos {
        GridPos::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<GridPos> for Position {
    fn from(pos: GridPos) -> Self {
        Self::new(f64::from(pos.col), f64::from(pos.row))
    }
}

/// A falling piece: four cells sharing one kind.
///
/// Pieces are plain values. Movement and rotation return new `Piece` instances
/// and never touch the board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T, 4);
/// let lower = piece.translated(0.0, 1.0);
/// assert_eq!(lower.kind(), PieceKind::T);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    kind: PieceKind,
    cells: [Position; PIECE_CELLS],
}

impl Piece {
    /// Places `kind` with its pivot at `pivot_col`, lifted so that the lowest
    /// cell sits on row -1 and the whole piece starts above the board.
    #[must_use]
    pub fn spawn(kind: PieceKind, pivot_col: i32) -> Self {
        let offsets = kind.offsets();
        let max_dy = offsets.iter().map(|&(_, dy)| dy).max().unwrap_or(0);
        let cells = offsets.map(|(dx, dy)| {
            Position::from(GridPos::new(pivot_col + dx, dy - max_dy - 1))
        });
        Self { kind, cells }
    }

    #[must_use]
    pub const fn from_cells(kind: PieceKind, cells: [Position; PIECE_CELLS]) -> Self {
        Self { kind, cells }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn cells(&self) -> &[Position; PIECE_CELLS] {
        &self.cells
    }

    pub fn snapped_cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells.iter().map(|cell| cell.snapped())
    }

    /// Returns the arithmetic mean of the raw cell positions.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Position {
        let n = self.cells.len() as f64;
        let (sx, sy) = self
            .cells
            .iter()
            .fold((0.0, 0.0), |(sx, sy), cell| (sx + cell.x, sy + cell.y));
        Position::new(sx / n, sy / n)
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            kind: self.kind,
            cells: self.cells.map(|cell| cell.translated(dx, dy)),
        }
    }

    #[must_use]
    pub fn map_cells<F>(&self, f: F) -> Self
    where
        F: FnMut(Position) -> Position,
    {
        Self {
            kind: self.kind,
            cells: self.cells.map(f),
        }
    }
}

/// Enum representing the type of piece.
///
/// The kind is also the colour tag carried by every cell the piece leaves on
/// the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Square piece.
    O = 0,
    /// L-piece.
    L = 1,
    /// J-piece.
    J = 2,
    /// I-piece, four cells in a line.
    I = 3,
    /// Z-piece.
    Z = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::O,
            1 => PieceKind::L,
            2 => PieceKind::J,
            3 => PieceKind::I,
            4 => PieceKind::Z,
            5 => PieceKind::S,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
    ];

    /// Cell offsets `(dx, dy)` relative to the pivot.
    #[must_use]
    pub const fn offsets(self) -> [(i32, i32); PIECE_CELLS] {
        PIECE_OFFSETS[self as usize]
    }

    /// Smallest and largest horizontal offset of the shape.
    #[must_use]
    pub fn horizontal_extent(self) -> (i32, i32) {
        let offsets = self.offsets();
        let min = offsets.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
        let max = offsets.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
        (min, max)
    }
}

const PIECE_OFFSETS: [[(i32, i32); PIECE_CELLS]; PieceKind::LEN] = [
    // O-piece
    [(0, 0), (0, 1), (1, 0), (1, 1)],
    // L-piece
    [(0, 0), (1, 0), (2, 0), (0, 1)],
    // J-piece
    [(0, 0), (0, 1), (-1, 0), (-2, 0)],
    // I-piece
    [(0, 0), (0, 1), (0, 2), (0, 3)],
    // Z-piece
    [(0, 0), (-1, 0), (0, 1), (1, 1)],
    // S-piece
    [(0, 0), (1, 0), (0, 1), (-1, 1)],
    // T-piece
    [(0, 0), (-1, 0), (1, 0), (0, 1)],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapped_rounds_down() {
        assert_eq!(Position::new(2.5, 3.99).snapped(), GridPos::new(2, 3));
        assert_eq!(Position::new(0.0, -0.5).snapped(), GridPos::new(0, -1));
        assert_eq!(Position::new(-0.25, -2.0).snapped(), GridPos::new(-1, -2));
    }

    #[test]
    fn test_spawn_starts_above_board() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind, 4);
            let max_row = piece.snapped_cells().map(|pos| pos.row).max().unwrap();
            assert_eq!(max_row, -1, "{kind:?} should rest its lowest cell on row -1");
        }
    }

    #[test]
    fn test_spawn_i_piece_fully_hidden() {
        let piece = Piece::spawn(PieceKind::I, 4);
        let rows: Vec<_> = piece.snapped_cells().map(|pos| pos.row).collect();
        assert_eq!(rows, vec![-4, -3, -2, -1]);
        assert!(piece.snapped_cells().all(|pos| pos.col == 4));
    }

    #[test]
    fn test_centroid() {
        let piece = Piece::spawn(PieceKind::O, 3);
        assert_eq!(piece.centroid(), Position::new(3.5, -1.5));
    }

    #[test]
    fn test_horizontal_extent() {
        assert_eq!(PieceKind::J.horizontal_extent(), (-2, 0));
        assert_eq!(PieceKind::L.horizontal_extent(), (0, 2));
        assert_eq!(PieceKind::I.horizontal_extent(), (0, 0));
    }
}
