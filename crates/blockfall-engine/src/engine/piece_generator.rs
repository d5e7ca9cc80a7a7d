use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BoardSize, Piece, PieceKind};

/// Largest number of cells a piece may spawn left of the board center.
pub const MAX_SPAWN_JITTER: i32 = 2;

/// Produces the next piece at spawn.
///
/// Each piece has a uniformly random kind and is shifted 0, 1 or 2 cells left
/// of the board center, so pieces do not always fall down the same column.
///
/// # Example
///
/// ```
/// use blockfall_engine::{BoardSize, PieceGenerator, is_fully_visible};
///
/// let seed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut generator = PieceGenerator::with_seed(seed);
/// let piece = generator.generate(BoardSize::new(8, 16));
/// assert!(!is_fully_visible(&piece));
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl PieceGenerator {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    pub fn generate(&mut self, size: BoardSize) -> Piece {
        let kind: PieceKind = self.rng.random();
        let jitter = self.rng.random_range(0..=MAX_SPAWN_JITTER);
        Piece::spawn(kind, size.center_col() - jitter)
    }
}

/// Seed for deterministic piece generation.
///
/// Serialized as 32 lowercase hex digits, the same form [`FromStr`] accepts.
///
/// ```
/// use blockfall_engine::PieceSeed;
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// assert_eq!(seed.to_string(), "000102030405060708090a0b0c0d0e0f");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex(self))
    }
}

fn hex(seed: &PieceSeed) -> String {
    let num = u128::from_be_bytes(seed.0);
    let mut hex_str = String::with_capacity(2 * seed.0.len());
    // writing to a String cannot fail
    let _ = write!(&mut hex_str, "{num:032x}");
    hex_str
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece seed {input:?}: expected 32 hex digits")]
pub struct ParsePieceSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParsePieceSeedError {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex(self))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::collision::is_fully_visible;

    const SIZE: BoardSize = BoardSize::new(8, 16);

    fn seed() -> PieceSeed {
        "0123456789abcdef0123456789abcdef".parse().unwrap()
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = PieceGenerator::with_seed(seed());
        let mut b = PieceGenerator::with_seed(seed());
        for _ in 0..50 {
            assert_eq!(a.generate(SIZE), b.generate(SIZE));
        }
    }

    #[test]
    fn test_generated_pieces_spawn_above_board_inside_columns() {
        let mut generator = PieceGenerator::with_seed(seed());
        for _ in 0..500 {
            let piece = generator.generate(SIZE);
            assert!(!is_fully_visible(&piece));
            assert!(piece.snapped_cells().all(|pos| pos.row < 0));
            assert!(piece.snapped_cells().all(|pos| SIZE.contains_col(pos.col)));
        }
    }

    #[test]
    fn test_all_kinds_and_jitters_generated() {
        let mut generator = PieceGenerator::with_seed(seed());
        let mut kinds = HashSet::new();
        let mut pivots = HashSet::new();
        for _ in 0..1000 {
            let piece = generator.generate(SIZE);
            kinds.insert(piece.kind());
            // the first offset of every shape is the pivot itself
            pivots.insert(piece.snapped_cells().next().unwrap().col);
        }
        assert_eq!(kinds.len(), PieceKind::LEN);
        assert_eq!(pivots, HashSet::from([2, 3, 4]));
    }

    #[test]
    fn test_seed_serialization() {
        let seed = seed();
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdef0123456789abcdef\"");
        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_parse_errors() {
        assert!("0123".parse::<PieceSeed>().is_err());
        assert!("0123456789abcdef0123456789abcdeg".parse::<PieceSeed>().is_err());
        assert!(serde_json::from_str::<PieceSeed>("\"xyz\"").is_err());
    }
}
