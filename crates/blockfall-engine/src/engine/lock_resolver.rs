//! Landing, lock delay, merge and line clear.
//!
//! A falling piece moves through three sub-states:
//!
//! ```text
//! Falling ──landed──▶ LockPending { landed_at } ──delay elapsed──▶ Locked
//!    ▲                        │
//!    └──────support lost──────┘
//! ```
//!
//! `landed_at` is recorded once, on the tick landing is first seen. Sliding
//! along the support keeps it; losing the support discards it.

use std::time::Duration;

use crate::core::{board::Board, piece::Piece};

/// Lock-delay sub-state of the falling piece.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LockState {
    #[default]
    Falling,
    LockPending {
        landed_at: Duration,
    },
}

impl LockState {
    /// Advances the sub-state for this tick and returns whether the piece
    /// must lock now.
    pub fn update(&mut self, landed: bool, now: Duration, lock_delay: Duration) -> bool {
        match (*self, landed) {
            (_, false) => *self = LockState::Falling,
            (LockState::Falling, true) => *self = LockState::LockPending { landed_at: now },
            (LockState::LockPending { .. }, true) => {}
        }
        match *self {
            LockState::LockPending { landed_at } => now.saturating_sub(landed_at) >= lock_delay,
            LockState::Falling => false,
        }
    }
}

/// Result of merging a piece into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LockOutcome {
    /// A locked cell reached the top row; nothing was cleared.
    ToppedOut,
    /// The piece locked and this many rows were cleared.
    Cleared(usize),
}

/// Merges `piece` into `board`, then either reports a top-out or clears full rows.
pub fn lock_piece(board: &mut Board, piece: &Piece) -> LockOutcome {
    board.fill_piece(piece);
    if board.touches_ceiling() {
        return LockOutcome::ToppedOut;
    }
    LockOutcome::Cleared(board.clear_lines())
}
