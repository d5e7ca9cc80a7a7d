//! Game engine logic and state management.
//!
//! This module drives the [`core`](crate::core) geometry over time:
//!
//! - [`GameSession`] - The state machine advanced once per tick
//! - [`InputSignals`] - Commands sampled for a single tick
//! - [`LockState`] - Lock-delay sub-state of the falling piece
//! - [`PieceGenerator`] - Random piece kind and spawn column
//! - [`GameStats`] - Score, cleared lines and play time
//!
//! # Game Flow
//!
//! 1. A piece spawns above the board, a few columns left of center
//! 2. Each tick applies slide, rotation, gravity and hard drop in that order
//! 3. Once landed, the piece locks after the lock delay unless it loses support
//! 4. Full rows are cleared and a new piece spawns
//! 5. A lock that leaves a cell on the top row ends the game
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{GameConfig, GameSession, InputSignals, TickEvent};
//!
//! let mut session = GameSession::new(GameConfig::default()).unwrap();
//! let drop = InputSignals {
//!     soft_drop: true,
//!     hard_drop: true,
//!     ..InputSignals::NONE
//! };
//!
//! let mut now = Duration::ZERO;
//! loop {
//!     let event = session.tick(&drop, now);
//!     now += Duration::from_millis(50);
//!     if event.is_locked() {
//!         break;
//!     }
//! }
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{game_session::*, game_stats::*, input::*, lock_resolver::*, piece_generator::*};

mod game_session;
mod game_stats;
mod input;
mod lock_resolver;
mod piece_generator;
