pub use self::{config::*, core::*, engine::*};

mod config;
pub mod core;
pub mod engine;

/// Reasons a [`GameConfig`] cannot start a game.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must have at least one column and one row (got {cols}x{rows})")]
    EmptyBoard { cols: u16, rows: u16 },
    #[display("board is {cols} columns wide, but spawning pieces needs at least {min_cols}")]
    BoardTooNarrow { cols: u16, min_cols: u16 },
    #[display("{name} must be a finite, non-negative number of seconds (got {secs})")]
    InvalidDuration { name: &'static str, secs: f64 },
    #[display("{name} is out of range (got {value})")]
    InvalidStep { name: &'static str, value: f64 },
    #[display(
        "fall_step + soft_drop_step must be less than one row (got {fall_step} + {soft_drop_step})"
    )]
    FallTooFast { fall_step: f64, soft_drop_step: f64 },
}
