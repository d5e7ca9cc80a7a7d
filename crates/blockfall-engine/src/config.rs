use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BoardSize, ConfigError, PieceKind, engine::MAX_SPAWN_JITTER};

/// Tunable parameters of a game.
///
/// Distances are in cells, durations in seconds. All fields have defaults, so a
/// config file only needs to name the values it changes.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "rows": 20 }"#).unwrap();
/// assert_eq!(config.cols, 8);
/// assert_eq!(config.rows, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub cols: u16,
    pub rows: u16,
    /// Grace period between landing and locking.
    pub lock_delay_secs: f64,
    /// Minimum time between two successful rotations of the same piece.
    pub rotation_cooldown_secs: f64,
    /// Rows the piece falls every tick.
    pub fall_step: f64,
    /// Extra rows per tick while soft drop is held.
    pub soft_drop_step: f64,
    /// Columns moved by one slide.
    pub slide_step: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: 8,
            rows: 16,
            lock_delay_secs: 0.25,
            rotation_cooldown_secs: 0.2,
            fall_step: 1.0 / 16.0,
            soft_drop_step: 0.5,
            slide_step: 0.5,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn board_size(&self) -> BoardSize {
        BoardSize::new(self.cols, self.rows)
    }

    #[must_use]
    pub fn lock_delay(&self) -> Duration {
        Duration::from_secs_f64(self.lock_delay_secs)
    }

    #[must_use]
    pub fn rotation_cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.rotation_cooldown_secs)
    }

    /// Checks that the configuration describes a playable board.
    ///
    /// Called by [`GameSession::new`](crate::GameSession::new) before the first
    /// tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyBoard {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if !spawn_fits(self.board_size()) {
            return Err(ConfigError::BoardTooNarrow {
                cols: self.cols,
                min_cols: min_spawn_cols(),
            });
        }

        check_duration("lock_delay_secs", self.lock_delay_secs)?;
        check_duration("rotation_cooldown_secs", self.rotation_cooldown_secs)?;

        check_step("fall_step", self.fall_step, f64::MIN_POSITIVE)?;
        check_step("soft_drop_step", self.soft_drop_step, 0.0)?;
        check_step("slide_step", self.slide_step, f64::MIN_POSITIVE)?;
        if self.slide_step > 1.0 {
            return Err(ConfigError::InvalidStep {
                name: "slide_step",
                value: self.slide_step,
            });
        }
        if self.fall_step + self.soft_drop_step >= 1.0 {
            return Err(ConfigError::FallTooFast {
                fall_step: self.fall_step,
                soft_drop_step: self.soft_drop_step,
            });
        }
        Ok(())
    }
}

/// Accepts any non-negative number of seconds that a [`Duration`] can hold.
fn check_duration(name: &'static str, secs: f64) -> Result<(), ConfigError> {
    match Duration::try_from_secs_f64(secs) {
        Ok(_) => Ok(()),
        Err(_) => Err(ConfigError::InvalidDuration { name, secs }),
    }
}

fn check_step(name: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ConfigError::InvalidStep { name, value })
    }
}

/// Returns whether every piece kind fits horizontally at every spawn jitter.
fn spawn_fits(size: BoardSize) -> bool {
    PieceKind::ALL.iter().all(|kind| {
        let (min_dx, max_dx) = kind.horizontal_extent();
        (0..=MAX_SPAWN_JITTER).all(|jitter| {
            let pivot = size.center_col() - jitter;
            size.contains_col(pivot + min_dx) && size.contains_col(pivot + max_dx)
        })
    })
}

fn min_spawn_cols() -> u16 {
    (1..=u16::MAX)
        .find(|&cols| spawn_fits(BoardSize::new(cols, 1)))
        .unwrap_or(u16::MAX)
}
