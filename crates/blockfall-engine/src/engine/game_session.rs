use std::time::Duration;

use crate::{
    ConfigError, GameConfig,
    core::{
        board::Board,
        collision::{self, Direction},
        piece::{GridPos, Piece, PieceKind},
        rotation,
    },
};

use super::{
    game_stats::GameStats,
    input::InputSignals,
    lock_resolver::{self, LockOutcome, LockState},
    piece_generator::{PieceGenerator, PieceSeed},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// What happened during one [`GameSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickEvent {
    /// Nothing locked and the state did not change.
    Idle,
    /// The falling piece locked and a new one spawned.
    Locked { cleared_lines: usize },
    /// The locked piece reached the top row. Carries the final score.
    GameOver { final_score: usize },
    /// A new game started from the game-over screen.
    Restarted,
}

/// The piece under player control plus its per-piece timers.
#[derive(Debug, Clone, Copy)]
struct FallingPiece {
    piece: Piece,
    lock: LockState,
    last_rotation: Option<Duration>,
}

impl FallingPiece {
    fn new(piece: Piece) -> Self {
        Self {
            piece,
            lock: LockState::Falling,
            last_rotation: None,
        }
    }

    fn can_rotate(&self, now: Duration, cooldown: Duration) -> bool {
        self.last_rotation
            .is_none_or(|at| now.saturating_sub(at) >= cooldown)
    }
}

/// A game from the first spawn to game over, and across restarts.
///
/// The session owns the board, the falling piece, the random source and every
/// timer, and mutates them only in [`tick`](Self::tick). Time is passed in by
/// the caller as a monotonic timestamp, so gameplay timing does not depend on
/// how often `tick` is called.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, GameSession, InputSignals};
///
/// let mut session = GameSession::new(GameConfig::default()).unwrap();
/// let input = InputSignals {
///     soft_drop: true,
///     ..InputSignals::NONE
/// };
/// for tick in 0..20 {
///     session.tick(&input, Duration::from_millis(tick * 50));
/// }
/// assert!(session.session_state().is_playing());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    falling: FallingPiece,
    generator: PieceGenerator,
    seed: PieceSeed,
    stats: GameStats,
    session_state: SessionState,
    started_at: Option<Duration>,
}

impl GameSession {
    /// Creates a session with a random seed.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::random())
    }

    /// Like [`Self::new`], but with a specific seed for the piece sequence.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut generator = PieceGenerator::with_seed(seed);
        let board = Board::new(config.board_size());
        let falling = FallingPiece::new(generator.generate(board.size()));
        Ok(Self {
            config,
            board,
            falling,
            generator,
            seed,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            started_at: None,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// The piece under player control, or `None` once the game is over.
    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.session_state
            .is_playing()
            .then_some(&self.falling.piece)
    }

    #[must_use]
    pub fn lock_state(&self) -> LockState {
        self.falling.lock
    }

    /// Cells to draw this frame: locked cells first, then the falling piece.
    pub fn render_cells(&self) -> impl Iterator<Item = (GridPos, PieceKind)> + '_ {
        let falling = self
            .falling_piece()
            .into_iter()
            .flat_map(|piece| piece.snapped_cells().map(|pos| (pos, piece.kind())));
        self.board.cells().chain(falling)
    }

    /// Runs one simulation step with the input sampled for this tick.
    pub fn tick(&mut self, input: &InputSignals, now: Duration) -> TickEvent {
        match self.session_state {
            SessionState::Playing => self.step(input, now),
            SessionState::GameOver if input.restart => {
                self.restart(now);
                TickEvent::Restarted
            }
            SessionState::GameOver => TickEvent::Idle,
        }
    }

    fn step(&mut self, input: &InputSignals, now: Duration) -> TickEvent {
        let started_at = *self.started_at.get_or_insert(now);
        self.stats.set_duration(now.saturating_sub(started_at));

        self.apply_slide(input);
        self.apply_rotation(input, now);
        self.apply_gravity(input);
        self.apply_hard_drop(input);

        let landed = collision::is_landed(&self.falling.piece, &self.board);
        let lock_delay = self.config.lock_delay();
        if !self.falling.lock.update(landed, now, lock_delay) {
            return TickEvent::Idle;
        }

        match lock_resolver::lock_piece(&mut self.board, &self.falling.piece) {
            LockOutcome::ToppedOut => {
                self.session_state = SessionState::GameOver;
                TickEvent::GameOver {
                    final_score: self.stats.score(),
                }
            }
            LockOutcome::Cleared(cleared_lines) => {
                self.stats.complete_piece_drop(cleared_lines);
                self.spawn_piece();
                TickEvent::Locked { cleared_lines }
            }
        }
    }

    fn apply_slide(&mut self, input: &InputSignals) {
        let requested = [
            (input.move_left, Direction::Left),
            (input.move_right, Direction::Right),
        ];
        let piece = &self.falling.piece;
        let Some(direction) = requested.into_iter().find_map(|(pressed, direction)| {
            (pressed && collision::can_slide(piece, &self.board, direction)).then_some(direction)
        }) else {
            return;
        };
        let dx = f64::from(direction.dx()) * self.config.slide_step;
        self.falling.piece = self.falling.piece.translated(dx, 0.0);
    }

    fn apply_rotation(&mut self, input: &InputSignals, now: Duration) {
        if !input.rotate
            || !self
                .falling
                .can_rotate(now, self.config.rotation_cooldown())
        {
            return;
        }
        if let Some(piece) = rotation::try_rotate(&self.falling.piece, &self.board) {
            self.falling.piece = piece;
            self.falling.last_rotation = Some(now);
        }
    }

    fn apply_gravity(&mut self, input: &InputSignals) {
        if collision::is_landed(&self.falling.piece, &self.board) {
            return;
        }
        let mut dy = self.config.fall_step;
        if input.soft_drop {
            dy += self.config.soft_drop_step;
        }
        self.falling.piece = self.falling.piece.translated(0.0, dy);
    }

    fn apply_hard_drop(&mut self, input: &InputSignals) {
        if !input.hard_drop || !collision::is_fully_visible(&self.falling.piece) {
            return;
        }
        while !collision::is_landed(&self.falling.piece, &self.board) {
            self.falling.piece = self.falling.piece.translated(0.0, 1.0);
        }
    }

    fn spawn_piece(&mut self) {
        let piece = self.generator.generate(self.board.size());
        self.falling = FallingPiece::new(piece);
    }

    fn restart(&mut self, now: Duration) {
        self.board.clear();
        self.stats = GameStats::new();
        self.spawn_piece();
        self.session_state = SessionState::Playing;
        self.started_at = Some(now);
    }
}
