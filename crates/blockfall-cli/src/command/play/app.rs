use std::time::{Duration, Instant};

use blockfall_engine::{GameSession, InputSignals, SessionState};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    command::play::input::KeyState,
    record::{ScoreLog, ScoreRecord},
    tui::{App, Tui},
    ui::widgets::SessionDisplay,
};

/// What is left of a play run once the terminal is restored.
#[derive(Debug, Clone, Copy)]
pub struct PlaySummary {
    pub score: usize,
    pub cleared_lines: usize,
    pub completed_pieces: usize,
    pub recorded_games: usize,
}

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    keys: KeyState,
    tick_interval: Duration,
    started_at: Instant,
    score_log: Option<ScoreLog>,
    recorded_games: usize,
    error: Option<anyhow::Error>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(
        session: GameSession,
        tick_interval: Duration,
        track_release: bool,
        score_log: Option<ScoreLog>,
    ) -> Self {
        Self {
            session,
            keys: KeyState::new(track_release),
            tick_interval,
            started_at: Instant::now(),
            score_log,
            recorded_games: 0,
            error: None,
            is_exiting: false,
        }
    }

    /// Consumes the app, returning the error that stopped it if any.
    pub fn finish(self) -> anyhow::Result<PlaySummary> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let stats = self.session.stats();
        Ok(PlaySummary {
            score: stats.score(),
            cleared_lines: stats.total_cleared_lines(),
            completed_pieces: stats.completed_pieces(),
            recorded_games: self.recorded_games,
        })
    }

    /// Advances the session by one tick at `now`, measured from the start of
    /// the run. Quit ends the run before the session sees the input.
    fn tick_session(&mut self, input: &InputSignals, now: Duration) {
        if input.quit {
            self.is_exiting = true;
            return;
        }
        let event = self.session.tick(input, now);
        if event.is_game_over() {
            self.record_game();
        }
    }

    fn record_game(&mut self) {
        let Some(score_log) = &self.score_log else {
            return;
        };
        let record = ScoreRecord::from_session(&self.session);
        match score_log.append(&record) {
            Ok(()) => self.recorded_games += 1,
            Err(err) => {
                self.error = Some(err);
                self.is_exiting = true;
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(self.tick_interval);
        self.started_at = Instant::now();
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_event() {
            self.keys.handle_key(&key);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session);
        let help_text = match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | Space (Hard Drop) | Q (Quit)"
            }
            SessionState::GameOver => "Controls: Z (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        let input = self.keys.sample();
        self.tick_session(&input, self.started_at.elapsed());
    }
}
