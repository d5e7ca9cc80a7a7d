use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// Called once at the start of `Tui::run()`. Use this to set the tick rate.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Records terminal events (key input, resize, ...). Game state should
    /// only change in [`update`](Self::update).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen (called on each `TuiEvent::Render`).
    fn draw(&self, frame: &mut Frame);

    /// Advances the application by one tick (called on each `TuiEvent::Tick`).
    fn update(&mut self, tui: &mut Tui);
}
