use blockfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, SessionStatsDisplay, color, style};

const GAME_OVER_MESSAGE: [&str; 2] = ["You have died", "Press z to restart"];

/// Board, stats panel and, after a top-out, the game-over message.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        let game_over = self.session.session_state().is_game_over();
        BoardDisplay::new(self.session.board().size(), self.session.render_cells())
            .dimmed(game_over)
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            )
    }

    fn stats(&self) -> SessionStatsDisplay<'a> {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        SessionStatsDisplay::new(self.session.stats()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.session.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::GameOver => color::RED,
        }
    }

    pub fn height(&self) -> u16 {
        u16::max(self.board().height(), self.stats().height())
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board();
        let session_stats = self.stats();

        let [board_column, stats_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(session_stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(board_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(stats_column);

        let game_board_width = game_board.width();
        game_board.render(board_area, buf);
        session_stats.render(stats_area, buf);

        if self.session.session_state().is_game_over() {
            let block = Block::new().style(style::GAME_OVER);
            let text = Text::from_iter(GAME_OVER_MESSAGE)
                .style(style::GAME_OVER)
                .centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(4));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(2)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blockfall_engine::{GameConfig, InputSignals};
    use ratatui::style::Modifier;

    use super::*;

    // Spawned pieces never reach the rightmost column, so stacking them
    // without sliding always ends the game.
    fn topped_out_session() -> GameSession {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        let input = InputSignals {
            soft_drop: true,
            hard_drop: true,
            ..InputSignals::NONE
        };
        let mut now = Duration::ZERO;
        for _ in 0..100_000 {
            if session.tick(&input, now).is_game_over() {
                break;
            }
            now += Duration::from_millis(50);
        }
        assert!(session.session_state().is_game_over());
        session
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_playing_session_has_no_message() {
        let session = GameSession::new(GameConfig::default()).unwrap();
        let display = SessionDisplay::new(&session);
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, display.height()));
        display.render(buf.area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("SCORE:"));
        assert!(!text.contains(GAME_OVER_MESSAGE[0]));
    }

    #[test]
    fn test_game_over_dims_board_and_shows_message() {
        let session = topped_out_session();
        let display = SessionDisplay::new(&session);
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, display.height()));
        display.render(buf.area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("You have died"));
        assert!(text.contains("Press z to restart"));

        let board_cell = buf
            .content()
            .iter()
            .find(|cell| cell.symbol() == ".")
            .unwrap();
        assert!(board_cell.modifier.contains(Modifier::DIM));
    }
}
