use blockfall_engine::InputSignals;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Restart,
    Quit,
}

impl Command {
    fn from_key(key: &KeyEvent) -> Option<Self> {
        let command = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right => Self::MoveRight,
            KeyCode::Up => Self::Rotate,
            KeyCode::Down => Self::SoftDrop,
            KeyCode::Char(' ') => Self::HardDrop,
            KeyCode::Char('z') => Self::Restart,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(command)
    }

    fn signal(self, signals: &mut InputSignals) -> &mut bool {
        match self {
            Self::MoveLeft => &mut signals.move_left,
            Self::MoveRight => &mut signals.move_right,
            Self::Rotate => &mut signals.rotate,
            Self::SoftDrop => &mut signals.soft_drop,
            Self::HardDrop => &mut signals.hard_drop,
            Self::Restart => &mut signals.restart,
            Self::Quit => &mut signals.quit,
        }
    }
}

/// Turns terminal key events into one [`InputSignals`] sample per tick.
///
/// Every press or repeat is reported in the next sample, even if the key was
/// released before the tick. When the terminal reports key releases, a key
/// also stays set in every sample until it is released.
#[derive(Debug, Clone)]
pub struct KeyState {
    track_release: bool,
    held: InputSignals,
    pulsed: InputSignals,
}

impl KeyState {
    pub fn new(track_release: bool) -> Self {
        Self {
            track_release,
            held: InputSignals::NONE,
            pulsed: InputSignals::NONE,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let Some(command) = Command::from_key(key) else {
            return;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                *command.signal(&mut self.pulsed) = true;
                if self.track_release {
                    *command.signal(&mut self.held) = true;
                }
            }
            KeyEventKind::Release => *command.signal(&mut self.held) = false,
        }
    }

    /// Returns the signals for this tick and forgets one-shot presses.
    pub fn sample(&mut self) -> InputSignals {
        let signals = self.held.merged(self.pulsed);
        self.pulsed = InputSignals::NONE;
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn repeat(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
    }

    #[test]
    fn test_key_map() {
        let cases = [
            (KeyCode::Left, Command::MoveLeft),
            (KeyCode::Right, Command::MoveRight),
            (KeyCode::Up, Command::Rotate),
            (KeyCode::Down, Command::SoftDrop),
            (KeyCode::Char(' '), Command::HardDrop),
            (KeyCode::Char('z'), Command::Restart),
            (KeyCode::Char('q'), Command::Quit),
            (KeyCode::Esc, Command::Quit),
        ];
        for (code, command) in cases {
            assert_eq!(Command::from_key(&press(code)), Some(command), "{code:?}");
        }
        assert_eq!(Command::from_key(&press(KeyCode::Char('x'))), None);
        assert_eq!(Command::from_key(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key(&key), Some(Command::Quit));
    }

    #[test]
    fn test_press_pulses_for_one_sample() {
        let mut keys = KeyState::new(false);
        keys.handle_key(&press(KeyCode::Down));

        assert!(keys.sample().soft_drop);
        assert_eq!(keys.sample(), InputSignals::NONE);
    }

    #[test]
    fn test_repeat_pulses_again() {
        let mut keys = KeyState::new(false);
        keys.handle_key(&press(KeyCode::Left));
        assert!(keys.sample().move_left);

        keys.handle_key(&repeat(KeyCode::Left));
        assert!(keys.sample().move_left);
    }

    #[test]
    fn test_tracked_key_held_until_release() {
        let mut keys = KeyState::new(true);
        keys.handle_key(&press(KeyCode::Down));

        assert!(keys.sample().soft_drop);
        assert!(keys.sample().soft_drop);

        keys.handle_key(&release(KeyCode::Down));
        assert!(!keys.sample().soft_drop);
    }

    #[test]
    fn test_tap_between_ticks_still_seen() {
        let mut keys = KeyState::new(true);
        keys.handle_key(&press(KeyCode::Up));
        keys.handle_key(&release(KeyCode::Up));

        assert!(keys.sample().rotate);
        assert!(!keys.sample().rotate);
    }

    #[test]
    fn test_both_directions_reported() {
        let mut keys = KeyState::new(true);
        keys.handle_key(&press(KeyCode::Left));
        keys.handle_key(&press(KeyCode::Right));

        let signals = keys.sample();
        assert!(signals.move_left);
        assert!(signals.move_right);
    }
}
