use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Tick scheduling and dirty tracking for the runner.
///
/// Ticks are emitted on a fixed schedule. A render follows whenever a tick or
/// terminal event has happened since the last one.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    next_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            next_tick: Instant::now() + tick_interval,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
        self.next_tick = Instant::now() + interval;
    }

    /// Blocks until the next tick is due, a render is pending, or a terminal
    /// event arrives.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                // fixed schedule; after a stall, restart it from now
                self.next_tick += self.tick_interval;
                if self.next_tick <= now {
                    self.next_tick = now + self.tick_interval;
                }
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let timeout = self.next_tick.saturating_duration_since(now);
            if !event::poll(timeout)? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::new(Duration::from_secs(60));
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_due_tick_comes_before_render() {
        let mut events = EventLoop::new(Duration::ZERO);
        assert!(events.next().unwrap().is_tick());
    }
}
