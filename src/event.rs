use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// The wall clock moved into a new second.
    Tick(DateTime<Local>),
}

/// Produces at most one clock tick per wall-clock second.
#[derive(Debug, Default)]
pub struct Clock {
    last_second: Option<(i64, u32)>,
}

impl Clock {
    pub fn poll(&mut self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let second = (now.timestamp(), now.nanosecond() / 1_000_000_000);
        if self.last_second == Some(second) {
            return None;
        }
        self.last_second = Some(second);
        Some(now)
    }
}

/// Checks the clock, then waits up to `timeout` for a key press.
///
/// The clock is polled before blocking so a steady stream of keys cannot
/// hold back the once-per-second tick.
pub fn next_event(clock: &mut Clock, timeout: Duration) -> color_eyre::Result<Option<AppEvent>> {
    next_event_from(clock, timeout, Local::now, read_key)
}

fn next_event_from(
    clock: &mut Clock,
    timeout: Duration,
    now: impl Fn() -> DateTime<Local>,
    mut read_key: impl FnMut(Duration) -> color_eyre::Result<Option<KeyEvent>>,
) -> color_eyre::Result<Option<AppEvent>> {
    if let Some(tick) = clock.poll(now()) {
        return Ok(Some(AppEvent::Tick(tick)));
    }
    if let Some(key) = read_key(timeout)? {
        return Ok(Some(AppEvent::Key(key)));
    }
    Ok(clock.poll(now()).map(AppEvent::Tick))
}

fn read_key(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}
