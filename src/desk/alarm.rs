use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::Deserialize;

/// Default snooze length in minutes.
pub const DEFAULT_SNOOZE_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmId(u64);

/// How the once-per-second clock tick decides that an alarm is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Fire only when the tick lands on the alarm's exact second.
    #[default]
    Exact,
    /// Fire for every alarm passed since the previous tick. A clock that
    /// stepped backwards falls back to exact matching for that tick.
    Window,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub id: AlarmId,
    pub time: NaiveTime,
    pub tone: PathBuf,
    pub active: bool,
}

impl Alarm {
    pub fn time_display(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }

    pub fn tone_name(&self) -> String {
        self.tone
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.tone.display().to_string())
    }
}

/// The alarm clock's collection. Alarms are never removed, only toggled.
#[derive(Debug)]
pub struct AlarmBook {
    alarms: Vec<Alarm>,
    next_id: u64,
    match_mode: MatchMode,
    snooze: Duration,
    last_check: Option<NaiveDateTime>,
}

impl Default for AlarmBook {
    fn default() -> Self {
        Self::new(MatchMode::default(), DEFAULT_SNOOZE_MINUTES)
    }
}

impl AlarmBook {
    pub fn new(match_mode: MatchMode, snooze_minutes: u32) -> Self {
        Self {
            alarms: Vec::new(),
            next_id: 1,
            match_mode,
            snooze: Duration::minutes(i64::from(snooze_minutes)),
            last_check: None,
        }
    }

    pub fn add(&mut self, time: NaiveTime, tone: impl AsRef<Path>) -> &Alarm {
        let id = AlarmId(self.next_id);
        self.next_id += 1;

        let alarm = Alarm {
            id,
            time: whole_second(time),
            tone: tone.as_ref().to_path_buf(),
            active: true,
        };
        tracing::info!(alarm = alarm.id.0, time = %alarm.time_display(), tone = %alarm.tone.display(), "alarm set");

        self.alarms.push(alarm);
        &self.alarms[self.alarms.len() - 1]
    }

    pub fn toggle(&mut self, id: AlarmId, active: bool) {
        if let Some(alarm) = self.get_mut(id) {
            alarm.active = active;
            tracing::debug!(alarm = id.0, active, "alarm toggled");
        }
    }

    /// Active alarms due at `now`.
    pub fn check(&self, now: NaiveDateTime) -> impl Iterator<Item = &Alarm> + '_ {
        let now = whole_second(now);
        let mode = self.match_mode;
        let last = self.last_check;
        self.alarms
            .iter()
            .filter(move |alarm| alarm.active && is_due(mode, last, alarm.time, now))
    }

    /// Runs one clock tick and returns the ids of the alarms that fired.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<AlarmId> {
        let fired: Vec<AlarmId> = self.check(now).map(|a| a.id).collect();
        self.last_check = Some(whole_second(now));

        for id in &fired {
            tracing::info!(alarm = id.0, "alarm ringing");
        }
        fired
    }

    /// Pushes the alarm to `now` plus the snooze length and re-activates it.
    pub fn snooze(&mut self, id: AlarmId, now: NaiveTime) -> Option<NaiveTime> {
        let snooze = self.snooze;
        let alarm = self.get_mut(id)?;
        alarm.time = whole_second(now) + snooze;
        alarm.active = true;
        tracing::info!(alarm = id.0, until = %alarm.time_display(), "alarm snoozed");
        Some(alarm.time)
    }

    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: AlarmId) -> Option<&mut Alarm> {
        self.alarms.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }

    pub fn id_at(&self, index: usize) -> Option<AlarmId> {
        self.alarms.get(index).map(|a| a.id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

fn whole_second<T: Timelike + Copy>(t: T) -> T {
    t.with_nanosecond(0).unwrap_or(t)
}

fn is_due(mode: MatchMode, last: Option<NaiveDateTime>, at: NaiveTime, now: NaiveDateTime) -> bool {
    match (mode, last) {
        (MatchMode::Exact, _) | (MatchMode::Window, None) => at == now.time(),
        // Clock stepped backwards (DST fall-back, NTP correction)
        (MatchMode::Window, Some(last)) if last > now => at == now.time(),
        (MatchMode::Window, Some(last)) if now - last >= Duration::days(1) => true,
        (MatchMode::Window, Some(last)) => [last.date(), now.date()]
            .into_iter()
            .map(|day| day.and_time(at))
            .any(|due| last < due && due <= now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn on_day(d: u32, time: NaiveTime) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_time(time)
    }

    #[test]
    fn add_appends_active_alarm_in_order() {
        let mut book = AlarmBook::default();
        book.add(t(7, 0, 0), "/tones/a.wav");
        book.add(t(7, 0, 0), "/tones/b.mp3");

        let times: Vec<_> = book.iter().map(|a| (a.time_display(), a.active)).collect();
        assert_eq!(
            times,
            vec![("07:00:00".to_string(), true), ("07:00:00".to_string(), true)]
        );
        assert_eq!(book.iter().next().unwrap().tone_name(), "a.wav");
    }

    #[test]
    fn check_matches_only_active_alarms_at_exact_second() {
        let mut book = AlarmBook::default();
        let on = book.add(t(6, 30, 0), "a.wav").id;
        let off = book.add(t(6, 30, 0), "b.wav").id;
        book.add(t(6, 30, 1), "c.wav");
        book.toggle(off, false);

        let now = on_day(1, t(6, 30, 0)) + Duration::milliseconds(640);
        let due: Vec<_> = book.check(now).map(|a| a.id).collect();
        assert_eq!(due, vec![on]);

        assert_eq!(book.check(on_day(1, t(6, 29, 59))).count(), 0);
    }

    #[test]
    fn exact_mode_misses_a_skipped_second() {
        let mut book = AlarmBook::default();
        book.add(t(8, 0, 0), "a.wav");

        assert!(book.tick(on_day(1, t(7, 59, 59))).is_empty());
        assert!(book.tick(on_day(1, t(8, 0, 1))).is_empty());
    }

    #[test]
    fn window_mode_catches_a_skipped_second() {
        let mut book = AlarmBook::new(MatchMode::Window, DEFAULT_SNOOZE_MINUTES);
        let id = book.add(t(8, 0, 0), "a.wav").id;

        assert!(book.tick(on_day(1, t(7, 59, 59))).is_empty());
        assert_eq!(book.tick(on_day(1, t(8, 0, 1))), vec![id]);
        assert!(book.tick(on_day(1, t(8, 0, 2))).is_empty());
    }

    #[test]
    fn window_mode_wraps_past_midnight() {
        let mut book = AlarmBook::new(MatchMode::Window, DEFAULT_SNOOZE_MINUTES);
        let id = book.add(t(0, 0, 0), "a.wav").id;
        book.add(t(12, 0, 0), "b.wav");

        book.tick(on_day(1, t(23, 59, 59)));
        assert_eq!(book.tick(on_day(2, t(0, 0, 1))), vec![id]);
    }

    #[test]
    fn window_mode_ignores_clock_stepping_back() {
        let mut book = AlarmBook::new(MatchMode::Window, DEFAULT_SNOOZE_MINUTES);
        book.add(t(7, 0, 0), "a.wav");
        book.add(t(12, 0, 0), "b.wav");
        let early = book.add(t(2, 0, 0), "c.wav").id;

        assert!(book.tick(on_day(1, t(2, 59, 59))).is_empty());
        assert_eq!(book.tick(on_day(1, t(2, 0, 0))), vec![early]);
        assert!(book.tick(on_day(1, t(2, 0, 1))).is_empty());
    }

    #[test]
    fn window_mode_after_a_long_stall_fires_everything() {
        let mut book = AlarmBook::new(MatchMode::Window, DEFAULT_SNOOZE_MINUTES);
        book.add(t(7, 0, 0), "a.wav");
        book.add(t(12, 0, 0), "b.wav");

        book.tick(on_day(1, t(9, 0, 0)));
        assert_eq!(book.tick(on_day(2, t(9, 0, 0))).len(), 2);
    }

    #[test]
    fn snooze_is_relative_to_call_time() {
        let mut book = AlarmBook::default();
        let id = book.add(t(9, 0, 0), "a.wav").id;
        book.toggle(id, false);

        assert_eq!(book.snooze(id, t(9, 0, 3)), Some(t(9, 10, 3)));
        assert!(book.get(id).unwrap().active);

        assert_eq!(book.snooze(id, t(9, 10, 5)), Some(t(9, 20, 5)));
    }

    #[test]
    fn snooze_wraps_at_midnight() {
        let mut book = AlarmBook::default();
        let id = book.add(t(23, 55, 0), "a.wav").id;

        assert_eq!(book.snooze(id, t(23, 55, 0)), Some(t(0, 5, 0)));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut book = AlarmBook::default();
        let id = book.add(t(1, 0, 0), "a.wav").id;
        let mut other = AlarmBook::default();
        other.add(t(1, 0, 0), "a.wav");
        let missing = other.add(t(1, 0, 0), "b.wav").id;

        book.toggle(missing, false);
        assert!(book.get(id).unwrap().active);
        assert_eq!(book.snooze(missing, t(1, 0, 0)), None);
    }
}
