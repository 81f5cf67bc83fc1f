use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};
use color_eyre::Result;

use crate::components::alarm_form::{AlarmFormState, ToneChooserState};
use crate::components::task_form::{TaskFormMode, TaskFormState};
use crate::config::Config;
use crate::desk::sound;
use crate::desk::{
    AlarmBook, AlarmId, JsonStore, PlayerLoader, QuoteBook, Sound, SoundLoader, TaskList,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Alarms,
    Quotes,
    Tasks,
}

impl ViewMode {
    pub fn next(&self) -> Self {
        match self {
            ViewMode::Alarms => ViewMode::Quotes,
            ViewMode::Quotes => ViewMode::Tasks,
            ViewMode::Tasks => ViewMode::Alarms,
        }
    }
}

/// At most one popup is open per app; the ringing alarm is tracked separately
/// because it can appear over any of them.
#[derive(Debug)]
pub enum Popup {
    AlarmForm(AlarmFormState),
    TaskForm(TaskFormState),
    /// `None` when no favorite was ever saved.
    Favorites(Option<Vec<String>>),
}

pub struct Ringing {
    pub alarm: AlarmId,
    pub sound: Option<Box<dyn Sound>>,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub now: DateTime<Local>,
    pub today: NaiveDate,
    pub alarms: AlarmBook,
    pub tasks: TaskList,
    pub quotes: QuoteBook,
    pub daily_quote: String,
    pub alarm_cursor: usize,
    pub task_cursor: usize,
    pub popup: Option<Popup>,
    pub ringing: Option<Ringing>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub snooze_minutes: u32,
    tone_dir: PathBuf,
    sound_loader: Box<dyn SoundLoader>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let store = JsonStore::open(config.quotes.store_path())?;
        let quotes = QuoteBook::new(store, config.quotes.extra.iter().cloned());
        let alarms = AlarmBook::new(config.alarm.match_mode, config.alarm.snooze_minutes);

        Self::with_parts(
            alarms,
            quotes,
            config.alarm.snooze_minutes,
            config.alarm.tone_dir(),
            Box::new(PlayerLoader),
            Local::now(),
        )
    }

    pub fn with_parts(
        alarms: AlarmBook,
        mut quotes: QuoteBook,
        snooze_minutes: u32,
        tone_dir: PathBuf,
        sound_loader: Box<dyn SoundLoader>,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let today = now.date_naive();
        let daily_quote = quotes.get_daily(today, &mut rand::thread_rng())?;

        Ok(Self {
            running: true,
            view_mode: ViewMode::Alarms,
            now,
            today,
            alarms,
            tasks: TaskList::new(),
            quotes,
            daily_quote,
            alarm_cursor: 0,
            task_cursor: 0,
            popup: None,
            ringing: None,
            show_help: false,
            status_message: None,
            snooze_minutes,
            tone_dir,
            sound_loader,
        })
    }

    // ── clock ──

    /// Once-per-second update: clock, day rollover, alarm check.
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.now = now;

        if now.date_naive() != self.today {
            self.today = now.date_naive();
            match self.quotes.get_daily(self.today, &mut rand::thread_rng()) {
                Ok(quote) => self.daily_quote = quote,
                Err(e) => tracing::error!(error = %e, "failed to refresh quote of the day"),
            }
        }

        let fired = self.alarms.tick(now.naive_local());
        if let Some(&id) = fired.last() {
            self.ring(id);
        }
    }

    fn ring(&mut self, id: AlarmId) {
        self.stop_sound();

        let mut sound = self
            .alarms
            .get(id)
            .and_then(|alarm| self.sound_loader.load(&alarm.tone));
        if let Some(ref mut s) = sound {
            s.play();
        }
        self.ringing = Some(Ringing { alarm: id, sound });
    }

    fn stop_sound(&mut self) {
        if let Some(mut ringing) = self.ringing.take() {
            if let Some(ref mut s) = ringing.sound {
                s.stop();
            }
        }
    }

    pub fn dismiss_alarm(&mut self) {
        self.stop_sound();
    }

    pub fn snooze_alarm(&mut self) {
        let Some(id) = self.ringing.as_ref().map(|r| r.alarm) else {
            return;
        };
        self.stop_sound();
        if let Some(until) = self.alarms.snooze(id, Local::now().time()) {
            self.status_message = Some(format!("Snoozed until {}", until.format("%H:%M:%S")));
        }
    }

    // ── alarm app ──

    pub fn open_alarm_form(&mut self) {
        self.popup = Some(Popup::AlarmForm(AlarmFormState::new()));
    }

    pub fn alarm_form_mut(&mut self) -> Option<&mut AlarmFormState> {
        match self.popup {
            Some(Popup::AlarmForm(ref mut form)) => Some(form),
            _ => None,
        }
    }

    pub fn open_tone_chooser(&mut self) {
        let dir = self.tone_dir.clone();
        let tones = sound::scan_tones(&dir);
        if let Some(form) = self.alarm_form_mut() {
            form.chooser = Some(ToneChooserState {
                dir,
                tones,
                selected: 0,
            });
        }
    }

    /// Takes the highlighted tone; an empty listing keeps the chooser open.
    pub fn choose_tone(&mut self) {
        if let Some(form) = self.alarm_form_mut() {
            let picked = form.chooser.as_ref().and_then(|c| c.current().cloned());
            if let Some(tone) = picked {
                form.tone = Some(tone);
                form.chooser = None;
            }
        }
    }

    pub fn submit_alarm_form(&mut self) {
        let Some(form) = self.alarm_form_mut() else {
            return;
        };
        let Some(time) = form.time() else {
            self.status_message = Some("Pick hour, minute and second".to_string());
            return;
        };
        let Some(tone) = form.tone.clone() else {
            self.status_message = Some("Choose an alarm tone first".to_string());
            return;
        };

        self.alarms.add(time, tone);
        self.alarm_cursor = self.alarms.len() - 1;
        self.popup = None;
    }

    pub fn toggle_selected_alarm(&mut self) {
        if let Some(id) = self.alarms.id_at(self.alarm_cursor) {
            let active = self.alarms.get(id).is_some_and(|a| a.active);
            self.alarms.toggle(id, !active);
        }
    }

    // ── quote app ──

    pub fn save_favorite(&mut self) {
        match self.quotes.save_favorite(&self.daily_quote) {
            Ok(true) => self.status_message = Some("Saved to favorites".to_string()),
            Ok(false) => self.status_message = Some("Already in favorites".to_string()),
            Err(e) => {
                tracing::error!(error = %e, "failed to save favorite");
                self.status_message = Some(format!("Could not save: {e}"));
            }
        }
    }

    pub fn view_favorites(&mut self) {
        let favorites = self
            .quotes
            .has_favorites()
            .then(|| self.quotes.list_favorites());
        self.popup = Some(Popup::Favorites(favorites));
    }

    pub fn daily_quote_is_favorite(&self) -> bool {
        self.quotes
            .list_favorites()
            .iter()
            .any(|q| *q == self.daily_quote)
    }

    // ── to-do app ──

    pub fn open_add_task(&mut self) {
        self.popup = Some(Popup::TaskForm(TaskFormState::new()));
    }

    pub fn open_edit_task(&mut self) {
        let task = self
            .tasks
            .id_at(self.task_cursor)
            .and_then(|id| self.tasks.get(id));
        if let Some(task) = task {
            self.popup = Some(Popup::TaskForm(TaskFormState::edit(task)));
        }
    }

    pub fn task_form_mut(&mut self) -> Option<&mut TaskFormState> {
        match self.popup {
            Some(Popup::TaskForm(ref mut form)) => Some(form),
            _ => None,
        }
    }

    /// Validation failures keep the form open with the reason in the status bar.
    pub fn submit_task_form(&mut self) {
        let Some(form) = self.task_form_mut() else {
            return;
        };
        let mode = form.mode;
        let draft = form.draft();

        let result = match mode {
            TaskFormMode::Add => self.tasks.add(draft).map(|_| ()),
            TaskFormMode::Edit(id) => self.tasks.edit(id, draft),
        };

        match result {
            Ok(()) => {
                if mode == TaskFormMode::Add {
                    self.task_cursor = self.tasks.len() - 1;
                }
                self.popup = None;
            }
            Err(e) => self.status_message = Some(format!("Invalid task details: {e}")),
        }
    }

    pub fn delete_selected_task(&mut self) {
        if let Some(id) = self.tasks.id_at(self.task_cursor) {
            self.tasks.delete(id);
            self.task_cursor = self.task_cursor.min(self.tasks.len().saturating_sub(1));
        }
    }

    pub fn toggle_selected_task(&mut self) {
        if let Some(id) = self.tasks.id_at(self.task_cursor) {
            let completed = self.tasks.get(id).is_some_and(|t| t.completed);
            self.tasks.set_completed(id, !completed);
        }
    }

    // ── navigation ──

    pub fn cursor_down(&mut self) {
        match self.view_mode {
            ViewMode::Alarms => {
                self.alarm_cursor = step(self.alarm_cursor, 1, self.alarms.len());
            }
            ViewMode::Tasks => {
                self.task_cursor = step(self.task_cursor, 1, self.tasks.len());
            }
            ViewMode::Quotes => {}
        }
    }

    pub fn cursor_up(&mut self) {
        match self.view_mode {
            ViewMode::Alarms => {
                self.alarm_cursor = step(self.alarm_cursor, -1, self.alarms.len());
            }
            ViewMode::Tasks => {
                self.task_cursor = step(self.task_cursor, -1, self.tasks.len());
            }
            ViewMode::Quotes => {}
        }
    }

    /// Dismissing a popup discards its uncommitted input.
    pub fn close_popup(&mut self) {
        self.popup = None;
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use chrono::{NaiveTime, TimeZone, Timelike};

    use crate::desk::{DueDate, MatchMode, Priority};

    #[derive(Default)]
    struct Log(RefCell<Vec<String>>);

    struct FakeSound(Rc<Log>);

    impl Sound for FakeSound {
        fn play(&mut self) {
            self.0 .0.borrow_mut().push("play".into());
        }
        fn stop(&mut self) {
            self.0 .0.borrow_mut().push("stop".into());
        }
    }

    struct FakeLoader(Rc<Log>);

    impl SoundLoader for FakeLoader {
        fn load(&self, path: &Path) -> Option<Box<dyn Sound>> {
            self.0 .0.borrow_mut().push(format!("load {}", path.display()));
            (path.extension()? == "wav").then(|| Box::new(FakeSound(self.0.clone())) as Box<dyn Sound>)
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 1, h, m, s).unwrap()
    }

    fn app(dir: &tempfile::TempDir) -> (App, Rc<Log>) {
        let log = Rc::new(Log::default());
        let store = JsonStore::open(dir.path().join("favorites.json")).unwrap();
        let app = App::with_parts(
            AlarmBook::new(MatchMode::Exact, 10),
            QuoteBook::new(store, Vec::new()),
            10,
            dir.path().to_path_buf(),
            Box::new(FakeLoader(log.clone())),
            at(6, 0, 0),
        )
        .unwrap();
        (app, log)
    }

    fn entries(log: &Log) -> Vec<String> {
        log.0.borrow().clone()
    }

    #[test]
    fn tick_rings_matching_alarm_and_dismiss_stops_sound() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, log) = app(&dir);
        let id = app.alarms.add(NaiveTime::from_hms_opt(6, 0, 1).unwrap(), "/t/ring.wav").id;

        app.tick(at(6, 0, 0));
        assert!(app.ringing.is_none());

        app.tick(at(6, 0, 1));
        assert_eq!(app.ringing.as_ref().map(|r| r.alarm), Some(id));
        assert_eq!(entries(&log), vec!["load /t/ring.wav", "play"]);

        app.dismiss_alarm();
        assert!(app.ringing.is_none());
        assert_eq!(entries(&log).last().map(String::as_str), Some("stop"));
        assert!(app.alarms.get(id).unwrap().active);
    }

    #[test]
    fn midnight_tick_refreshes_the_daily_quote() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);
        assert_eq!(app.today, at(6, 0, 0).date_naive());

        let next_day = Local.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        app.tick(next_day);
        assert_eq!(app.today, next_day.date_naive());

        let store = JsonStore::open(dir.path().join("favorites.json")).unwrap();
        assert_eq!(store.get_field::<String>("date", "date").as_deref(), Some("2025-01-02"));
        assert_eq!(store.get_field::<String>("quote", "quote"), Some(app.daily_quote.clone()));
    }

    #[test]
    fn alarm_without_sound_still_rings() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);
        app.alarms.add(NaiveTime::from_hms_opt(6, 0, 1).unwrap(), "/t/ring.ogg");

        app.tick(at(6, 0, 1));
        let ringing = app.ringing.as_ref().unwrap();
        assert!(ringing.sound.is_none());
    }

    #[test]
    fn snooze_moves_alarm_ten_minutes_past_now() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);
        let id = app.alarms.add(NaiveTime::from_hms_opt(6, 0, 1).unwrap(), "/t/ring.wav").id;
        app.tick(at(6, 0, 1));

        let before = Local::now().time().with_nanosecond(0).unwrap();
        app.snooze_alarm();
        let after = Local::now().time().with_nanosecond(0).unwrap();

        assert!(app.ringing.is_none());
        let alarm = app.alarms.get(id).unwrap();
        assert!(alarm.active);
        let ten = chrono::Duration::minutes(10);
        assert!(alarm.time == before + ten || alarm.time == after + ten);
    }

    #[test]
    fn alarm_form_needs_time_and_tone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beep.wav"), b"").unwrap();
        let (mut app, _log) = app(&dir);

        app.open_alarm_form();
        app.submit_alarm_form();
        assert!(app.popup.is_some());
        assert!(app.alarms.is_empty());

        let form = app.alarm_form_mut().unwrap();
        form.hour.select("07");
        form.minute.select("15");
        form.second.select("00");
        app.submit_alarm_form();
        assert_eq!(app.status_message.as_deref(), Some("Choose an alarm tone first"));

        app.open_tone_chooser();
        app.choose_tone();
        app.submit_alarm_form();

        assert!(app.popup.is_none());
        let alarm = app.alarms.iter().next().unwrap();
        assert_eq!(alarm.time_display(), "07:15:00");
        assert_eq!(alarm.tone_name(), "beep.wav");
    }

    #[test]
    fn toggle_selected_alarm_flips_switch() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);
        let id = app.alarms.add(NaiveTime::from_hms_opt(7, 0, 0).unwrap(), "a.wav").id;

        app.toggle_selected_alarm();
        assert!(!app.alarms.get(id).unwrap().active);
        app.toggle_selected_alarm();
        assert!(app.alarms.get(id).unwrap().active);
    }

    #[test]
    fn task_form_round_trip_through_app() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);

        app.open_add_task();
        app.submit_task_form();
        assert!(app.popup.is_some());
        assert!(app.tasks.is_empty());
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Invalid task details")));

        let form = app.task_form_mut().unwrap();
        form.title = "Buy milk".into();
        form.description = "2%".into();
        form.priority.select("Low");
        form.due_date = DueDate::Invalid;
        app.submit_task_form();
        assert!(app.popup.is_none());
        assert_eq!(app.tasks.len(), 1);

        app.open_edit_task();
        app.task_form_mut().unwrap().priority.select("High");
        app.submit_task_form();
        let task = app.tasks.render_order().next().unwrap();
        assert_eq!(task.priority, Priority::High);

        app.toggle_selected_task();
        assert!(app.tasks.render_order().next().unwrap().completed);

        app.delete_selected_task();
        assert!(app.tasks.is_empty());
        assert_eq!(app.task_cursor, 0);
    }

    #[test]
    fn favorites_popup_distinguishes_never_saved() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);

        app.view_favorites();
        assert!(matches!(app.popup, Some(Popup::Favorites(None))));

        app.save_favorite();
        app.save_favorite();
        assert_eq!(app.status_message.as_deref(), Some("Already in favorites"));
        assert!(app.daily_quote_is_favorite());

        app.view_favorites();
        match app.popup {
            Some(Popup::Favorites(Some(ref list))) => assert_eq!(list, &vec![app.daily_quote.clone()]),
            _ => panic!("expected favorites list"),
        }
    }

    #[test]
    fn cursor_is_clamped_to_collection() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _log) = app(&dir);
        app.cursor_down();
        assert_eq!(app.alarm_cursor, 0);

        app.alarms.add(NaiveTime::from_hms_opt(7, 0, 0).unwrap(), "a.wav");
        app.alarms.add(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), "b.wav");
        app.cursor_down();
        app.cursor_down();
        assert_eq!(app.alarm_cursor, 1);
        app.cursor_up();
        app.cursor_up();
        assert_eq!(app.alarm_cursor, 0);
    }
}
