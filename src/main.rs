mod app;
mod components;
mod config;
mod desk;
mod event;
mod logging;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, Popup, ViewMode};
use color_eyre::Result;
use components::alarm_form::AlarmField;
use components::task_form::TaskField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{AppEvent, Clock};
use ratatui::layout::{Constraint, Layout, Rect};

fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, config_error) = config::load_or_default();
    if let Err(e) = logging::init(&config.log) {
        eprintln!("logging disabled: {e}");
    }
    if let Some(e) = config_error {
        eprintln!("{e}; using defaults");
        config::warn_defaulted(&e);
    }
    theme::init(config.theme.to_theme());

    let mut app = App::new(&config)?;

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    tracing::info!("deskmates exiting");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut clock = Clock::default();

    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        match event::next_event(&mut clock, Duration::from_millis(100))? {
            Some(AppEvent::Tick(now)) => app.tick(now),
            Some(AppEvent::Key(key)) => handle_key(app, key),
            None => {}
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Clear status message on any key
    app.status_message = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // A ringing alarm takes priority over everything
    if app.ringing.is_some() {
        match key.code {
            KeyCode::Char('d') | KeyCode::Enter | KeyCode::Esc => app.dismiss_alarm(),
            KeyCode::Char('s') => app.snooze_alarm(),
            _ => {}
        }
        return;
    }

    if app.show_help {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            app.show_help = false;
        }
        return;
    }

    match app.popup {
        Some(Popup::AlarmForm(_)) => handle_alarm_form_input(app, key.code),
        Some(Popup::TaskForm(_)) => handle_task_form_input(app, key.code),
        Some(Popup::Favorites(_)) => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.close_popup();
            }
        }
        None => handle_normal_input(app, key.code),
    }
}

fn handle_normal_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('1') => app.view_mode = ViewMode::Alarms,
        KeyCode::Char('2') => app.view_mode = ViewMode::Quotes,
        KeyCode::Char('3') => app.view_mode = ViewMode::Tasks,
        KeyCode::Tab => app.view_mode = app.view_mode.next(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        _ => match app.view_mode {
            ViewMode::Alarms => match code {
                KeyCode::Char('n') => app.open_alarm_form(),
                KeyCode::Char(' ') => app.toggle_selected_alarm(),
                _ => {}
            },
            ViewMode::Quotes => match code {
                KeyCode::Char('f') => app.save_favorite(),
                KeyCode::Char('v') => app.view_favorites(),
                _ => {}
            },
            ViewMode::Tasks => match code {
                KeyCode::Char('n') => app.open_add_task(),
                KeyCode::Char('e') | KeyCode::Enter => app.open_edit_task(),
                KeyCode::Char('d') => app.delete_selected_task(),
                KeyCode::Char(' ') => app.toggle_selected_task(),
                _ => {}
            },
        },
    }
}

fn handle_alarm_form_input(app: &mut App, code: KeyCode) {
    let Some(form) = app.alarm_form_mut() else {
        return;
    };

    if let Some(ref mut chooser) = form.chooser {
        match code {
            KeyCode::Esc => form.chooser = None,
            KeyCode::Up | KeyCode::Char('k') => chooser.up(),
            KeyCode::Down | KeyCode::Char('j') => chooser.down(),
            KeyCode::Enter => app.choose_tone(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Tab => form.active_field = form.active_field.next(),
        KeyCode::BackTab => form.active_field = form.active_field.prev(),
        KeyCode::Up => form.spin_up(),
        KeyCode::Down => form.spin_down(),
        KeyCode::Enter if form.active_field == AlarmField::Tone => app.open_tone_chooser(),
        KeyCode::Enter => app.submit_alarm_form(),
        _ => {}
    }
}

fn handle_task_form_input(app: &mut App, code: KeyCode) {
    let Some(form) = app.task_form_mut() else {
        return;
    };

    if let Some(ref mut picker) = form.picker {
        match code {
            KeyCode::Esc => form.picker = None,
            KeyCode::Tab | KeyCode::Right => picker.next_field(),
            KeyCode::BackTab | KeyCode::Left => picker.prev_field(),
            KeyCode::Up => picker.spin_up(),
            KeyCode::Down => picker.spin_down(),
            KeyCode::Enter => form.confirm_picker(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Tab => form.active_field = form.active_field.next(),
        KeyCode::BackTab => form.active_field = form.active_field.prev(),
        KeyCode::Up => form.spin_up(),
        KeyCode::Down => form.spin_down(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Enter if form.active_field == TaskField::DueDate => form.open_picker(),
        KeyCode::Enter => app.submit_task_form(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Main layout: content + status bar
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content = layout[0];

    match app.view_mode {
        ViewMode::Alarms => {
            components::AlarmList::render(frame, content, app.now, &app.alarms, app.alarm_cursor);
        }
        ViewMode::Quotes => {
            components::QuoteView::render(
                frame,
                content,
                &app.daily_quote,
                app.daily_quote_is_favorite(),
            );
        }
        ViewMode::Tasks => {
            components::TaskListView::render(frame, content, &app.tasks, app.task_cursor);
        }
    }

    match app.popup {
        Some(Popup::AlarmForm(ref form)) => components::AlarmForm::render(frame, area, form),
        Some(Popup::TaskForm(ref form)) => components::TaskForm::render(frame, area, form),
        Some(Popup::Favorites(ref favorites)) => {
            components::FavoritesPopup::render(frame, area, favorites.as_deref());
        }
        None => {}
    }

    if app.show_help {
        render_help(frame, area);
    }

    if let Some(ref ringing) = app.ringing {
        if let Some(alarm) = app.alarms.get(ringing.alarm) {
            components::RingPopup::render(
                frame,
                area,
                alarm,
                ringing.sound.is_some(),
                app.snooze_minutes,
            );
        }
    }

    components::StatusBar::render(
        frame,
        layout[1],
        app.view_mode,
        app.status_message.as_deref(),
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_area = components::centered(area, 52, 26);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme::current().accent)
        .borders(Borders::ALL)
        .border_style(theme::current().accent.remove_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = theme::current().header;
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Apps", section_style)),
        entry("1/2/3", "Alarms / Quote / To-Do"),
        entry("Tab", "Next app"),
        entry("j/k", "Move selection"),
        Line::from(""),
        Line::from(Span::styled("Alarms", section_style)),
        entry("n", "Set new alarm"),
        entry("Space", "Switch alarm on/off"),
        entry("d / s", "Dismiss / snooze ringing alarm"),
        Line::from(""),
        Line::from(Span::styled("Quote", section_style)),
        entry("f", "Save to favorites"),
        entry("v", "View favorites"),
        Line::from(""),
        Line::from(Span::styled("To-Do", section_style)),
        entry("n", "Add task"),
        entry("e/Enter", "Edit task"),
        entry("d", "Delete task"),
        entry("Space", "Mark done / not done"),
        Line::from(""),
        Line::from(Span::styled("Popups", section_style)),
        entry("Tab", "Next field"),
        entry("\u{2191}/\u{2193}", "Change picker value"),
        entry("Enter", "Save, or open tone/date picker"),
        entry("Esc", "Cancel"),
        entry("q", "Quit"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
