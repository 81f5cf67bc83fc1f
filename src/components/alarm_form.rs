use std::path::PathBuf;

use chrono::NaiveTime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::{centered, render_field, scroll_offset, Spinner};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlarmField {
    Hour,
    Minute,
    Second,
    Tone,
}

impl AlarmField {
    pub fn next(&self) -> Self {
        match self {
            AlarmField::Hour => AlarmField::Minute,
            AlarmField::Minute => AlarmField::Second,
            AlarmField::Second => AlarmField::Tone,
            AlarmField::Tone => AlarmField::Hour,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            AlarmField::Hour => AlarmField::Tone,
            AlarmField::Minute => AlarmField::Hour,
            AlarmField::Second => AlarmField::Minute,
            AlarmField::Tone => AlarmField::Second,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToneChooserState {
    pub dir: PathBuf,
    pub tones: Vec<PathBuf>,
    pub selected: usize,
}

impl ToneChooserState {
    pub fn down(&mut self) {
        if !self.tones.is_empty() {
            self.selected = (self.selected + 1).min(self.tones.len() - 1);
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn current(&self) -> Option<&PathBuf> {
        self.tones.get(self.selected)
    }
}

#[derive(Debug, Clone)]
pub struct AlarmFormState {
    pub hour: Spinner,
    pub minute: Spinner,
    pub second: Spinner,
    pub tone: Option<PathBuf>,
    pub active_field: AlarmField,
    pub chooser: Option<ToneChooserState>,
}

impl Default for AlarmFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmFormState {
    pub fn new() -> Self {
        Self {
            hour: Spinner::numeric("Hour", 0..=23, 2),
            minute: Spinner::numeric("Minute", 0..=59, 2),
            second: Spinner::numeric("Second", 0..=59, 2),
            tone: None,
            active_field: AlarmField::Hour,
            chooser: None,
        }
    }

    fn spinner_mut(&mut self) -> Option<&mut Spinner> {
        match self.active_field {
            AlarmField::Hour => Some(&mut self.hour),
            AlarmField::Minute => Some(&mut self.minute),
            AlarmField::Second => Some(&mut self.second),
            AlarmField::Tone => None,
        }
    }

    pub fn spin_up(&mut self) {
        if let Some(s) = self.spinner_mut() {
            s.prev();
        }
    }

    pub fn spin_down(&mut self) {
        if let Some(s) = self.spinner_mut() {
            s.next();
        }
    }

    /// `None` while any of the three spinners still shows its placeholder.
    pub fn time(&self) -> Option<NaiveTime> {
        let part = |s: &Spinner| s.value().and_then(|v| v.parse::<u32>().ok());
        NaiveTime::from_hms_opt(part(&self.hour)?, part(&self.minute)?, part(&self.second)?)
    }
}

pub struct AlarmForm;

impl AlarmForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &AlarmFormState) {
        let form_area = centered(area, 46, 10);
        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(" Set New Alarm ")
            .title_style(theme::current().accent)
            .borders(Borders::ALL)
            .border_style(theme::current().accent.remove_modifier(Modifier::BOLD));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // hour
            Constraint::Length(1), // minute
            Constraint::Length(1), // second
            Constraint::Length(1), // tone
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Hour:", state.hour.text(), active == AlarmField::Hour);
        render_field(frame, rows[1], "Min:", state.minute.text(), active == AlarmField::Minute);
        render_field(frame, rows[2], "Sec:", state.second.text(), active == AlarmField::Second);

        let tone = state
            .tone
            .as_ref()
            .and_then(|t| t.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Choose Alarm Tone".to_string());
        render_field(frame, rows[3], "Tone:", &tone, active == AlarmField::Tone);

        let dim = theme::current().dim;
        let key = theme::current().header;
        let help = Line::from(vec![
            Span::styled("\u{2191}\u{2193}", key),
            Span::styled(":Pick ", dim),
            Span::styled("Enter", key),
            Span::styled(":Set/Tone ", dim),
            Span::styled("Esc", key),
            Span::styled(":Cancel", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);

        if let Some(ref chooser) = state.chooser {
            ToneChooser::render(frame, area, chooser);
        }
    }
}

pub struct ToneChooser;

impl ToneChooser {
    pub fn render(frame: &mut Frame, area: Rect, state: &ToneChooserState) {
        let popup = centered(area, 60, 16);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Choose Alarm Tone ")
            .title_style(theme::current().header)
            .title_bottom(Line::from(Span::styled(
                format!(" {} ", state.dir.display()),
                theme::current().dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        if state.tones.is_empty() {
            let inner = block.inner(popup);
            frame.render_widget(block, popup);
            let msg = Paragraph::new("No .mp3 or .wav files here").style(theme::current().dim);
            frame.render_widget(msg, inner);
            return;
        }

        let items: Vec<ListItem> = state
            .tones
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let style = if i == state.selected {
                    theme::current().selected
                } else {
                    ratatui::style::Style::default()
                };
                ListItem::new(Line::from(Span::styled(format!(" {name}"), style)))
            })
            .collect();

        // Keep the selection visible
        let skip = scroll_offset(state.selected, popup.height.saturating_sub(2));
        let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

        frame.render_widget(List::new(items).block(block), popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_requires_all_spinners() {
        let mut form = AlarmFormState::new();
        form.hour.select("07");
        form.minute.select("30");
        assert_eq!(form.time(), None);

        form.second.select("05");
        assert_eq!(form.time(), NaiveTime::from_hms_opt(7, 30, 5));
    }

    #[test]
    fn spinning_follows_active_field() {
        let mut form = AlarmFormState::new();
        form.active_field = form.active_field.next();
        form.spin_down();
        assert_eq!(form.minute.text(), "00");
        assert_eq!(form.hour.text(), "Hour");

        form.active_field = AlarmField::Tone;
        form.spin_down();
        assert_eq!(form.active_field.prev(), AlarmField::Second);
    }

    #[test]
    fn chooser_selection_stays_in_bounds() {
        let mut chooser = ToneChooserState {
            dir: PathBuf::from("/tones"),
            tones: vec![PathBuf::from("/tones/a.wav"), PathBuf::from("/tones/b.mp3")],
            selected: 0,
        };
        chooser.up();
        assert_eq!(chooser.selected, 0);
        chooser.down();
        chooser.down();
        assert_eq!(chooser.current(), Some(&PathBuf::from("/tones/b.mp3")));
    }
}
