use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered, render_field, Spinner};
use crate::desk::due_date::{self, DueDate};
use crate::theme;

const LABELS: [&str; 5] = ["Year:", "Month:", "Day:", "Hour:", "Minute:"];

#[derive(Debug, Clone)]
pub struct DatePickerState {
    /// Year, month, day, hour, minute.
    pub spinners: [Spinner; 5],
    pub active: usize,
}

impl Default for DatePickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl DatePickerState {
    pub fn new() -> Self {
        Self {
            spinners: [
                Spinner::numeric("Year", due_date::FIRST_YEAR..=due_date::LAST_YEAR, 4),
                Spinner::numeric("Month", 1..=12, 2),
                Spinner::numeric("Day", 1..=31, 2),
                Spinner::numeric("Hour", 0..=23, 2),
                Spinner::numeric("Minute", 0..=59, 2),
            ],
            active: 0,
        }
    }

    pub fn next_field(&mut self) {
        self.active = (self.active + 1) % self.spinners.len();
    }

    pub fn prev_field(&mut self) {
        self.active = (self.active + self.spinners.len() - 1) % self.spinners.len();
    }

    pub fn spin_up(&mut self) {
        self.spinners[self.active].prev();
    }

    pub fn spin_down(&mut self) {
        self.spinners[self.active].next();
    }

    /// Combines the five fields; impossible combinations come back as `Invalid`.
    pub fn resolve(&self) -> DueDate {
        let [year, month, day, hour, minute] = &self.spinners;
        DueDate::from_picker(year.text(), month.text(), day.text(), hour.text(), minute.text())
    }
}

pub struct DatePicker;

impl DatePicker {
    pub fn render(frame: &mut Frame, area: Rect, state: &DatePickerState, current: &DueDate) {
        let popup = centered(area, 40, 11);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Select Due Date and Time ")
            .title_style(theme::current().header)
            .title_bottom(Line::from(Span::styled(
                format!(" {current} "),
                theme::current().dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme::current().accent.remove_modifier(Modifier::BOLD));

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        for (i, (spinner, label)) in state.spinners.iter().zip(LABELS).enumerate() {
            render_field(frame, rows[i], label, spinner.text(), i == state.active);
        }

        let dim = theme::current().dim;
        let key = theme::current().header;
        let help = Line::from(vec![
            Span::styled("\u{2191}\u{2193}", key),
            Span::styled(":Pick ", dim),
            Span::styled("Enter", key),
            Span::styled(":Save ", dim),
            Span::styled("Esc", key),
            Span::styled(":Back", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[6]);
    }
}
