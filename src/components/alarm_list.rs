use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::scroll_offset;
use crate::desk::AlarmBook;
use crate::theme;

pub struct AlarmList;

impl AlarmList {
    /// Clock header on top, one row per alarm below.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        now: DateTime<Local>,
        alarms: &AlarmBook,
        selected_index: usize,
    ) {
        let layout = Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).split(area);
        render_clock(frame, layout[0], now);

        let title = format!(" Alarms ({}) ", alarms.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        if alarms.is_empty() {
            let inner = block.inner(layout[1]);
            frame.render_widget(block, layout[1]);
            let msg = Paragraph::new("No alarms. Press n to set one.").style(theme::current().dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = layout[1].width.saturating_sub(2) as usize;
        let skip = scroll_offset(selected_index, layout[1].height.saturating_sub(2));
        let items: Vec<ListItem> = alarms
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, alarm)| {
                let switch = if alarm.active { "[ON ]" } else { "[OFF]" };
                let is_selected = i == selected_index;
                let base = if is_selected {
                    theme::current().selected
                } else {
                    Style::default()
                };
                let time_style = if alarm.active { base } else { base.patch(theme::current().dim) };

                let mut spans = vec![
                    Span::styled(format!(" {switch} "), base),
                    Span::styled(alarm.time_display(), time_style),
                ];

                let tone = format!("  {}", alarm.tone_name());
                if 7 + 8 + tone.chars().count() <= inner_w {
                    spans.push(Span::styled(tone, theme::current().dim));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), layout[1]);
    }
}

fn render_clock(frame: &mut Frame, area: Rect, now: DateTime<Local>) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            now.format("%H:%M:%S").to_string(),
            theme::current().clock,
        )),
        Line::from(Span::styled(
            now.format("%A, %B %d, %Y").to_string(),
            theme::current().dim,
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
