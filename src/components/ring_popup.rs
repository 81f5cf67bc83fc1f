use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered;
use crate::desk::Alarm;
use crate::theme;

pub struct RingPopup;

impl RingPopup {
    pub fn render(frame: &mut Frame, area: Rect, alarm: &Alarm, has_sound: bool, snooze_minutes: u32) {
        let popup = centered(area, 40, 9);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Alarm Ringing! ")
            .title_style(theme::current().ringing)
            .borders(Borders::ALL)
            .border_style(theme::current().ringing);

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let key = theme::current().header;
        let dim = theme::current().dim;
        let tone = if has_sound {
            Span::styled(format!("\u{266a} {}", alarm.tone_name()), dim)
        } else {
            Span::styled("(no sound)", dim)
        };

        let lines = vec![
            Line::from(Span::styled(alarm.time_display(), theme::current().clock)),
            Line::from(tone),
            Line::from(""),
            Line::from(vec![
                Span::styled("d", key),
                Span::styled(":Dismiss  ", dim),
                Span::styled("s", key),
                Span::styled(format!(":Snooze {snooze_minutes}m"), dim),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}
