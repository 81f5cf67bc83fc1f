use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::ViewMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, mode: ViewMode, message: Option<&str>) {
        let w = area.width as usize;

        let mode_str = match mode {
            ViewMode::Alarms => "[1]Alarms",
            ViewMode::Quotes => "[2]Quote",
            ViewMode::Tasks => "[3]To-Do",
        };

        // Show status message if present, otherwise show context-aware hints
        let right_text = match message {
            Some(msg) => format!(" {msg} "),
            None => match mode {
                ViewMode::Alarms if w >= 60 => " n:New jk:Move Sp:On/Off ?:Help q:Quit ",
                ViewMode::Quotes if w >= 60 => " f:Save favorite v:Favorites ?:Help q:Quit ",
                ViewMode::Tasks if w >= 70 => " n:Add e:Edit d:Del Sp:Done jk:Move ?:Help q:Quit ",
                _ => " ?:Help q:Quit ",
            }
            .to_string(),
        };

        let left = format!(" {mode_str} ");
        let padding = " ".repeat(w.saturating_sub(left.len() + right_text.chars().count()));
        let style = theme::current().status;

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right_text, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
