pub mod alarm_form;
pub mod alarm_list;
pub mod date_picker;
pub mod quote_view;
pub mod ring_popup;
pub mod spinner;
pub mod status_bar;
pub mod task_form;
pub mod task_list;

pub use alarm_form::AlarmForm;
pub use alarm_list::AlarmList;
pub use quote_view::{FavoritesPopup, QuoteView};
pub use ring_popup::RingPopup;
pub use spinner::Spinner;
pub use status_bar::StatusBar;
pub use task_form::TaskForm;
pub use task_list::TaskListView;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

/// A `w` x `h` rectangle centered in `area`, clamped to fit.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

/// First row to draw so that `selected` stays inside `visible` rows.
pub fn scroll_offset(selected: usize, visible: u16) -> usize {
    selected.saturating_sub((visible as usize).saturating_sub(1))
}

/// One `label value` form row; the focused row gets a cursor.
pub fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        theme::current().selected.add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = Vec::new();
    if !label.is_empty() {
        spans.push(Span::styled(format!("{label:<8}"), theme::current().dim));
    }
    spans.push(Span::styled(format!("{value}{cursor}"), style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_clamps_to_area() {
        let area = Rect::new(10, 5, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(15, 8, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }

    #[test]
    fn scroll_offset_keeps_selection_on_screen() {
        assert_eq!(scroll_offset(0, 4), 0);
        assert_eq!(scroll_offset(3, 4), 0);
        assert_eq!(scroll_offset(4, 4), 1);
        assert_eq!(scroll_offset(9, 4), 6);
        assert_eq!(scroll_offset(2, 0), 2);
    }
}
