use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::scroll_offset;
use crate::desk::{Priority, TaskList};
use crate::theme;

pub struct TaskListView;

impl TaskListView {
    pub fn render(frame: &mut Frame, area: Rect, tasks: &TaskList, selected_index: usize) {
        let done = tasks.render_order().filter(|t| t.completed).count();
        let title = if area.width >= 30 {
            format!(" To-Do ({done}/{} done) ", tasks.len())
        } else {
            " To-Do ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        if tasks.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No tasks. Press n to add one.").style(theme::current().dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let skip = scroll_offset(selected_index, area.height.saturating_sub(2));

        let items: Vec<ListItem> = tasks
            .render_order()
            .enumerate()
            .skip(skip)
            .map(|(i, task)| {
                let checkbox = if task.completed { "[x]" } else { "[ ]" };
                let is_selected = i == selected_index;

                let label_style = if is_selected {
                    theme::current().selected
                } else if task.completed {
                    theme::current().completed
                } else {
                    Style::default()
                };

                let marker = Span::styled("\u{258e}", Style::default().fg(priority_color(task.priority)));
                let spans = vec![
                    marker,
                    Span::styled(format!("{checkbox} "), label_style),
                    Span::styled(truncate(&task.label(), inner_w.saturating_sub(5)), label_style),
                ];
                ListItem::new(Line::from(spans))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::{DueDate, TaskDraft};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn selected_task_scrolls_into_view() {
        let mut tasks = TaskList::new();
        for n in 0..12 {
            let draft = TaskDraft::new(format!("task{n:02}"), "x", Some(Priority::Low), DueDate::Invalid);
            tasks.add(draft).unwrap();
        }

        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal
            .draw(|frame| TaskListView::render(frame, frame.area(), &tasks, 11))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("task11"));
        assert!(text.contains("task08"));
        assert!(!text.contains("task07"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Don\u{2019}t let yesterday", 8), "Don\u{2019}t...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
