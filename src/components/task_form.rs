use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::date_picker::{DatePicker, DatePickerState};
use super::{centered, render_field, Spinner};
use crate::desk::{DueDate, Priority, Task, TaskDraft, TaskId};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskField {
    Title,
    Description,
    Priority,
    DueDate,
}

impl TaskField {
    pub fn next(&self) -> Self {
        match self {
            TaskField::Title => TaskField::Description,
            TaskField::Description => TaskField::Priority,
            TaskField::Priority => TaskField::DueDate,
            TaskField::DueDate => TaskField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            TaskField::Title => TaskField::DueDate,
            TaskField::Description => TaskField::Title,
            TaskField::Priority => TaskField::Description,
            TaskField::DueDate => TaskField::Priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskFormMode {
    Add,
    Edit(TaskId),
}

#[derive(Debug, Clone)]
pub struct TaskFormState {
    pub mode: TaskFormMode,
    pub title: String,
    pub description: String,
    pub priority: Spinner,
    pub due_date: DueDate,
    pub active_field: TaskField,
    pub picker: Option<DatePickerState>,
}

impl TaskFormState {
    pub fn new() -> Self {
        let values = Priority::ALL.iter().map(|p| p.to_string()).collect();
        Self {
            mode: TaskFormMode::Add,
            title: String::new(),
            description: String::new(),
            priority: Spinner::new("Priority", values),
            due_date: DueDate::Unset,
            active_field: TaskField::Title,
            picker: None,
        }
    }

    /// Pre-filled with the task's current values.
    pub fn edit(task: &Task) -> Self {
        let draft = TaskDraft::from_task(task);
        let mut form = Self::new();
        form.mode = TaskFormMode::Edit(task.id);
        if let Some(priority) = draft.priority {
            form.priority.select(&priority.to_string());
        }
        form.title = draft.title;
        form.description = draft.description;
        form.due_date = draft.due_date;
        form
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            TaskField::Title => self.title.push(c),
            TaskField::Description => self.description.push(c),
            TaskField::Priority | TaskField::DueDate => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            TaskField::Title => {
                self.title.pop();
            }
            TaskField::Description => {
                self.description.pop();
            }
            TaskField::Priority | TaskField::DueDate => {}
        }
    }

    pub fn spin_up(&mut self) {
        if self.active_field == TaskField::Priority {
            self.priority.prev();
        }
    }

    pub fn spin_down(&mut self) {
        if self.active_field == TaskField::Priority {
            self.priority.next();
        }
    }

    pub fn open_picker(&mut self) {
        self.picker = Some(DatePickerState::new());
    }

    /// Applies the picker's value. The picker only closes on a valid date.
    pub fn confirm_picker(&mut self) {
        if let Some(ref picker) = self.picker {
            self.due_date = picker.resolve();
            if matches!(self.due_date, DueDate::At(_)) {
                self.picker = None;
            }
        }
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft::new(
            self.title.clone(),
            self.description.clone(),
            self.priority.value().and_then(|p| p.parse().ok()),
            self.due_date,
        )
    }
}

impl Default for TaskFormState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TaskForm;

impl TaskForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &TaskFormState) {
        let form_area = centered(area, 56, 10);
        frame.render_widget(Clear, form_area);

        let title = match state.mode {
            TaskFormMode::Add => " Add Task ",
            TaskFormMode::Edit(_) => " Edit Task ",
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::current().accent)
            .borders(Borders::ALL)
            .border_style(theme::current().accent.remove_modifier(Modifier::BOLD));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // description
            Constraint::Length(1), // priority
            Constraint::Length(1), // due date
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Title:", &state.title, active == TaskField::Title);
        render_field(frame, rows[1], "Desc:", &state.description, active == TaskField::Description);
        render_field(frame, rows[2], "Prio:", state.priority.text(), active == TaskField::Priority);
        render_field(frame, rows[3], "Due:", &state.due_date.to_string(), active == TaskField::DueDate);

        let dim = theme::current().dim;
        let key = theme::current().header;
        let help = Line::from(vec![
            Span::styled("Tab", key),
            Span::styled(":Next ", dim),
            Span::styled("\u{2191}\u{2193}", key),
            Span::styled(":Pick ", dim),
            Span::styled("Enter", key),
            Span::styled(":Save/Date ", dim),
            Span::styled("Esc", key),
            Span::styled(":Cancel", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);

        if let Some(ref picker) = state.picker {
            DatePicker::render(frame, area, picker, &state.due_date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::TaskList;

    #[test]
    fn typing_goes_to_the_focused_text_field() {
        let mut form = TaskFormState::new();
        for c in "Buy milk".chars() {
            form.input_char(c);
        }
        form.active_field = form.active_field.next();
        form.input_char('2');
        form.input_char('%');
        form.input_char('!');
        form.backspace();

        form.active_field = TaskField::Priority;
        form.input_char('x');
        form.spin_down();

        let draft = form.draft();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, "2%");
        assert_eq!(draft.priority, Some(Priority::Low));
        assert_eq!(draft.due_date, DueDate::Unset);
    }

    #[test]
    fn picker_stays_open_on_invalid_date() {
        let mut form = TaskFormState::new();
        form.open_picker();
        form.confirm_picker();
        assert_eq!(form.due_date, DueDate::Invalid);
        assert!(form.picker.is_some());

        if let Some(ref mut picker) = form.picker {
            for (spinner, v) in picker.spinners.iter_mut().zip(["2025", "06", "15", "18", "30"]) {
                spinner.select(v);
            }
        }
        form.confirm_picker();
        assert_eq!(form.due_date.to_string(), "2025-06-15 18:30");
        assert!(form.picker.is_none());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut list = TaskList::new();
        let task = list
            .add(TaskDraft::new("Call", "mom", Some(Priority::High), DueDate::Invalid))
            .unwrap()
            .clone();

        let form = TaskFormState::edit(&task);
        assert_eq!(form.mode, TaskFormMode::Edit(task.id));
        assert_eq!(form.draft(), TaskDraft::from_task(&task));
    }
}
