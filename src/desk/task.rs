use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::due_date::DueDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        })
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(format!("unknown priority {other:?}")),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is empty")]
    EmptyTitle,
    #[error("description is empty")]
    EmptyDescription,
    #[error("no priority chosen")]
    MissingPriority,
    #[error("no due date chosen")]
    MissingDueDate,
}

/// Uncommitted form input. `priority: None` is the unchosen placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub due_date: DueDate,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Option<Priority>,
        due_date: DueDate,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            due_date,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: Some(task.priority),
            due_date: task.due_date,
        }
    }

    fn validate(&self) -> Result<Priority, ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let priority = self.priority.ok_or(ValidationError::MissingPriority)?;
        if self.due_date.is_unset() {
            return Err(ValidationError::MissingDueDate);
        }
        Ok(priority)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: DueDate,
    pub completed: bool,
}

impl Task {
    pub fn label(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.title, self.description, self.priority, self.due_date
        )
    }
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, draft: TaskDraft) -> Result<&Task, ValidationError> {
        let priority = draft.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "task not added");
        })?;

        self.next_id += 1;
        let task = Task {
            id: TaskId(self.next_id),
            title: draft.title,
            description: draft.description,
            priority,
            due_date: draft.due_date,
            completed: false,
        };
        tracing::info!(task = task.id.0, "task added: {}", task.label());

        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Overwrites every editable field; the completion flag is kept.
    pub fn edit(&mut self, id: TaskId, draft: TaskDraft) -> Result<(), ValidationError> {
        let priority = draft.validate().inspect_err(|e| {
            tracing::warn!(task = id.0, error = %e, "task not edited");
        })?;

        if let Some(task) = self.get_mut(id) {
            task.title = draft.title;
            task.description = draft.description;
            task.priority = priority;
            task.due_date = draft.due_date;
            tracing::info!(task = id.0, "task edited: {}", task.label());
        }
        Ok(())
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            tracing::info!(task = id.0, "task deleted");
        }
        removed
    }

    pub fn set_completed(&mut self, id: TaskId, value: bool) {
        if let Some(task) = self.get_mut(id) {
            task.completed = value;
            tracing::info!(
                task = id.0,
                "task {:?} marked as {}",
                task.title,
                if value { "completed" } else { "active" }
            );
        }
    }

    pub fn render_order(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.tasks.get(index).map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
