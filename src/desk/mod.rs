pub mod alarm;
pub mod due_date;
pub mod quote;
pub mod sound;
pub mod store;
pub mod task;

pub use alarm::{Alarm, AlarmBook, AlarmId, MatchMode};
pub use due_date::DueDate;
pub use quote::QuoteBook;
pub use sound::{PlayerLoader, Sound, SoundLoader};
pub use store::JsonStore;
pub use task::{Priority, Task, TaskDraft, TaskId, TaskList};
