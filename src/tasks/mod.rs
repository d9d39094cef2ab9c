//! Task list management.
//!
//! Thin CRUD over the persisted task list, plus the focus-mode projection:
//! in focus mode, completed tasks are hidden so only the timer and the work
//! still to do remain visible. The timer engine never mutates tasks; it only
//! ever reads the `status` flag through [`visible_tasks`].

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::types::{Task, TaskIcon};

// ============================================================================
// TaskError
// ============================================================================

/// Errors for task list operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// A task title must not be empty.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// No task with the given id exists.
    #[error("no task with id {0}")]
    NotFound(String),
}

// ============================================================================
// TaskList
// ============================================================================

/// Ordered task collection with millisecond-epoch derived ids.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Creates an empty task list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a task list from persisted tasks.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Appends a new, not-done task and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty after trimming.
    pub fn add(&mut self, title: impl Into<String>, icon: TaskIcon) -> Result<&Task, TaskError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let index = self.tasks.len();
        self.tasks.push(Task {
            id: self.next_id(),
            title,
            icon,
            status: false,
        });
        Ok(&self.tasks[index])
    }

    /// Flips a task's done status.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has the given id.
    pub fn toggle_status(&mut self, id: &str) -> Result<&Task, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        task.status = !task.status;
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has the given id.
    pub fn remove(&mut self, id: &str) -> Result<Task, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        Ok(self.tasks.remove(index))
    }

    /// Returns all tasks in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the tasks visible under the given focus-mode flag.
    ///
    /// See [`visible_tasks`].
    #[must_use]
    pub fn visible(&self, focus_mode: bool) -> Vec<Task> {
        visible_tasks(&self.tasks, focus_mode)
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when the list holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Derives the next id from the current epoch milliseconds, nudged past
    /// the newest existing id so two adds inside the same millisecond stay
    /// unique and ordered.
    fn next_id(&self) -> String {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or(0);
        let mut candidate = now_ms;

        if let Some(last) = self
            .tasks
            .iter()
            .filter_map(|task| task.id.parse::<u128>().ok())
            .max()
        {
            if candidate <= last {
                candidate = last + 1;
            }
        }

        candidate.to_string()
    }
}

// ============================================================================
// Focus filter
// ============================================================================

/// Stateless focus-mode projection: completed tasks are excluded while focus
/// mode is on; outside focus mode every task renders.
#[must_use]
pub fn visible_tasks(tasks: &[Task], focus_mode: bool) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| !(focus_mode && task.status))
        .cloned()
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
