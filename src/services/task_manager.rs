use gpui::{App, AppContext, Entity, Global};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> u64 {
  TASK_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
  Running,
  Completed,
  Failed(String),
}

/// A tracked async operation, e.g. one reservation submission
#[derive(Debug, Clone)]
pub struct Task {
  pub id: u64,
  pub description: String,
  pub status: TaskStatus,
}

impl Task {
  pub fn new(description: impl Into<String>) -> Self {
    Self {
      id: next_task_id(),
      description: description.into(),
      status: TaskStatus::Running,
    }
  }

  pub fn is_running(&self) -> bool {
    matches!(self.status, TaskStatus::Running)
  }
}

#[derive(Default)]
pub struct TaskManager {
  tasks: HashMap<u64, Task>,
}

impl TaskManager {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start a new task and return its ID
  pub fn start(&mut self, description: impl Into<String>) -> u64 {
    let task = Task::new(description);
    let id = task.id;
    self.tasks.insert(id, task);
    id
  }

  pub fn complete(&mut self, id: u64) {
    if let Some(task) = self.tasks.get_mut(&id) {
      task.status = TaskStatus::Completed;
    }
  }

  pub fn fail(&mut self, id: u64, error: String) {
    if let Some(task) = self.tasks.get_mut(&id) {
      task.status = TaskStatus::Failed(error);
    }
  }

  pub fn running_count(&self) -> usize {
    self.tasks.values().filter(|t| t.is_running()).count()
  }

  pub fn get(&self, id: u64) -> Option<&Task> {
    self.tasks.get(&id)
  }
}

/// Global wrapper
pub struct GlobalTaskManager(pub Entity<TaskManager>);

impl Global for GlobalTaskManager {}

/// Initialize the global task manager
pub fn init_task_manager(cx: &mut App) -> Entity<TaskManager> {
  let manager = cx.new(|_cx| TaskManager::new());
  cx.set_global(GlobalTaskManager(manager.clone()));
  manager
}

/// Get the global task manager
pub fn task_manager(cx: &App) -> Entity<TaskManager> {
  cx.global::<GlobalTaskManager>().0.clone()
}

/// Start a task and return its ID
pub fn start_task(cx: &mut App, description: String) -> u64 {
  let manager = task_manager(cx);
  manager.update(cx, |manager, _cx| manager.start(description))
}

/// Mark a task as completed
pub fn complete_task(cx: &mut App, id: u64) {
  let manager = task_manager(cx);
  manager.update(cx, |manager, _cx| manager.complete(id));
}

/// Mark a task as failed
pub fn fail_task(cx: &mut App, id: u64, error: String) {
  let manager = task_manager(cx);
  manager.update(cx, |manager, _cx| manager.fail(id, error));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_task_lifecycle() {
    let mut manager = TaskManager::new();

    let id = manager.start("Reserving machine...");
    assert_eq!(manager.running_count(), 1);
    assert!(manager.get(id).is_some_and(Task::is_running));

    manager.complete(id);
    assert_eq!(manager.running_count(), 0);
    assert_eq!(manager.get(id).map(|t| t.status.clone()), Some(TaskStatus::Completed));
  }

  #[test]
  fn test_task_failure_keeps_error() {
    let mut manager = TaskManager::new();

    let id = manager.start("Reserving machine...");
    manager.fail(id, "timeout".to_string());
    assert_eq!(
      manager.get(id).map(|t| t.status.clone()),
      Some(TaskStatus::Failed("timeout".to_string()))
    );
  }

  #[test]
  fn test_task_ids_are_unique() {
    let mut manager = TaskManager::new();
    let a = manager.start("a");
    let b = manager.start("b");
    assert_ne!(a, b);
  }
}
