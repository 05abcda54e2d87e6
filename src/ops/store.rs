use std::fmt;

use crate::model::task::{Task, TaskPatch};

/// Position of a task in the store.
///
/// Tasks carry no id, so a reference is only as good as the store state it
/// was taken from. Operations given a reference past the end are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskRef(pub usize);

impl TaskRef {
    pub fn index(self) -> usize {
        self.0
    }

    /// From a 1-based display position. `0` has no task.
    pub fn from_position(position: usize) -> Option<TaskRef> {
        position.checked_sub(1).map(TaskRef)
    }

    /// 1-based display position
    pub fn position(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.position())
    }
}

/// What a successful mutation did, as reported to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(TaskRef),
    Updated(TaskRef),
    /// The removed task, and where it was
    Removed { at: TaskRef, task: Task },
}

/// Ordered, in-memory task collection.
///
/// Insertion order is preserved and duplicates are allowed. Methods taking a
/// stale reference change nothing and report it (`false` / `None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskStore { tasks }
    }

    /// Append a task
    pub fn add(&mut self, task: Task) -> TaskRef {
        self.tasks.push(task);
        TaskRef(self.tasks.len() - 1)
    }

    /// Apply every field of `patch` to the referenced task in one step
    pub fn update(&mut self, at: TaskRef, patch: &TaskPatch) -> bool {
        match self.tasks.get_mut(at.index()) {
            Some(task) => {
                patch.apply_to(task);
                true
            }
            None => false,
        }
    }

    /// Replace the referenced task's fields wholesale
    pub fn replace(&mut self, at: TaskRef, task: Task) -> bool {
        match self.tasks.get_mut(at.index()) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Remove the referenced task. Later tasks shift down by one.
    pub fn remove(&mut self, at: TaskRef) -> Option<Task> {
        if at.index() >= self.tasks.len() {
            return None;
        }
        Some(self.tasks.remove(at.index()))
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, at: TaskRef) -> Option<&Task> {
        self.tasks.get(at.index())
    }

    /// First task equal to `task`, field for field
    pub fn position_of(&self, task: &Task) -> Option<TaskRef> {
        self.tasks.iter().position(|t| t == task).map(TaskRef)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}
