use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed set of task categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Personal,
    School,
    Home,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::School,
        Category::Home,
        Category::Other,
    ];

    /// The label stored in the data file
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::School => "School",
            Category::Home => "Home",
            Category::Other => "Other",
        }
    }

    /// Parse a category label, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        let s = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do record.
///
/// Fields are plain data. `category` and `priority` hold whatever text was
/// stored; use [`TaskDraft::validate`] to enforce the enumerated sets before
/// a task reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Serialized as `YYYY-MM-DD`
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a new, not yet completed task
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        category: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Task {
            title: title.into(),
            description: description.into(),
            due_date,
            category: category.into(),
            priority: priority.into(),
            completed: false,
        }
    }

    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    pub fn priority_kind(&self) -> Option<Priority> {
        Priority::parse(&self.priority)
    }
}

/// Validation failure: every rule that did not hold, in form order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .messages.join("; "))]
pub struct ValidationErrors {
    pub messages: Vec<String>,
}

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}

/// Field values as entered in a form, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

impl TaskDraft {
    /// Prefill a draft from an existing task (edit mode)
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: Some(task.due_date),
            category: Some(task.category.clone()),
            priority: Some(task.priority.clone()),
        }
    }

    /// Check every field rule and build a new (not completed) task.
    ///
    /// Category and priority are normalized to their canonical labels.
    pub fn validate(&self) -> Result<Task, ValidationErrors> {
        let mut messages = Vec::new();

        if self.title.trim().is_empty() {
            messages.push("Title cannot be empty!".to_string());
        }
        if self.due_date.is_none() {
            messages.push("Please select a Due Date!".to_string());
        }

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                messages.push("Please select a Category!".to_string());
                None
            }
            Some(raw) => {
                let parsed = Category::parse(raw);
                if parsed.is_none() {
                    messages.push(format!(
                        "Unknown category '{}' (expected: Work, Personal, School, Home, Other)",
                        raw
                    ));
                }
                parsed
            }
        };

        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => {
                messages.push("Please select a Priority!".to_string());
                None
            }
            Some(raw) => {
                let parsed = Priority::parse(raw);
                if parsed.is_none() {
                    messages.push(format!(
                        "Unknown priority '{}' (expected: High, Medium, Low)",
                        raw
                    ));
                }
                parsed
            }
        };

        match (self.due_date, category, priority) {
            (Some(due_date), Some(category), Some(priority)) if messages.is_empty() => {
                Ok(Task::new(
                    self.title.clone(),
                    self.description.clone(),
                    due_date,
                    category.as_str(),
                    priority.as_str(),
                ))
            }
            _ => Err(ValidationErrors { messages }),
        }
    }
}

/// A partial edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }

    /// Write every set field into `task`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(priority) = &self.priority {
            task.priority = priority.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_draft() -> TaskDraft {
        TaskDraft {
            title: "Pay rent".into(),
            description: "Transfer before noon".into(),
            due_date: Some(date(2024, 1, 1)),
            category: Some("home".into()),
            priority: Some(" HIGH ".into()),
        }
    }

    #[test]
    fn new_task_starts_pending() {
        let task = Task::new("a", "", date(2024, 1, 1), "Work", "Low");
        assert!(!task.completed);
    }

    #[test]
    fn validate_normalizes_labels() {
        let task = full_draft().validate().unwrap();
        assert_eq!(task.category, "Home");
        assert_eq!(task.priority, "High");
        assert_eq!(task.description, "Transfer before noon");
        assert!(!task.completed);
    }

    #[test]
    fn validate_reports_every_missing_field_in_order() {
        let draft = TaskDraft {
            title: "   ".into(),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err.messages,
            vec![
                "Title cannot be empty!",
                "Please select a Due Date!",
                "Please select a Category!",
                "Please select a Priority!",
            ]
        );
    }

    #[test]
    fn validate_rejects_unknown_labels() {
        let draft = TaskDraft {
            category: Some("Garden".into()),
            priority: Some("Urgent".into()),
            ..full_draft()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.messages.len(), 2);
        assert!(err.messages[0].contains("Garden"));
        assert!(err.messages[1].contains("Urgent"));
    }

    #[test]
    fn draft_from_task_round_trips() {
        let task = full_draft().validate().unwrap();
        let again = TaskDraft::from_task(&task).validate().unwrap();
        assert_eq!(task, again);
    }

    #[test]
    fn patch_touches_only_set_fields() {
        let mut task = Task::new("a", "b", date(2024, 1, 1), "Work", "Low");
        let patch = TaskPatch {
            priority: Some("High".into()),
            completed: Some(true),
            ..Default::default()
        };
        patch.apply_to(&mut task);
        assert_eq!(task.title, "a");
        assert_eq!(task.priority, "High");
        assert!(task.completed);
        assert!(!patch.is_empty());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn serde_uses_camel_case_due_date() {
        let task = Task::new("a", "", date(2024, 3, 9), "Work", "Low");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2024-03-09");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn serde_defaults_on_minimal_object() {
        let task: Task = serde_json::from_str(r#"{"dueDate":"2024-01-01","extra":1}"#).unwrap();
        assert_eq!(task.title, "");
        assert_eq!(task.description, "");
        assert_eq!(task.category, "");
        assert_eq!(task.priority, "");
        assert!(!task.completed);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("school"), Some(Category::School));
        assert_eq!(Category::parse("nope"), None);
        assert_eq!(Priority::parse("medium"), Some(Priority::Medium));
    }
}
