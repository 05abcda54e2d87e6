use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::Task;

/// Aggregate counts over the whole task list.
///
/// `completed + due_today + overdue + upcoming == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub due_today: usize,
    pub overdue: usize,
    pub upcoming: usize,
}

/// Count tasks by completion and by due date relative to `today`.
/// Completed tasks are never counted as due, overdue or upcoming.
pub fn summarize(tasks: &[Task], today: NaiveDate) -> Summary {
    let mut summary = Summary::default();
    for task in tasks {
        summary.total += 1;
        if task.completed {
            summary.completed += 1;
            continue;
        }
        match task.due_date.cmp(&today) {
            Ordering::Equal => summary.due_today += 1,
            Ordering::Less => summary.overdue += 1,
            Ordering::Greater => summary.upcoming += 1,
        }
    }
    summary
}
