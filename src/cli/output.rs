use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::task::Task;
use crate::ops::store::TaskRef;
use crate::ops::summary::Summary;
use crate::util::unicode::fit_to_width;

/// Title column width in list output
const TITLE_WIDTH: usize = 32;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// A task as printed by `--json`: the data-file fields plus its number
#[derive(Serialize)]
pub struct TaskJson<'a> {
    pub number: usize,
    #[serde(flatten)]
    pub task: &'a Task,
}

#[derive(Serialize)]
pub struct ListJson<'a> {
    pub tasks: Vec<TaskJson<'a>>,
    pub shown: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct ChangeJson<'a> {
    pub action: &'a str,
    pub number: usize,
    pub found: bool,
}

pub fn task_to_json(at: TaskRef, task: &Task) -> TaskJson<'_> {
    TaskJson {
        number: at.position(),
        task,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn status_char(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

/// Due-date flag for pending tasks; completed tasks get none
pub fn due_flag(task: &Task, today: NaiveDate) -> Option<&'static str> {
    if task.completed {
        return None;
    }
    if task.due_date == today {
        Some("due today")
    } else if task.due_date < today {
        Some("overdue")
    } else {
        None
    }
}

/// Format a single task as a one-line summary
pub fn format_task_line(at: TaskRef, task: &Task, today: NaiveDate) -> String {
    let flag = due_flag(task, today)
        .map(|f| format!("({})", f))
        .unwrap_or_default();
    let line = format!(
        "[{}] {:>4}  {}  {}  {:<8}  {:<6}  {}",
        status_char(task),
        at.to_string(),
        task.due_date,
        fit_to_width(&task.title, TITLE_WIDTH),
        task.category,
        task.priority,
        flag
    );
    line.trim_end().to_string()
}

/// Format detailed task view
pub fn format_task_detail(at: TaskRef, task: &Task, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("[{}] {} {}", status_char(task), at, task.title));

    match due_flag(task, today) {
        Some(flag) => lines.push(format!("due: {} ({})", task.due_date, flag)),
        None => lines.push(format!("due: {}", task.due_date)),
    }
    lines.push(format!("category: {}", task.category));
    lines.push(format!("priority: {}", task.priority));
    lines.push(format!(
        "status: {}",
        if task.completed { "completed" } else { "pending" }
    ));

    if !task.description.is_empty() {
        lines.push("description:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Format a filtered listing. `total` is the size of the unfiltered list.
pub fn format_listing(rows: &[(TaskRef, &Task)], total: usize, today: NaiveDate) -> Vec<String> {
    if total == 0 {
        return vec!["no tasks".to_string()];
    }
    if rows.is_empty() {
        return vec![format!("no matching tasks (0 of {})", total)];
    }
    let mut lines: Vec<String> = rows
        .iter()
        .map(|(at, task)| format_task_line(*at, task, today))
        .collect();
    if rows.len() != total {
        lines.push(String::new());
        lines.push(format!("{} of {} tasks shown", rows.len(), total));
    }
    lines
}

pub fn format_summary(summary: &Summary) -> Vec<String> {
    vec![
        format!("total:     {}", summary.total),
        format!("completed: {}", summary.completed),
        format!("due today: {}", summary.due_today),
        format!("overdue:   {}", summary.overdue),
        format!("upcoming:  {}", summary.upcoming),
    ]
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse a date argument: `YYYY-MM-DD`, `today`, `tomorrow` or `yesterday`
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        "yesterday" => today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
            format!(
                "invalid date '{}' (expected: YYYY-MM-DD, today, tomorrow, yesterday)",
                s
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent() -> Task {
        Task::new("Pay rent", "Landlord\nacct 42", date(2024, 1, 1), "Home", "High")
    }

    #[test]
    fn task_line_flags_overdue() {
        let line = format_task_line(TaskRef(0), &rent(), date(2024, 1, 2));
        assert_snapshot!(line, @"[ ]   #1  2024-01-01  Pay rent                          Home      High    (overdue)");
    }

    #[test]
    fn completed_task_line_has_no_flag() {
        let mut task = rent();
        task.completed = true;
        let line = format_task_line(TaskRef(9), &task, date(2024, 1, 2));
        assert_snapshot!(line, @"[x]  #10  2024-01-01  Pay rent                          Home      High");
    }

    #[test]
    fn detail_view() {
        let lines = format_task_detail(TaskRef(0), &rent(), date(2024, 1, 1));
        assert_snapshot!(lines.join("\n"), @r"
        [ ] #1 Pay rent
        due: 2024-01-01 (due today)
        category: Home
        priority: High
        status: pending
        description:
          Landlord
          acct 42
        ");
    }

    #[test]
    fn summary_block() {
        let summary = Summary {
            total: 2,
            completed: 1,
            due_today: 0,
            overdue: 1,
            upcoming: 0,
        };
        assert_snapshot!(format_summary(&summary).join("\n"), @r"
        total:     2
        completed: 1
        due today: 0
        overdue:   1
        upcoming:  0
        ");
    }

    #[test]
    fn listing_reports_filtered_count() {
        let task = rent();
        let rows = vec![(TaskRef(1), &task)];
        let lines = format_listing(&rows, 3, date(2024, 1, 1));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "1 of 3 tasks shown");
        assert_eq!(format_listing(&[], 0, date(2024, 1, 1)), vec!["no tasks"]);
        assert_eq!(
            format_listing(&[], 2, date(2024, 1, 1)),
            vec!["no matching tasks (0 of 2)"]
        );
    }

    #[test]
    fn json_flattens_task_fields() {
        let task = rent();
        let value = serde_json::to_value(task_to_json(TaskRef(2), &task)).unwrap();
        assert_eq!(value["number"], 3);
        assert_eq!(value["dueDate"], "2024-01-01");
        assert_eq!(value["title"], "Pay rent");
    }

    #[test]
    fn parse_date_keywords_and_iso() {
        let today = date(2024, 2, 28);
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(parse_date("Tomorrow", today).unwrap(), date(2024, 2, 29));
        assert_eq!(parse_date("yesterday", today).unwrap(), date(2024, 2, 27));
        assert_eq!(parse_date("2024-12-31", today).unwrap(), date(2024, 12, 31));
        assert!(parse_date("31/12/2024", today).is_err());
    }
}
