use crate::model::filter::{
    CategoryFilter, FilterCriteria, KeywordScope, PriorityFilter, StatusFilter,
};
use crate::model::task::Task;
use crate::ops::store::TaskRef;

/// Does `task` satisfy every criterion?
pub fn matches(task: &Task, criteria: &FilterCriteria, scope: KeywordScope) -> bool {
    keyword_matches(task, &criteria.keyword, scope)
        && category_matches(task, &criteria.category)
        && status_matches(task, criteria.status)
        && priority_matches(task, &criteria.priority)
        && criteria.due_date.is_none_or(|day| task.due_date == day)
}

/// References to the matching tasks, in store order
pub fn apply_filters(tasks: &[Task], criteria: &FilterCriteria, scope: KeywordScope) -> Vec<TaskRef> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| matches(task, criteria, scope))
        .map(|(i, _)| TaskRef(i))
        .collect()
}

/// The matching tasks themselves, in store order
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    criteria: &FilterCriteria,
    scope: KeywordScope,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| matches(task, criteria, scope))
        .collect()
}

fn keyword_matches(task: &Task, keyword: &str, scope: KeywordScope) -> bool {
    if keyword.is_empty() {
        return true;
    }
    let needle = keyword.to_lowercase();
    if task.title.to_lowercase().contains(&needle) {
        return true;
    }
    scope == KeywordScope::All && task.description.to_lowercase().contains(&needle)
}

fn category_matches(task: &Task, filter: &CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Is(category) => task.category == *category,
    }
}

fn status_matches(task: &Task, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Completed => task.completed,
        StatusFilter::Pending => !task.completed,
    }
}

fn priority_matches(task: &Task, filter: &PriorityFilter) -> bool {
    match filter {
        PriorityFilter::All => true,
        PriorityFilter::Is(priority) => task.priority.to_lowercase() == priority.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Task> {
        let mut report = Task::new(
            "Quarterly report",
            "numbers for Q3",
            date(2024, 3, 1),
            "Work",
            "High",
        );
        report.completed = true;
        vec![
            Task::new("Email Bob", "about the report", date(2024, 3, 1), "Work", "Medium"),
            report,
            Task::new("Groceries", "milk, eggs", date(2024, 3, 2), "Home", "low"),
            Task::new("Essay", "", date(2024, 3, 5), "School", "High"),
        ]
    }

    fn titles(tasks: &[Task], refs: &[TaskRef]) -> Vec<String> {
        refs.iter().map(|r| tasks[r.index()].title.clone()).collect()
    }

    #[test]
    fn default_criteria_keep_everything_in_order() {
        let tasks = sample();
        let refs = apply_filters(&tasks, &FilterCriteria::default(), KeywordScope::All);
        assert_eq!(refs, vec![TaskRef(0), TaskRef(1), TaskRef(2), TaskRef(3)]);
    }

    #[test]
    fn category_and_pending_status_combine() {
        let tasks = sample();
        let criteria = FilterCriteria {
            category: CategoryFilter::Is("Work".into()),
            status: StatusFilter::Pending,
            ..Default::default()
        };
        let refs = apply_filters(&tasks, &criteria, KeywordScope::All);
        assert_eq!(titles(&tasks, &refs), vec!["Email Bob"]);
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let tasks = sample();
        let criteria = FilterCriteria {
            category: CategoryFilter::Is("work".into()),
            ..Default::default()
        };
        assert!(apply_filters(&tasks, &criteria, KeywordScope::All).is_empty());
    }

    #[test]
    fn keyword_scope_controls_description_search() {
        let tasks = sample();
        let criteria = FilterCriteria {
            keyword: "REPORT".into(),
            ..Default::default()
        };
        let all = apply_filters(&tasks, &criteria, KeywordScope::All);
        assert_eq!(titles(&tasks, &all), vec!["Email Bob", "Quarterly report"]);
        let title_only = apply_filters(&tasks, &criteria, KeywordScope::Title);
        assert_eq!(titles(&tasks, &title_only), vec!["Quarterly report"]);
    }

    #[test]
    fn priority_ignores_case() {
        let tasks = sample();
        let criteria = FilterCriteria {
            priority: PriorityFilter::Is("LOW".into()),
            ..Default::default()
        };
        let refs = apply_filters(&tasks, &criteria, KeywordScope::All);
        assert_eq!(titles(&tasks, &refs), vec!["Groceries"]);
    }

    #[test]
    fn due_date_matches_exact_day() {
        let tasks = sample();
        let criteria = FilterCriteria {
            due_date: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        let refs = apply_filters(&tasks, &criteria, KeywordScope::All);
        assert_eq!(titles(&tasks, &refs), vec!["Email Bob", "Quarterly report"]);
    }

    #[test]
    fn completed_status() {
        let tasks = sample();
        let criteria = FilterCriteria {
            status: StatusFilter::Completed,
            ..Default::default()
        };
        let refs = apply_filters(&tasks, &criteria, KeywordScope::All);
        assert_eq!(titles(&tasks, &refs), vec!["Quarterly report"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let tasks = sample();
        let criteria = FilterCriteria {
            keyword: "e".into(),
            status: StatusFilter::Pending,
            ..Default::default()
        };
        let once: Vec<Task> = filter_tasks(&tasks, &criteria, KeywordScope::All)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<Task> = filter_tasks(&once, &criteria, KeywordScope::All)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }
}
