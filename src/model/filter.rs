use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::Category;

/// Which text fields the keyword criterion searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordScope {
    /// Title only
    Title,
    /// Title and description
    #[default]
    #[serde(alias = "title_and_description")]
    All,
}

impl KeywordScope {
    pub fn parse(s: &str) -> Result<KeywordScope, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(KeywordScope::Title),
            "all" | "title_and_description" => Ok(KeywordScope::All),
            other => Err(format!(
                "unknown search scope '{}' (expected: title, all)",
                other
            )),
        }
    }
}

/// Category criterion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match against the stored label
    Is(String),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> CategoryFilter {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("all categories") {
            return CategoryFilter::All;
        }
        // Known categories get their canonical label; anything else is kept
        // verbatim so it matches stored text exactly.
        match Category::parse(s) {
            Some(category) => CategoryFilter::Is(category.as_str().to_string()),
            None => CategoryFilter::Is(s.to_string()),
        }
    }
}

/// Completion status criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Result<StatusFilter, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "all status" => Ok(StatusFilter::All),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "pending" | "open" => Ok(StatusFilter::Pending),
            other => Err(format!(
                "unknown status '{}' (expected: all, completed, pending)",
                other
            )),
        }
    }
}

/// Priority criterion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    /// Compared ignoring case
    Is(String),
}

impl PriorityFilter {
    pub fn parse(s: &str) -> PriorityFilter {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("all priority") {
            PriorityFilter::All
        } else {
            PriorityFilter::Is(s.to_string())
        }
    }
}

/// The full set of simultaneously applied criteria.
///
/// `Default` matches every task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub keyword: String,
    pub category: CategoryFilter,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub due_date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Reset every criterion to "match everything"
    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }

    pub fn is_cleared(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

/// Sidebar shortcuts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickFilter {
    All,
    /// Due on the given day, any category or status
    Today(NaiveDate),
    /// Pending tasks only
    Upcoming,
    Category(Category),
}

impl QuickFilter {
    /// Build the criteria for this shortcut, starting from `current`.
    ///
    /// `Today` keeps the priority criterion; every other shortcut starts from
    /// cleared criteria.
    pub fn criteria(&self, current: &FilterCriteria) -> FilterCriteria {
        match self {
            QuickFilter::All => FilterCriteria::default(),
            QuickFilter::Today(today) => FilterCriteria {
                due_date: Some(*today),
                priority: current.priority.clone(),
                ..FilterCriteria::default()
            },
            QuickFilter::Upcoming => FilterCriteria {
                status: StatusFilter::Pending,
                ..FilterCriteria::default()
            },
            QuickFilter::Category(category) => FilterCriteria {
                category: CategoryFilter::Is(category.as_str().to_string()),
                ..FilterCriteria::default()
            },
        }
    }
}
