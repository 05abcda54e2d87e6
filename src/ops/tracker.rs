//! The task list as the front end sees it.
//!
//! A [`Tracker`] owns the store, the active filter and the filtered view.
//! Every call that changes a task runs one cascade before it returns:
//! recompute the summary, save the file, recompute the filtered view, then
//! notify subscribers. Calls that change nothing (stale references, rejected
//! edits) run no cascade.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::io::task_io;
use crate::model::filter::{FilterCriteria, KeywordScope, QuickFilter};
use crate::model::task::{Task, TaskDraft, TaskPatch, ValidationErrors};
use crate::ops::filter::apply_filters;
use crate::ops::store::{StoreChange, TaskRef, TaskStore};
use crate::ops::summary::{Summary, summarize};

/// Source of "today" for due-date classification
pub type Clock = Box<dyn Fn() -> NaiveDate>;

/// Handle returned by [`Tracker::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Delivered to subscribers once per successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub change: StoreChange,
    /// Summary after the change
    pub summary: Summary,
    /// Whether the save after this change reached the data file
    pub persisted: bool,
}

type Subscriber = Box<dyn FnMut(&ChangeNotice)>;

pub struct Tracker {
    store: TaskStore,
    data_file: Option<PathBuf>,
    scope: KeywordScope,
    criteria: FilterCriteria,
    view: Vec<TaskRef>,
    clock: Clock,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Tracker {
    /// Load the data file and build the initial summary and view.
    /// A missing or unreadable file starts an empty list.
    pub fn open(data_file: &Path, scope: KeywordScope) -> Self {
        let tasks = task_io::load_tasks(data_file);
        Self::build(TaskStore::from_tasks(tasks), Some(data_file.to_path_buf()), scope)
    }

    /// A tracker with no backing file; saves are skipped
    pub fn in_memory(tasks: Vec<Task>, scope: KeywordScope) -> Self {
        Self::build(TaskStore::from_tasks(tasks), None, scope)
    }

    fn build(store: TaskStore, data_file: Option<PathBuf>, scope: KeywordScope) -> Self {
        let mut tracker = Tracker {
            store,
            data_file,
            scope,
            criteria: FilterCriteria::default(),
            view: Vec::new(),
            clock: Box::new(local_today),
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        tracker.refresh();
        tracker
    }

    /// Replace the clock and recompute date-dependent state
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + 'static) -> Self {
        self.clock = Box::new(clock);
        self.refresh();
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Validate `draft` and append it as a new pending task
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<TaskRef, ValidationErrors> {
        let task = draft.validate()?;
        let at = self.store.add(task);
        self.commit(StoreChange::Added(at));
        Ok(at)
    }

    /// Replace every editable field of the referenced task.
    ///
    /// The completion flag is kept. Returns `Ok(false)` for a stale reference.
    pub fn update_task(&mut self, at: TaskRef, draft: &TaskDraft) -> Result<bool, ValidationErrors> {
        let mut task = draft.validate()?;
        let Some(current) = self.store.get(at) else {
            return Ok(false);
        };
        task.completed = current.completed;
        Ok(self.replace(at, task))
    }

    /// Apply a partial edit. The merged record must still be valid.
    ///
    /// Returns `Ok(false)` for a stale reference. An empty patch changes
    /// nothing and runs no cascade.
    pub fn patch_task(&mut self, at: TaskRef, patch: &TaskPatch) -> Result<bool, ValidationErrors> {
        let Some(current) = self.store.get(at) else {
            return Ok(false);
        };
        if patch.is_empty() {
            return Ok(true);
        }
        let mut merged = current.clone();
        patch.apply_to(&mut merged);
        let mut task = TaskDraft::from_task(&merged).validate()?;
        task.completed = merged.completed;
        Ok(self.replace(at, task))
    }

    fn replace(&mut self, at: TaskRef, task: Task) -> bool {
        if !self.store.replace(at, task) {
            return false;
        }
        self.commit(StoreChange::Updated(at));
        true
    }

    /// Check or uncheck a task. Returns false for a stale reference.
    pub fn set_completed(&mut self, at: TaskRef, completed: bool) -> bool {
        let Some(current) = self.store.get(at) else {
            return false;
        };
        if current.completed == completed {
            return true;
        }
        let patch = TaskPatch {
            completed: Some(completed),
            ..Default::default()
        };
        if !self.store.update(at, &patch) {
            return false;
        }
        self.commit(StoreChange::Updated(at));
        true
    }

    /// Remove a task. `None` for a stale reference.
    pub fn delete_task(&mut self, at: TaskRef) -> Option<Task> {
        let task = self.store.remove(at)?;
        self.commit(StoreChange::Removed {
            at,
            task: task.clone(),
        });
        Some(task)
    }

    /// Save the whole list now. Returns whether the file was written.
    pub fn flush(&self) -> bool {
        match &self.data_file {
            Some(path) => task_io::save_tasks(path, self.store.list()),
            None => false,
        }
    }

    fn commit(&mut self, change: StoreChange) {
        tracing::debug!(?change, "task list changed");
        let summary = self.summary();
        let persisted = self.flush();
        self.recompute_view();
        let notice = ChangeNotice {
            change,
            summary,
            persisted,
        };
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&notice);
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn list_tasks(&self) -> &[Task] {
        self.store.list()
    }

    pub fn get(&self, at: TaskRef) -> Option<&Task> {
        self.store.get(at)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Counts over the whole list, computed against the clock's current date
    pub fn summary(&self) -> Summary {
        summarize(self.store.list(), self.today())
    }

    /// Recompute the filtered view against the current clock
    pub fn refresh(&mut self) {
        self.recompute_view();
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn scope(&self) -> KeywordScope {
        self.scope
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute_view();
    }

    pub fn set_scope(&mut self, scope: KeywordScope) {
        self.scope = scope;
        self.recompute_view();
    }

    /// Apply a sidebar shortcut
    pub fn apply_quick_filter(&mut self, quick: QuickFilter) {
        let criteria = quick.criteria(&self.criteria);
        self.set_filter(criteria);
    }

    /// The "due today" shortcut for this tracker's clock
    pub fn today_filter(&self) -> QuickFilter {
        QuickFilter::Today(self.today())
    }

    pub fn clear_filter(&mut self) {
        self.criteria.clear();
        self.recompute_view();
    }

    /// References of the tasks passing the active filter, in store order
    pub fn visible_refs(&self) -> &[TaskRef] {
        &self.view
    }

    /// Tasks passing the active filter, with their references
    pub fn visible(&self) -> Vec<(TaskRef, &Task)> {
        self.view
            .iter()
            .filter_map(|&at| self.store.get(at).map(|task| (at, task)))
            .collect()
    }

    fn recompute_view(&mut self) {
        self.view = apply_filters(self.store.list(), &self.criteria, self.scope);
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Register a callback run after every successful mutation
    pub fn subscribe(&mut self, callback: impl FnMut(&ChangeNotice) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}
