//! Listing filters and pagination shared by store adapters.

use crate::tracker::domain::{Project, ProjectId, Task, TaskPriority, TaskStatus, UserId};
use chrono::{DateTime, Utc};

/// One-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a page request; zero values are raised to one.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn page_size(self) -> u32 {
        self.page_size
    }

    /// Returns the number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns a copy whose page size does not exceed `max`.
    #[must_use]
    pub fn capped_at(self, max: u32) -> Self {
        Self::new(self.page, self.page_size.min(max))
    }
}

/// One page of a newest-first listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    count: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wraps the items of `request` out of `count` matches in total.
    #[must_use]
    pub const fn new(items: Vec<T>, count: u64, request: PageRequest) -> Self {
        Self {
            items,
            count,
            request,
        }
    }

    /// Cuts the page selected by `request` out of a full ordered listing.
    #[must_use]
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let count = u64::try_from(all.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.page_size()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self::new(items, count, request)
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the number of matches across all pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns the one-based number of this page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.request.page()
    }

    /// Returns the number of pages; an empty listing still has one page.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.count
            .div_ceil(u64::from(self.request.page_size()))
            .max(1)
    }

    /// Returns whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.current_page()) < self.total_pages()
    }

    /// Returns whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.page() > 1
    }

    /// Converts the items, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            request: self.request,
        }
    }
}

/// Filter over tasks.
///
/// Empty status and priority sets match every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restricts results to projects this user belongs to.
    pub visible_to: Option<UserId>,
    /// Owning project.
    pub project_id: Option<ProjectId>,
    /// Accepted statuses.
    pub statuses: Vec<TaskStatus>,
    /// Accepted priorities.
    pub priorities: Vec<TaskPriority>,
    /// Assignee.
    pub assigned_to: Option<UserId>,
    /// Creator.
    pub created_by: Option<UserId>,
    /// Case-insensitive text searched in title and description.
    pub search: Option<String>,
    /// Inclusive lower bound on the creation timestamp.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp.
    pub created_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on the deadline.
    pub due_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the deadline.
    pub due_before: Option<DateTime<Utc>>,
    /// Whether a deadline must (or must not) be set.
    pub has_due_date: Option<bool>,
    /// Whether an assignee must (or must not) be set.
    pub is_assigned: Option<bool>,
}

impl TaskQuery {
    /// Creates a query matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to one project.
    #[must_use]
    pub const fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Restricts results to the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Restricts results to the given priorities.
    #[must_use]
    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = TaskPriority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    /// Restricts results to tasks assigned to `user`.
    #[must_use]
    pub const fn assigned_to(mut self, user: UserId) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Restricts results to tasks created by `user`.
    #[must_use]
    pub const fn created_by(mut self, user: UserId) -> Self {
        self.created_by = Some(user);
        self
    }

    /// Searches title and description.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Restricts the creation timestamp to `[after, before]`; either end may
    /// be open.
    #[must_use]
    pub const fn created_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    /// Restricts the deadline to `[after, before]`; either end may be open.
    #[must_use]
    pub const fn due_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.due_after = after;
        self.due_before = before;
        self
    }

    /// Requires a deadline to be present (`true`) or absent (`false`).
    #[must_use]
    pub const fn with_due_date(mut self, present: bool) -> Self {
        self.has_due_date = Some(present);
        self
    }

    /// Requires an assignee to be present (`true`) or absent (`false`).
    #[must_use]
    pub const fn with_assignee(mut self, present: bool) -> Self {
        self.is_assigned = Some(present);
        self
    }

    /// Restricts results to projects `user` belongs to.
    #[must_use]
    pub const fn visible_to(mut self, user: UserId) -> Self {
        self.visible_to = Some(user);
        self
    }

    /// Returns whether `task` satisfies every field filter.
    ///
    /// Visibility depends on project membership and is checked by the store.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let due = task.due_date();
        self.project_id.is_none_or(|id| task.project_id() == id)
            && (self.statuses.is_empty() || self.statuses.contains(&task.status()))
            && (self.priorities.is_empty() || self.priorities.contains(&task.priority()))
            && self.assigned_to.is_none_or(|user| task.assigned_to() == Some(user))
            && self.created_by.is_none_or(|user| task.created_by() == user)
            && self.search.as_deref().is_none_or(|term| {
                contains_folded(task.title().as_str(), term)
                    || contains_folded(task.description(), term)
            })
            && self.created_after.is_none_or(|at| task.created_at() >= at)
            && self.created_before.is_none_or(|at| task.created_at() <= at)
            && self.due_after.is_none_or(|at| due.is_some_and(|d| d >= at))
            && self.due_before.is_none_or(|at| due.is_some_and(|d| d <= at))
            && self.has_due_date.is_none_or(|present| due.is_some() == present)
            && self
                .is_assigned
                .is_none_or(|present| task.assigned_to().is_some() == present)
    }
}

/// Filter over projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Restricts results to projects this user belongs to.
    pub visible_to: Option<UserId>,
    /// Creator.
    pub created_by: Option<UserId>,
    /// Case-insensitive text searched in name and description.
    pub search: Option<String>,
    /// Inclusive lower bound on the creation timestamp.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp.
    pub created_before: Option<DateTime<Utc>>,
}

impl ProjectQuery {
    /// Creates a query matching every project.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to projects created by `user`.
    #[must_use]
    pub const fn created_by(mut self, user: UserId) -> Self {
        self.created_by = Some(user);
        self
    }

    /// Searches name and description.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Restricts the creation timestamp to `[after, before]`; either end may
    /// be open.
    #[must_use]
    pub const fn created_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    /// Restricts results to projects `user` belongs to.
    #[must_use]
    pub const fn visible_to(mut self, user: UserId) -> Self {
        self.visible_to = Some(user);
        self
    }

    /// Returns whether `project` satisfies the query, visibility included.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        self.visible_to.is_none_or(|user| project.is_member(user))
            && self.created_by.is_none_or(|user| project.created_by() == user)
            && self.search.as_deref().is_none_or(|term| {
                contains_folded(project.name().as_str(), term)
                    || contains_folded(project.description(), term)
            })
            && self.created_after.is_none_or(|at| project.created_at() >= at)
            && self.created_before.is_none_or(|at| project.created_at() <= at)
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
