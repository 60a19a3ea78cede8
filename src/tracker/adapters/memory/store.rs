//! In-memory tracker store for tests and embedded use.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::tracker::{
    domain::{
        Activity, Comment, CommentId, Project, ProjectId, Task, TaskId, User, UserId, Username,
    },
    ports::{
        Change, ChangeSet, Page, PageRequest, ProjectQuery, RecordKind, TaskQuery, TrackerStore,
        TrackerStoreError, TrackerStoreResult,
    },
};

/// Thread-safe in-memory tracker store.
///
/// Commits apply in place under the write lock while recording the previous
/// value of every touched record. A failing change set is rolled back from
/// that log and leaves no trace.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    users: HashMap<UserId, User>,
    username_index: HashMap<Username, UserId>,
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, Comment>,
    activities: Vec<Activity>,
}

/// Prior values of the records a commit touched; `None` marks a record that
/// did not exist before.
#[derive(Debug, Default)]
struct UndoLog {
    users: HashMap<UserId, Option<User>>,
    usernames: HashMap<Username, Option<UserId>>,
    projects: HashMap<ProjectId, Option<Project>>,
    tasks: HashMap<TaskId, Option<Task>>,
    comments: HashMap<CommentId, Option<Comment>>,
}

fn remember<K, V>(log: &mut HashMap<K, Option<V>>, records: &HashMap<K, V>, key: &K)
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    log.entry(key.clone())
        .or_insert_with(|| records.get(key).cloned());
}

fn restore<K, V>(log: HashMap<K, Option<V>>, records: &mut HashMap<K, V>)
where
    K: Hash + Eq,
{
    for (key, previous) in log {
        match previous {
            Some(value) => {
                records.insert(key, value);
            }
            None => {
                records.remove(&key);
            }
        }
    }
}

impl InMemoryTrackerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackerStoreResult<RwLockReadGuard<'_, InMemoryTrackerState>> {
        self.state.read().map_err(|err| {
            TrackerStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// A commit in progress against the live state.
struct Staging<'a> {
    state: &'a mut InMemoryTrackerState,
    undo: UndoLog,
    touched_projects: BTreeSet<ProjectId>,
    touched_tasks: BTreeSet<TaskId>,
}

impl<'a> Staging<'a> {
    fn new(state: &'a mut InMemoryTrackerState) -> Self {
        Self {
            state,
            undo: UndoLog::default(),
            touched_projects: BTreeSet::new(),
            touched_tasks: BTreeSet::new(),
        }
    }

    fn rollback(self) {
        let UndoLog {
            users,
            usernames,
            projects,
            tasks,
            comments,
        } = self.undo;
        restore(users, &mut self.state.users);
        restore(usernames, &mut self.state.username_index);
        restore(projects, &mut self.state.projects);
        restore(tasks, &mut self.state.tasks);
        restore(comments, &mut self.state.comments);
    }

    fn apply(&mut self, change: Change) -> TrackerStoreResult<()> {
        match change {
            Change::InsertUser(user) => self.insert_user(user),
            Change::InsertProject(project) => {
                self.require_user(project.created_by())?;
                if self.state.projects.contains_key(&project.id()) {
                    return Err(TrackerStoreError::duplicate(RecordKind::Project, project.id()));
                }
                self.put_project(project);
                Ok(())
            }
            Change::UpdateProject(project) => {
                if !self.state.projects.contains_key(&project.id()) {
                    return Err(TrackerStoreError::not_found(RecordKind::Project, project.id()));
                }
                self.put_project(project);
                Ok(())
            }
            Change::DeleteProject(id) => {
                if !self.state.projects.contains_key(&id) {
                    return Err(TrackerStoreError::not_found(RecordKind::Project, id));
                }
                remember(&mut self.undo.projects, &self.state.projects, &id);
                self.state.projects.remove(&id);
                let orphaned: Vec<TaskId> = self
                    .state
                    .tasks
                    .values()
                    .filter(|task| task.project_id() == id)
                    .map(Task::id)
                    .collect();
                for task_id in orphaned {
                    self.remove_task(task_id);
                }
                Ok(())
            }
            Change::InsertTask(task) => {
                self.require_project(task.project_id())?;
                self.require_user(task.created_by())?;
                if self.state.tasks.contains_key(&task.id()) {
                    return Err(TrackerStoreError::duplicate(RecordKind::Task, task.id()));
                }
                self.put_task(task);
                Ok(())
            }
            Change::UpdateTask(task) => {
                if !self.state.tasks.contains_key(&task.id()) {
                    return Err(TrackerStoreError::not_found(RecordKind::Task, task.id()));
                }
                self.put_task(task);
                Ok(())
            }
            Change::DeleteTask(id) => {
                if !self.state.tasks.contains_key(&id) {
                    return Err(TrackerStoreError::not_found(RecordKind::Task, id));
                }
                self.remove_task(id);
                Ok(())
            }
            Change::InsertComment(comment) => {
                if !self.state.tasks.contains_key(&comment.task_id()) {
                    return Err(TrackerStoreError::not_found(
                        RecordKind::Task,
                        comment.task_id(),
                    ));
                }
                self.require_user(comment.author())?;
                if self.state.comments.contains_key(&comment.id()) {
                    return Err(TrackerStoreError::duplicate(RecordKind::Comment, comment.id()));
                }
                self.put_comment(comment);
                Ok(())
            }
            Change::UpdateComment(comment) => {
                if !self.state.comments.contains_key(&comment.id()) {
                    return Err(TrackerStoreError::not_found(RecordKind::Comment, comment.id()));
                }
                self.put_comment(comment);
                Ok(())
            }
            Change::DeleteComment(id) => {
                if !self.state.comments.contains_key(&id) {
                    return Err(TrackerStoreError::not_found(RecordKind::Comment, id));
                }
                remember(&mut self.undo.comments, &self.state.comments, &id);
                self.state.comments.remove(&id);
                Ok(())
            }
        }
    }

    fn insert_user(&mut self, user: User) -> TrackerStoreResult<()> {
        if self.state.users.contains_key(&user.id()) {
            return Err(TrackerStoreError::duplicate(RecordKind::User, user.id()));
        }
        if self.state.username_index.contains_key(user.username()) {
            return Err(TrackerStoreError::DuplicateUsername(user.username().clone()));
        }
        remember(&mut self.undo.users, &self.state.users, &user.id());
        remember(
            &mut self.undo.usernames,
            &self.state.username_index,
            user.username(),
        );
        self.state
            .username_index
            .insert(user.username().clone(), user.id());
        self.state.users.insert(user.id(), user);
        Ok(())
    }

    fn put_project(&mut self, project: Project) {
        remember(&mut self.undo.projects, &self.state.projects, &project.id());
        self.touched_projects.insert(project.id());
        self.state.projects.insert(project.id(), project);
    }

    fn put_task(&mut self, task: Task) {
        remember(&mut self.undo.tasks, &self.state.tasks, &task.id());
        self.touched_tasks.insert(task.id());
        self.state.tasks.insert(task.id(), task);
    }

    fn put_comment(&mut self, comment: Comment) {
        remember(&mut self.undo.comments, &self.state.comments, &comment.id());
        self.state.comments.insert(comment.id(), comment);
    }

    fn remove_task(&mut self, id: TaskId) {
        remember(&mut self.undo.tasks, &self.state.tasks, &id);
        self.state.tasks.remove(&id);
        let comments: Vec<CommentId> = self
            .state
            .comments
            .values()
            .filter(|comment| comment.task_id() == id)
            .map(Comment::id)
            .collect();
        for comment_id in comments {
            remember(&mut self.undo.comments, &self.state.comments, &comment_id);
            self.state.comments.remove(&comment_id);
        }
    }

    /// Checks that every touched task, and every task of a touched project,
    /// is assigned to nobody or to a member of its project's team.
    fn check_assignees(&self) -> TrackerStoreResult<()> {
        let in_touched_project = self
            .state
            .tasks
            .values()
            .filter(|task| self.touched_projects.contains(&task.project_id()));
        let touched = self
            .touched_tasks
            .iter()
            .filter_map(|id| self.state.tasks.get(id));
        for task in in_touched_project.chain(touched) {
            let Some(assignee) = task.assigned_to() else {
                continue;
            };
            let is_member = self
                .state
                .projects
                .get(&task.project_id())
                .is_some_and(|project| project.is_member(assignee));
            if !is_member {
                return Err(TrackerStoreError::AssigneeNotMember {
                    project_id: task.project_id(),
                    user_id: assignee,
                });
            }
        }
        Ok(())
    }

    fn require_user(&self, id: UserId) -> TrackerStoreResult<()> {
        if self.state.users.contains_key(&id) {
            Ok(())
        } else {
            Err(TrackerStoreError::not_found(RecordKind::User, id))
        }
    }

    fn require_project(&self, id: ProjectId) -> TrackerStoreResult<()> {
        if self.state.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(TrackerStoreError::not_found(RecordKind::Project, id))
        }
    }
}

#[async_trait]
impl TrackerStore for InMemoryTrackerStore {
    async fn find_user(&self, id: UserId) -> TrackerStoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> TrackerStoreResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .username_index
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_project(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn find_task(&self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn find_comment(&self, id: CommentId) -> TrackerStoreResult<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn list_projects(
        &self,
        query: &ProjectQuery,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Project>> {
        let state = self.read()?;
        let mut matching: Vec<Project> = state
            .projects
            .values()
            .filter(|project| query.matches(project))
            .cloned()
            .collect();
        matching.sort_by_key(|project| (Reverse(project.created_at()), project.id()));
        Ok(Page::from_ordered(matching, page))
    }

    async fn list_tasks(
        &self,
        query: &TaskQuery,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Task>> {
        let state = self.read()?;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .filter(|task| {
                query.visible_to.is_none_or(|user| {
                    state
                        .projects
                        .get(&task.project_id())
                        .is_some_and(|project| project.is_member(user))
                })
            })
            .cloned()
            .collect();
        matching.sort_by_key(|task| (Reverse(task.created_at()), task.id()));
        Ok(Page::from_ordered(matching, page))
    }

    async fn find_assigned_tasks(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> TrackerStoreResult<Vec<Task>> {
        let state = self.read()?;
        let mut assigned: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id && task.assigned_to() == Some(user_id))
            .cloned()
            .collect();
        assigned.sort_by_key(|task| (Reverse(task.created_at()), task.id()));
        Ok(assigned)
    }

    async fn list_comments(
        &self,
        task_id: TaskId,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Comment>> {
        let state = self.read()?;
        let mut matching: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect();
        matching.sort_by_key(|comment| (Reverse(comment.created_at()), comment.id()));
        Ok(Page::from_ordered(matching, page))
    }

    async fn list_activities(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Activity>> {
        let state = self.read()?;
        // Stored in commit order.
        let matching: Vec<Activity> = state
            .activities
            .iter()
            .rev()
            .filter(|activity| activity.project_id() == project_id)
            .cloned()
            .collect();
        Ok(Page::from_ordered(matching, page))
    }

    async fn commit(&self, changes: ChangeSet) -> TrackerStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TrackerStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let (writes, activities) = changes.into_parts();
        let mut staging = Staging::new(&mut state);
        let outcome = writes
            .into_iter()
            .try_for_each(|change| staging.apply(change))
            .and_then(|()| staging.check_assignees());
        if let Err(err) = outcome {
            staging.rollback();
            return Err(err);
        }

        state.activities.extend(activities);
        Ok(())
    }
}
