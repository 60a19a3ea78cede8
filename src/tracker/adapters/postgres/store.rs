//! `PostgreSQL` store implementation for tracker persistence.

use super::{
    models::{
        ActivityRow, CommentRow, NewActivityRow, ProjectMemberRow, ProjectRow, TaskRow, UserRow,
    },
    schema::{activities, comments, project_members, projects, tasks, users},
};
use crate::tracker::{
    domain::{
        Activity, ActivityAction, ActivityId, Comment, CommentId, CommentText, EmailAddress,
        PersistedActivityData, PersistedCommentData, PersistedProjectData, PersistedTaskData,
        PersistedUserData, Project, ProjectId, ProjectName, Task, TaskId, TaskPriority,
        TaskStatus, TaskTitle, User, UserId, Username,
    },
    ports::{
        Change, ChangeSet, Page, PageRequest, ProjectQuery, RecordKind, TaskQuery, TrackerStore,
        TrackerStoreError, TrackerStoreResult,
    },
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";
const PROJECT_CREATOR_FK: &str = "projects_created_by_fkey";
const MEMBER_USER_FK: &str = "project_members_user_id_fkey";
const TASK_PROJECT_FK: &str = "tasks_project_id_fkey";
const TASK_ASSIGNEE_MEMBER_FK: &str = "tasks_assignee_member_fkey";
const COMMENT_TASK_FK: &str = "comments_task_id_fkey";

/// `PostgreSQL`-backed tracker store.
///
/// Every [`ChangeSet`] runs inside one database transaction. Project deletion
/// cascades to tasks and comments through foreign keys; activity entries have
/// no foreign key to projects and survive. Task assignees reference the team
/// table, so an assignment and a concurrent member removal cannot both
/// commit.
#[derive(Debug, Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
}

impl PostgresTrackerStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TrackerStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TrackerStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackerStoreError::persistence)?
    }
}

impl From<DieselError> for TrackerStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TrackerStore for PostgresTrackerStore {
    async fn find_user(&self, id: UserId) -> TrackerStoreResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> TrackerStoreResult<Option<User>> {
        let lookup = username.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            let Some(project_row) = row else {
                return Ok(None);
            };
            let mut members = load_members(connection, vec![project_row.id])?;
            let team = members.remove(&project_row.id).unwrap_or_default();
            row_to_project(project_row, team).map(Some)
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_comment(&self, id: CommentId) -> TrackerStoreResult<Option<Comment>> {
        self.run_blocking(move |connection| {
            let row = comments::table
                .find(id.into_inner())
                .select(CommentRow::as_select())
                .first::<CommentRow>(connection)
                .optional()?;
            row.map(row_to_comment).transpose()
        })
        .await
    }

    async fn list_projects(
        &self,
        query: &ProjectQuery,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Project>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let (limit, offset) = limit_offset(page)?;
            let count = filtered_projects(&filter)
                .count()
                .get_result::<i64>(connection)?;
            let rows = filtered_projects(&filter)
                .order((projects::created_at.desc(), projects::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;

            let mut members = load_members(connection, rows.iter().map(|row| row.id).collect())?;
            let items = rows
                .into_iter()
                .map(|row| {
                    let team = members.remove(&row.id).unwrap_or_default();
                    row_to_project(row, team)
                })
                .collect::<TrackerStoreResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_u64(count), page))
        })
        .await
    }

    async fn list_tasks(
        &self,
        query: &TaskQuery,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Task>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let (limit, offset) = limit_offset(page)?;
            let count = filtered_tasks(&filter)
                .count()
                .get_result::<i64>(connection)?;
            let items = filtered_tasks(&filter)
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect::<TrackerStoreResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_u64(count), page))
        })
        .await
    }

    async fn find_assigned_tasks(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> TrackerStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .filter(tasks::assigned_to.eq(user_id.into_inner()))
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn list_comments(
        &self,
        task_id: TaskId,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Comment>> {
        self.run_blocking(move |connection| {
            let (limit, offset) = limit_offset(page)?;
            let task_filter = comments::task_id.eq(task_id.into_inner());
            let count = comments::table
                .filter(task_filter)
                .count()
                .get_result::<i64>(connection)?;
            let items = comments::table
                .filter(task_filter)
                .order((comments::created_at.desc(), comments::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)?
                .into_iter()
                .map(row_to_comment)
                .collect::<TrackerStoreResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_u64(count), page))
        })
        .await
    }

    async fn list_activities(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Activity>> {
        self.run_blocking(move |connection| {
            let (limit, offset) = limit_offset(page)?;
            let project_filter = activities::project_id.eq(project_id.into_inner());
            let count = activities::table
                .filter(project_filter)
                .count()
                .get_result::<i64>(connection)?;
            let items = activities::table
                .filter(project_filter)
                .order((activities::occurred_at.desc(), activities::seq.desc()))
                .limit(limit)
                .offset(offset)
                .select(ActivityRow::as_select())
                .load::<ActivityRow>(connection)?
                .into_iter()
                .map(row_to_activity)
                .collect::<TrackerStoreResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_u64(count), page))
        })
        .await
    }

    async fn commit(&self, changes: ChangeSet) -> TrackerStoreResult<()> {
        let (writes, entries) = changes.into_parts();
        let activity_rows: Vec<NewActivityRow> = entries.iter().map(activity_to_row).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TrackerStoreError, _>(|transaction| {
                for change in writes {
                    apply_change(transaction, change)?;
                }
                if !activity_rows.is_empty() {
                    diesel::insert_into(activities::table)
                        .values(&activity_rows)
                        .execute(transaction)?;
                }
                Ok(())
            })
        })
        .await
    }
}

fn apply_change(connection: &mut PgConnection, change: Change) -> TrackerStoreResult<()> {
    match change {
        Change::InsertUser(user) => {
            diesel::insert_into(users::table)
                .values(&user_to_row(&user))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if constraint_is(info.as_ref(), USERNAME_UNIQUE_CONSTRAINT) =>
                    {
                        TrackerStoreError::DuplicateUsername(user.username().clone())
                    }
                    other => write_error(other, RecordKind::User, user.id().into_inner(), &[]),
                })?;
        }
        Change::InsertProject(project) => {
            let id = project.id().into_inner();
            diesel::insert_into(projects::table)
                .values(&project_to_row(&project))
                .execute(connection)
                .map_err(|err| {
                    write_error(
                        err,
                        RecordKind::Project,
                        id,
                        &[(PROJECT_CREATOR_FK, RecordKind::User, project.created_by().into_inner())],
                    )
                })?;
            insert_members(connection, &project)?;
        }
        Change::UpdateProject(project) => {
            let id = project.id().into_inner();
            let updated = diesel::update(projects::table.find(id))
                .set(&project_to_row(&project))
                .execute(connection)?;
            ensure_touched(updated, RecordKind::Project, id)?;
            sync_members(connection, &project)?;
        }
        Change::DeleteProject(id) => {
            let deleted = diesel::delete(projects::table.find(id.into_inner())).execute(connection)?;
            ensure_touched(deleted, RecordKind::Project, id.into_inner())?;
        }
        Change::InsertTask(task) => {
            let id = task.id().into_inner();
            diesel::insert_into(tasks::table)
                .values(&task_to_row(&task))
                .execute(connection)
                .map_err(|err| {
                    assignee_error(&err, &task).unwrap_or_else(|| {
                        write_error(
                            err,
                            RecordKind::Task,
                            id,
                            &[(TASK_PROJECT_FK, RecordKind::Project, task.project_id().into_inner())],
                        )
                    })
                })?;
        }
        Change::UpdateTask(task) => {
            let id = task.id().into_inner();
            let updated = diesel::update(tasks::table.find(id))
                .set(&task_to_row(&task))
                .execute(connection)
                .map_err(|err| {
                    assignee_error(&err, &task).unwrap_or_else(|| TrackerStoreError::from(err))
                })?;
            ensure_touched(updated, RecordKind::Task, id)?;
        }
        Change::DeleteTask(id) => {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            ensure_touched(deleted, RecordKind::Task, id.into_inner())?;
        }
        Change::InsertComment(comment) => {
            let id = comment.id().into_inner();
            diesel::insert_into(comments::table)
                .values(&comment_to_row(&comment))
                .execute(connection)
                .map_err(|err| {
                    write_error(
                        err,
                        RecordKind::Comment,
                        id,
                        &[(COMMENT_TASK_FK, RecordKind::Task, comment.task_id().into_inner())],
                    )
                })?;
        }
        Change::UpdateComment(comment) => {
            let id = comment.id().into_inner();
            let updated = diesel::update(comments::table.find(id))
                .set(&comment_to_row(&comment))
                .execute(connection)?;
            ensure_touched(updated, RecordKind::Comment, id)?;
        }
        Change::DeleteComment(id) => {
            let deleted = diesel::delete(comments::table.find(id.into_inner())).execute(connection)?;
            ensure_touched(deleted, RecordKind::Comment, id.into_inner())?;
        }
    }
    Ok(())
}

/// Brings the stored team of `project` in line with its member set.
///
/// Departing members are deleted one at a time so that a member still
/// referenced as a task assignee is reported by name.
fn sync_members(connection: &mut PgConnection, project: &Project) -> TrackerStoreResult<()> {
    let project_id = project.id().into_inner();
    let team: Vec<Uuid> = project
        .team_members()
        .iter()
        .copied()
        .map(UserId::into_inner)
        .collect();
    let departed = project_members::table
        .filter(project_members::project_id.eq(project_id))
        .filter(project_members::user_id.ne_all(team))
        .select(project_members::user_id)
        .load::<Uuid>(connection)?;
    for user_id in departed {
        diesel::delete(project_members::table.find((project_id, user_id)))
            .execute(connection)
            .map_err(|err| {
                if is_violation_of(&err, TASK_ASSIGNEE_MEMBER_FK) {
                    TrackerStoreError::AssigneeNotMember {
                        project_id: project.id(),
                        user_id: UserId::from_uuid(user_id),
                    }
                } else {
                    TrackerStoreError::from(err)
                }
            })?;
    }
    insert_members(connection, project)
}

fn insert_members(connection: &mut PgConnection, project: &Project) -> TrackerStoreResult<()> {
    let project_id = project.id().into_inner();
    let rows: Vec<ProjectMemberRow> = project
        .team_members()
        .iter()
        .map(|member| ProjectMemberRow {
            project_id,
            user_id: member.into_inner(),
        })
        .collect();
    diesel::insert_into(project_members::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                if constraint_is(info.as_ref(), MEMBER_USER_FK) =>
            {
                let missing = missing_member(info.as_ref()).unwrap_or(project_id);
                TrackerStoreError::NotFound {
                    kind: RecordKind::User,
                    id: missing,
                }
            }
            other => TrackerStoreError::persistence(other),
        })?;
    Ok(())
}

/// Extracts the offending user id from a membership foreign key violation,
/// whose detail reads `Key (user_id)=(<uuid>) is not present in table "users".`
fn missing_member(info: &dyn DatabaseErrorInformation) -> Option<Uuid> {
    let details = info.details()?;
    let start = details.find(")=(")? + 3;
    let rest = details.get(start..)?;
    let end = rest.find(')')?;
    rest.get(..end).and_then(|raw| Uuid::parse_str(raw).ok())
}

fn filtered_projects(query: &ProjectQuery) -> projects::BoxedQuery<'static, Pg> {
    let mut statement = projects::table.into_boxed();
    if let Some(user) = query.visible_to {
        statement = statement.filter(
            projects::id.eq_any(
                project_members::table
                    .filter(project_members::user_id.eq(user.into_inner()))
                    .select(project_members::project_id),
            ),
        );
    }
    if let Some(creator) = query.created_by {
        statement = statement.filter(projects::created_by.eq(creator.into_inner()));
    }
    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        statement = statement.filter(
            projects::name
                .ilike(pattern.clone())
                .or(projects::description.ilike(pattern)),
        );
    }
    if let Some(after) = query.created_after {
        statement = statement.filter(projects::created_at.ge(after));
    }
    if let Some(before) = query.created_before {
        statement = statement.filter(projects::created_at.le(before));
    }
    statement
}

fn filtered_tasks(query: &TaskQuery) -> tasks::BoxedQuery<'static, Pg> {
    let mut statement = tasks::table.into_boxed();
    if let Some(user) = query.visible_to {
        statement = statement.filter(
            tasks::project_id.eq_any(
                project_members::table
                    .filter(project_members::user_id.eq(user.into_inner()))
                    .select(project_members::project_id),
            ),
        );
    }
    if let Some(project_id) = query.project_id {
        statement = statement.filter(tasks::project_id.eq(project_id.into_inner()));
    }
    if !query.statuses.is_empty() {
        let statuses: Vec<String> = query
            .statuses
            .iter()
            .map(|status| status.as_str().to_owned())
            .collect();
        statement = statement.filter(tasks::status.eq_any(statuses));
    }
    if !query.priorities.is_empty() {
        let priorities: Vec<String> = query
            .priorities
            .iter()
            .map(|priority| priority.as_str().to_owned())
            .collect();
        statement = statement.filter(tasks::priority.eq_any(priorities));
    }
    if let Some(assignee) = query.assigned_to {
        statement = statement.filter(tasks::assigned_to.eq(assignee.into_inner()));
    }
    if let Some(creator) = query.created_by {
        statement = statement.filter(tasks::created_by.eq(creator.into_inner()));
    }
    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        statement = statement.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.ilike(pattern)),
        );
    }
    if let Some(after) = query.created_after {
        statement = statement.filter(tasks::created_at.ge(after));
    }
    if let Some(before) = query.created_before {
        statement = statement.filter(tasks::created_at.le(before));
    }
    if let Some(after) = query.due_after {
        statement = statement.filter(tasks::due_date.ge(after));
    }
    if let Some(before) = query.due_before {
        statement = statement.filter(tasks::due_date.le(before));
    }
    match query.has_due_date {
        Some(true) => statement = statement.filter(tasks::due_date.is_not_null()),
        Some(false) => statement = statement.filter(tasks::due_date.is_null()),
        None => {}
    }
    match query.is_assigned {
        Some(true) => statement = statement.filter(tasks::assigned_to.is_not_null()),
        Some(false) => statement = statement.filter(tasks::assigned_to.is_null()),
        None => {}
    }
    statement
}

fn load_members(
    connection: &mut PgConnection,
    project_ids: Vec<Uuid>,
) -> TrackerStoreResult<HashMap<Uuid, BTreeSet<UserId>>> {
    let pairs = project_members::table
        .filter(project_members::project_id.eq_any(project_ids))
        .select((project_members::project_id, project_members::user_id))
        .load::<(Uuid, Uuid)>(connection)?;
    let mut teams: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
    for (project_id, user_id) in pairs {
        teams
            .entry(project_id)
            .or_default()
            .insert(UserId::from_uuid(user_id));
    }
    Ok(teams)
}

/// Wraps `term` for `ILIKE`, escaping the pattern metacharacters.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn limit_offset(page: PageRequest) -> TrackerStoreResult<(i64, i64)> {
    let limit = i64::from(page.page_size());
    let offset = i64::try_from(page.offset()).map_err(TrackerStoreError::persistence)?;
    Ok((limit, offset))
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

const fn ensure_touched(rows: usize, kind: RecordKind, id: Uuid) -> TrackerStoreResult<()> {
    if rows == 0 {
        Err(TrackerStoreError::NotFound { kind, id })
    } else {
        Ok(())
    }
}

fn constraint_is(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name()
        .is_some_and(|constraint| constraint == name)
}

fn is_violation_of(err: &DieselError, constraint: &str) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
            if constraint_is(info.as_ref(), constraint)
    )
}

/// Maps a write that names an assignee outside the project team.
fn assignee_error(err: &DieselError, task: &Task) -> Option<TrackerStoreError> {
    let user_id = task.assigned_to()?;
    is_violation_of(err, TASK_ASSIGNEE_MEMBER_FK).then(|| TrackerStoreError::AssigneeNotMember {
        project_id: task.project_id(),
        user_id,
    })
}

/// Maps an insert failure: unique violations become duplicates, foreign key
/// violations on a known constraint become not-found parents.
fn write_error(
    err: DieselError,
    kind: RecordKind,
    id: Uuid,
    parents: &[(&str, RecordKind, Uuid)],
) -> TrackerStoreError {
    if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = &err
        && let Some((_, parent_kind, parent_id)) = parents
            .iter()
            .find(|(constraint, _, _)| constraint_is(info.as_ref(), constraint))
    {
        return TrackerStoreError::NotFound {
            kind: *parent_kind,
            id: *parent_id,
        };
    }
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TrackerStoreError::Duplicate { kind, id }
        }
        other => TrackerStoreError::persistence(other),
    }
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        first_name: user.first_name().to_owned(),
        last_name: user.last_name().to_owned(),
        date_joined: user.date_joined(),
    }
}

fn row_to_user(row: UserRow) -> TrackerStoreResult<User> {
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        username: Username::new(row.username).map_err(TrackerStoreError::persistence)?,
        email: EmailAddress::new(row.email).map_err(TrackerStoreError::persistence)?,
        first_name: row.first_name,
        last_name: row.last_name,
        date_joined: row.date_joined,
    }))
}

fn project_to_row(project: &Project) -> ProjectRow {
    ProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().to_owned(),
        created_by: project.created_by().into_inner(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow, team_members: BTreeSet<UserId>) -> TrackerStoreResult<Project> {
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: ProjectName::new(row.name).map_err(TrackerStoreError::persistence)?,
        description: row.description,
        created_by: UserId::from_uuid(row.created_by),
        team_members,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn task_to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        project_id: task.project_id().into_inner(),
        created_by: task.created_by().into_inner(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TrackerStoreResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        project_id,
        created_by,
        assigned_to,
        status,
        priority,
        due_date,
        created_at,
        updated_at,
    } = row;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TrackerStoreError::persistence)?,
        description,
        project_id: ProjectId::from_uuid(project_id),
        created_by: UserId::from_uuid(created_by),
        assigned_to: assigned_to.map(UserId::from_uuid),
        status: TaskStatus::try_from(status.as_str()).map_err(TrackerStoreError::persistence)?,
        priority: TaskPriority::try_from(priority.as_str())
            .map_err(TrackerStoreError::persistence)?,
        due_date,
        created_at,
        updated_at,
    }))
}

fn comment_to_row(comment: &Comment) -> CommentRow {
    CommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task_id().into_inner(),
        author_id: comment.author().into_inner(),
        body: comment.text().as_str().to_owned(),
        created_at: comment.created_at(),
        edited_at: comment.edited_at(),
    }
}

fn row_to_comment(row: CommentRow) -> TrackerStoreResult<Comment> {
    Ok(Comment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        author: UserId::from_uuid(row.author_id),
        text: CommentText::new(row.body).map_err(TrackerStoreError::persistence)?,
        created_at: row.created_at,
        edited_at: row.edited_at,
    }))
}

fn activity_to_row(activity: &Activity) -> NewActivityRow {
    NewActivityRow {
        id: activity.id().into_inner(),
        project_id: activity.project_id().into_inner(),
        actor_id: activity.actor().into_inner(),
        action: activity.action().label().to_owned(),
        details: activity.details().to_owned(),
        occurred_at: activity.timestamp(),
    }
}

fn row_to_activity(row: ActivityRow) -> TrackerStoreResult<Activity> {
    Ok(Activity::from_persisted(PersistedActivityData {
        id: ActivityId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        actor: UserId::from_uuid(row.actor_id),
        action: ActivityAction::try_from(row.action.as_str())
            .map_err(TrackerStoreError::persistence)?,
        details: row.details,
        timestamp: row.occurred_at,
    }))
}
