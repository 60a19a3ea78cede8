//! Comment operations.

use super::{TrackerResult, TrackerService};
use crate::tracker::{
    domain::{
        Action, ActivityRecorder, Comment, CommentId, CommentText, EntityChange, Resource,
        Snapshot, TaskId, UserId,
    },
    ports::{Change, ChangeSet, Page, PageRequest, TrackerStore},
};
use mockable::Clock;

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Posts a comment on a task. Any member of the task's project may comment.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not a team
    /// member and [`super::TrackerError::Validation`] for blank text.
    pub async fn add_comment(
        &self,
        actor: UserId,
        task_id: TaskId,
        text: &str,
    ) -> TrackerResult<Comment> {
        let (task, project) = self.require_task(task_id).await?;
        self.check(
            actor,
            Resource::Task {
                task: &task,
                project: &project,
            },
            Action::AddComment,
        )?;

        let comment = Comment::new(task_id, actor, CommentText::new(text)?, &*self.clock);

        let names = self.user_names([actor]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::InsertComment(comment.clone()));
        changes.record(recorder.record(EntityChange::Created(Snapshot::Comment {
            comment: &comment,
            task: &task,
        })));
        self.commit(changes).await?;

        tracing::info!(comment_id = %comment.id(), task_id = %task_id, actor = %actor, "added comment");
        Ok(comment)
    }

    /// Returns a comment visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] for an unknown comment and
    /// [`super::TrackerError::Forbidden`] when `actor` is not a member of the
    /// owning project.
    pub async fn get_comment(&self, actor: UserId, id: CommentId) -> TrackerResult<Comment> {
        tracing::debug!(comment_id = %id, actor = %actor, "getting comment");
        let (comment, task, project) = self.require_comment(id).await?;
        self.check(
            actor,
            Resource::Comment {
                comment: &comment,
                task: &task,
                project: &project,
            },
            Action::Read,
        )?;
        Ok(comment)
    }

    /// Lists the comments of a task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` may not read
    /// the task.
    pub async fn list_comments(
        &self,
        actor: UserId,
        task_id: TaskId,
        page: Option<PageRequest>,
    ) -> TrackerResult<Page<Comment>> {
        let (task, project) = self.require_task(task_id).await?;
        self.check(
            actor,
            Resource::Task {
                task: &task,
                project: &project,
            },
            Action::Read,
        )?;
        let request = self.page_request(page, self.pagination.large_page_size);
        tracing::debug!(task_id = %task_id, actor = %actor, page = request.page(), "listing comments");
        Ok(self.store.list_comments(task_id, request).await?)
    }

    /// Replaces the text of a comment. Author only; not recorded as activity.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not the
    /// author and [`super::TrackerError::Validation`] for blank text.
    pub async fn edit_comment(
        &self,
        actor: UserId,
        id: CommentId,
        text: &str,
    ) -> TrackerResult<Comment> {
        let (mut comment, task, project) = self.require_comment(id).await?;
        self.check(
            actor,
            Resource::Comment {
                comment: &comment,
                task: &task,
                project: &project,
            },
            Action::Edit,
        )?;

        comment.edit(CommentText::new(text)?, &*self.clock);
        self.commit(ChangeSet::new().with(Change::UpdateComment(comment.clone())))
            .await?;

        tracing::info!(comment_id = %id, actor = %actor, "edited comment");
        Ok(comment)
    }

    /// Deletes a comment. Author only.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not the
    /// author.
    pub async fn delete_comment(&self, actor: UserId, id: CommentId) -> TrackerResult<()> {
        let (comment, task, project) = self.require_comment(id).await?;
        self.check(
            actor,
            Resource::Comment {
                comment: &comment,
                task: &task,
                project: &project,
            },
            Action::Delete,
        )?;

        let names = self.user_names([actor]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::DeleteComment(id));
        changes.record(recorder.record(EntityChange::Deleted(Snapshot::Comment {
            comment: &comment,
            task: &task,
        })));
        self.commit(changes).await?;

        tracing::info!(comment_id = %id, actor = %actor, "deleted comment");
        Ok(())
    }
}
