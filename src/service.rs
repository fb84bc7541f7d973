//! To-do use cases
//!
//! Validation, the completion toggle, and the reminder policy live here, on top
//! of the repository and the reminder port. Validation runs before anything is
//! written.

use chrono::{DateTime, Local, Utc};
use std::sync::Arc;

use crate::error::{Result, StoreError, ValidationError};
use crate::reminder::ReminderScheduler;
use crate::repository::TaskRepository;
use crate::todo::{Task, TaskFilter, TaskPage, is_completed, is_expired, local_date_today};
use crate::validation;

pub struct TodoService {
    repository: TaskRepository,
    reminders: Arc<dyn ReminderScheduler>,
}

impl TodoService {
    pub fn new(repository: TaskRepository, reminders: Arc<dyn ReminderScheduler>) -> Self {
        Self {
            repository,
            reminders,
        }
    }

    pub fn repository(&self) -> &TaskRepository {
        &self.repository
    }

    /// Validate and insert `task`, returning it with its assigned id.
    pub async fn add_task(&self, mut task: Task) -> Result<Task> {
        validation::validate_task(&mut task)?;
        task.id = self.repository.insert(task.clone()).await?;
        tracing::info!(id = task.id, daily = task.is_daily, "task added");
        self.sync_reminder(&task);
        Ok(task)
    }

    /// Validate and save an edited task. `created_at` is kept from the stored row.
    pub async fn update_task(&self, mut task: Task) -> Result<Task> {
        validation::validate_task(&mut task)?;
        let stored = self.get_task(task.id).await?;
        task.created_at = stored.created_at;
        self.repository.update(task.clone()).await?;
        tracing::info!(id = task.id, "task updated");
        self.sync_reminder(&task);
        Ok(task)
    }

    /// Flip completion as of `now`.
    ///
    /// A task that counts as completed today is reopened; anything else is
    /// marked completed at `now`. For daily tasks this means a completion from a
    /// previous day is simply replaced.
    pub async fn toggle_completion(&self, id: i64, now: DateTime<Utc>) -> Result<Task> {
        let mut task = self.get_task(id).await?;
        let today = now.with_timezone(&Local).date_naive();
        task.completed_at = if is_completed(&task, today) {
            None
        } else {
            Some(now)
        };
        self.repository.update(task.clone()).await?;
        tracing::info!(id, completed = task.completed_at.is_some(), "completion toggled");
        Ok(task)
    }

    pub async fn delete_task(&self, id: i64) -> Result<Task> {
        let task = self.get_task(id).await?;
        self.repository.delete(task.clone()).await?;
        self.reminders.cancel(id);
        tracing::info!(id, "task deleted");
        Ok(task)
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id).into())
    }

    /// One derived view as of today.
    pub async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.repository.list_all().await?;
        Ok(filter.apply(&tasks, local_date_today()))
    }

    /// At most `limit` tasks of one view, starting at `offset`, cut after filtering
    /// and sorting.
    pub async fn list_page(
        &self,
        filter: TaskFilter,
        offset: usize,
        limit: usize,
    ) -> Result<TaskPage> {
        if limit == 0 {
            return Err(ValidationError::ZeroLimit.into());
        }
        let view = self.list(filter).await?;
        Ok(TaskPage::slice(view, offset, limit))
    }

    /// Re-arm reminders for every active daily task, e.g. after a restart.
    /// Returns how many were scheduled.
    pub async fn restore_reminders(&self) -> Result<usize> {
        let tasks = self.repository.list_all().await?;
        let mut count = 0;
        for task in &tasks {
            if self.sync_reminder(task) {
                count += 1;
            }
        }
        tracing::info!(count, "reminders restored");
        Ok(count)
    }

    /// Schedule a reminder for active daily tasks with a reminder time, cancel
    /// otherwise.
    fn sync_reminder(&self, task: &Task) -> bool {
        let time = task
            .reminder_time()
            .filter(|_| !is_expired(task, local_date_today()))
            .and_then(|t| validation::parse_time(t).ok());
        match time {
            Some(at) => {
                self.reminders.schedule(task.id, &task.title, at, task.daily_end_date);
                true
            }
            None => {
                self.reminders.cancel(task.id);
                false
            }
        }
    }
}
