//! Async repository over the persistence port
//!
//! Every DAO call runs on tokio's blocking pool. After each committed write the
//! full list is re-read and pushed to observers, so nobody has to re-issue a read
//! to see a change. Writes and the re-read that follows them are serialized, so
//! the last published list always reflects the last committed write.

use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::{ErrorInfo, StoreError};
use crate::resource::Resource;
use crate::storage::TaskDao;
use crate::todo::{Task, TaskFilter, local_date_today};

/// Shared handle to the task store and its observable list.
#[derive(Clone)]
pub struct TaskRepository {
    dao: Arc<dyn TaskDao>,
    tasks_tx: Arc<watch::Sender<Resource<Vec<Task>>>>,
    // Held across a write and its publish.
    publish_lock: Arc<Mutex<()>>,
}

impl TaskRepository {
    /// Wrap a DAO. Observers see `Loading` until the first [`refresh`](Self::refresh).
    pub fn new(dao: Arc<dyn TaskDao>) -> Self {
        let (tasks_tx, _) = watch::channel(Resource::Loading);
        Self {
            dao,
            tasks_tx: Arc::new(tasks_tx),
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn TaskDao) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let dao = Arc::clone(&self.dao);
        tokio::task::spawn_blocking(move || op(dao.as_ref())).await?
    }

    /// Re-read every task and publish the result.
    ///
    /// A failed read is published as an error that still carries the list
    /// observers were showing.
    pub async fn refresh(&self) {
        let _guard = self.publish_lock.lock().await;
        self.publish().await;
    }

    // Caller holds `publish_lock`.
    async fn publish(&self) {
        match self.run(|dao| dao.list_all()).await {
            Ok(tasks) => {
                self.tasks_tx.send_replace(Resource::Success(tasks));
            }
            Err(e) => {
                let error = ErrorInfo::from(e);
                self.tasks_tx.send_modify(|state| {
                    *state = std::mem::take(state).fail(error);
                });
            }
        }
    }

    /// Run a write and publish the list it produced before any other write starts.
    async fn write<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn TaskDao) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.publish_lock.lock().await;
        let out = self.run(op).await?;
        self.publish().await;
        Ok(out)
    }

    pub async fn insert(&self, task: Task) -> Result<i64, StoreError> {
        self.write(move |dao| dao.insert(&task)).await
    }

    pub async fn update(&self, task: Task) -> Result<(), StoreError> {
        self.write(move |dao| dao.update(&task)).await
    }

    pub async fn delete(&self, task: Task) -> Result<(), StoreError> {
        self.write(move |dao| dao.delete(&task)).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.run(move |dao| dao.get_by_id(id)).await
    }

    pub async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        self.run(|dao| dao.list_all()).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Resource<Vec<Task>> {
        self.tasks_tx.borrow().clone()
    }

    /// Receiver for the full task list.
    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<Task>>> {
        self.tasks_tx.subscribe()
    }

    /// Stream of the full task list, starting with the current state.
    pub fn observe_all(&self) -> WatchStream<Resource<Vec<Task>>> {
        WatchStream::new(self.subscribe())
    }

    /// Stream of one derived view, filtered and sorted against the current date
    /// each time the list changes.
    pub fn observe_view(
        &self,
        filter: TaskFilter,
    ) -> impl Stream<Item = Resource<Vec<Task>>> + Send + 'static {
        self.observe_all()
            .map(move |state| state.map(|tasks| filter.apply(&tasks, local_date_today())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteTaskStore;
    use crate::todo::Priority;

    fn repo() -> TaskRepository {
        TaskRepository::new(Arc::new(SqliteTaskStore::open_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_starts_loading_until_refresh() {
        let repo = repo();
        assert!(repo.snapshot().is_loading());

        repo.refresh().await;
        assert_eq!(repo.snapshot().data().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_write_publishes_without_reread() {
        let repo = repo();
        let mut rx = repo.subscribe();

        repo.insert(Task::new("Call mom", Priority::High)).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.data().unwrap()[0].title, "Call mom");
    }

    #[tokio::test]
    async fn test_store_errors_are_returned_not_panicked() {
        let repo = repo();
        let mut ghost = Task::new("ghost", Priority::Low);
        ghost.id = 7;
        assert!(matches!(
            repo.update(ghost).await,
            Err(StoreError::NotFound(7))
        ));
    }
}
