//! Filtered task feed
//!
//! Combines the repository's task list with an active [`TaskFilter`] and
//! republishes the filtered, sorted view whenever either side changes. A failed
//! read arrives as [`Resource::Error`] with the last list still attached, and the
//! feed filters that stale list too, so subscribers keep what they were showing.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::repository::TaskRepository;
use crate::resource::Resource;
use crate::todo::{Task, TaskFilter, local_date_today};

pub struct TaskFeed {
    filter_tx: watch::Sender<TaskFilter>,
    view_rx: watch::Receiver<Resource<Vec<Task>>>,
    worker: JoinHandle<()>,
}

impl TaskFeed {
    /// Start following `repository` with `initial` as the active filter.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(repository: &TaskRepository, initial: TaskFilter) -> Self {
        let mut tasks_rx = repository.subscribe();
        let (filter_tx, mut filter_rx) = watch::channel(initial);
        let (view_tx, view_rx) = watch::channel(Resource::Loading);

        let worker = tokio::spawn(async move {
            loop {
                let view = {
                    let filter = *filter_rx.borrow_and_update();
                    let tasks = tasks_rx.borrow_and_update();
                    tasks
                        .clone()
                        .map(|list| filter.apply(&list, local_date_today()))
                };
                view_tx.send_replace(view);

                tokio::select! {
                    changed = tasks_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = filter_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("task feed stopped");
        });

        Self {
            filter_tx,
            view_rx,
            worker,
        }
    }

    pub fn filter(&self) -> TaskFilter {
        *self.filter_tx.borrow()
    }

    /// Switch the active filter; observers receive the new view.
    pub fn set_filter(&self, filter: TaskFilter) {
        self.filter_tx.send_replace(filter);
    }

    /// The current view.
    pub fn current(&self) -> Resource<Vec<Task>> {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<Task>>> {
        self.view_rx.clone()
    }

    pub fn stream(&self) -> WatchStream<Resource<Vec<Task>>> {
        WatchStream::new(self.subscribe())
    }
}

impl Drop for TaskFeed {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
