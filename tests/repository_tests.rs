//! Repository and feed tests: round trips and change propagation
mod common;

use common::{daily, date, one_shot};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use todo_mcp::todo::now_millis;
use todo_mcp::*;

fn repo() -> TaskRepository {
    TaskRepository::new(Arc::new(SqliteTaskStore::open_in_memory().unwrap()))
}

/// Wait until the receiver holds a value satisfying `pred`.
async fn wait_until(
    rx: &mut watch::Receiver<Resource<Vec<Task>>>,
    pred: impl FnMut(&Resource<Vec<Task>>) -> bool,
) -> Resource<Vec<Task>> {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("timed out waiting for view")
        .expect("sender dropped")
        .clone()
}

fn titles(state: &Resource<Vec<Task>>) -> Vec<String> {
    state
        .data()
        .map(|tasks| tasks.iter().map(|t| t.title.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_insert_then_get_round_trip() {
    let repo = repo();
    let mut task = Task {
        due_date: Some(date(2024, 7, 4)),
        due_time: Some("18:45".to_string()),
        ..one_shot("Fireworks", Priority::High)
    };
    task.completed_at = Some(now_millis());

    let id = repo.insert(task.clone()).await.unwrap();
    assert!(id > 0);

    let stored = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.id, id);
    task.id = id;
    assert_eq!(stored, task);
}

#[tokio::test]
async fn test_daily_round_trip() {
    let repo = repo();
    let mut task = daily("Meditate", Some("06:30"));
    task.daily_end_date = Some(date(2025, 1, 31));

    let id = repo.insert(task.clone()).await.unwrap();
    task.id = id;
    assert_eq!(repo.get_by_id(id).await.unwrap(), Some(task));
}

#[tokio::test]
async fn test_missing_id_reads_none() {
    let repo = repo();
    assert_eq!(repo.get_by_id(42).await.unwrap(), None);
}

#[tokio::test]
async fn test_observe_all_sees_every_write() {
    let repo = repo();
    repo.refresh().await;
    let mut stream = repo.observe_all();

    let first = stream.next().await.unwrap();
    assert_eq!(first.data().map(Vec::len), Some(0));

    let id = repo.insert(one_shot("one", Priority::Low)).await.unwrap();
    let after_insert = stream.next().await.unwrap();
    assert_eq!(titles(&after_insert), vec!["one"]);

    let mut task = repo.get_by_id(id).await.unwrap().unwrap();
    task.title = "renamed".to_string();
    repo.update(task.clone()).await.unwrap();
    assert_eq!(titles(&stream.next().await.unwrap()), vec!["renamed"]);

    repo.delete(task).await.unwrap();
    assert_eq!(stream.next().await.unwrap().data().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_observe_view_filters_and_sorts() {
    let repo = repo();
    repo.insert(one_shot("later", Priority::Low)).await.unwrap();
    repo.insert(Task {
        due_date: Some(date(2020, 1, 1)),
        ..one_shot("sooner", Priority::Low)
    })
    .await
    .unwrap();
    let mut done = one_shot("done", Priority::High);
    done.completed_at = Some(now_millis());
    repo.insert(done).await.unwrap();

    let mut pending = Box::pin(repo.observe_view(TaskFilter::Pending));
    assert_eq!(titles(&pending.next().await.unwrap()), vec!["sooner", "later"]);

    let mut completed = Box::pin(repo.observe_view(TaskFilter::Completed));
    assert_eq!(titles(&completed.next().await.unwrap()), vec!["done"]);
}

#[tokio::test]
async fn test_feed_follows_filter_and_writes() {
    let repo = repo();
    repo.refresh().await;
    let feed = TaskFeed::spawn(&repo, TaskFilter::Pending);
    let mut rx = feed.subscribe();
    assert_eq!(feed.filter(), TaskFilter::Pending);

    repo.insert(one_shot("errand", Priority::Medium)).await.unwrap();
    repo.insert(daily("walk", None)).await.unwrap();
    let state = wait_until(&mut rx, |s| s.data().is_some_and(|t| t.len() == 2)).await;
    assert_eq!(titles(&state), vec!["errand", "walk"]);

    feed.set_filter(TaskFilter::Daily);
    assert_eq!(feed.filter(), TaskFilter::Daily);
    let state = wait_until(&mut rx, |s| s.data().is_some_and(|t| t.len() == 1)).await;
    assert_eq!(titles(&state), vec!["walk"]);
    assert_eq!(titles(&feed.current()), vec!["walk"]);
}

#[tokio::test]
async fn test_feed_starts_loading_before_first_read() {
    let repo = repo();
    let feed = TaskFeed::spawn(&repo, TaskFilter::Completed);
    let mut rx = feed.subscribe();

    repo.refresh().await;
    let state = wait_until(&mut rx, Resource::is_success).await;
    assert_eq!(state.data().map(Vec::len), Some(0));
}

/// Store wrapper that slows down or fails chosen `list_all` calls.
struct FlakyStore {
    inner: SqliteTaskStore,
    reads: AtomicUsize,
    slow_read: Option<usize>,
    failing_read: Option<usize>,
}

impl FlakyStore {
    fn new(slow_read: Option<usize>, failing_read: Option<usize>) -> Self {
        Self {
            inner: SqliteTaskStore::open_in_memory().unwrap(),
            reads: AtomicUsize::new(0),
            slow_read,
            failing_read,
        }
    }
}

impl TaskDao for FlakyStore {
    fn insert(&self, task: &Task) -> Result<i64, StoreError> {
        self.inner.insert(task)
    }

    fn update(&self, task: &Task) -> Result<(), StoreError> {
        self.inner.update(task)
    }

    fn delete(&self, task: &Task) -> Result<(), StoreError> {
        self.inner.delete(task)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.inner.get_by_id(id)
    }

    fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        let tasks = self.inner.list_all()?;
        if self.slow_read == Some(read) {
            std::thread::sleep(Duration::from_millis(300));
        }
        if self.failing_read == Some(read) {
            return Err(StoreError::Poisoned);
        }
        Ok(tasks)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_publish_latest_list() {
    let repo = TaskRepository::new(Arc::new(FlakyStore::new(Some(1), None)));

    let first = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.insert(one_shot("A", Priority::Low)).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.insert(one_shot("B", Priority::Low)).await })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(repo.list_all().await.unwrap().len(), 2);
    assert_eq!(repo.snapshot().data().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_failed_read_keeps_last_list() {
    let repo = TaskRepository::new(Arc::new(FlakyStore::new(None, Some(2))));
    let feed = TaskFeed::spawn(&repo, TaskFilter::Pending);
    let mut rx = feed.subscribe();

    repo.insert(one_shot("kept", Priority::Low)).await.unwrap();
    wait_until(&mut rx, Resource::is_success).await;

    // The write commits; only the re-read after it fails.
    repo.insert(one_shot("hidden", Priority::Low)).await.unwrap();

    let state = repo.snapshot();
    assert!(state.is_error());
    assert!(state.error().unwrap().retryable);
    assert_eq!(state.data(), None);
    assert_eq!(titles_of(state.last_known()), vec!["kept"]);

    let view = wait_until(&mut rx, Resource::is_error).await;
    assert_eq!(titles_of(view.last_known()), vec!["kept"]);
    assert_eq!(titles_of(feed.current().last_known()), vec!["kept"]);

    repo.refresh().await;
    let view = wait_until(&mut rx, Resource::is_success).await;
    assert_eq!(titles(&view), vec!["kept", "hidden"]);
}

fn titles_of(tasks: Option<&Vec<Task>>) -> Vec<String> {
    tasks
        .map(|tasks| tasks.iter().map(|t| t.title.clone()).collect())
        .unwrap_or_default()
}
