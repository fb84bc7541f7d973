//! Daily reminder scheduling
//!
//! [`ReminderScheduler`] is the port the service talks to. Calls are
//! fire-and-forget. Jobs are keyed by task id: scheduling an id that already has a
//! job replaces it.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Emitted each time a reminder goes off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFired {
    pub task_id: i64,
    pub title: String,
}

pub trait ReminderScheduler: Send + Sync {
    /// Remind about `task_id` every day at `at`, replacing any existing reminder.
    /// With `until` set, no reminder goes off after that day.
    fn schedule(&self, task_id: i64, title: &str, at: NaiveTime, until: Option<NaiveDate>);
    /// Drop the reminder for `task_id`, if any.
    fn cancel(&self, task_id: i64);
}

/// Time from `now` until the next `at`: later today, or tomorrow if `at` has
/// already passed (or is exactly now).
pub fn initial_delay(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today = now.date().and_time(at);
    let next = if today <= now {
        today + TimeDelta::days(1)
    } else {
        today
    };
    (next - now).to_std().unwrap_or_default()
}

/// Reminders driven by tokio timers inside this process.
pub struct TokioReminderScheduler {
    runtime: Handle,
    jobs: Mutex<HashMap<i64, JoinHandle<()>>>,
    fired_tx: broadcast::Sender<ReminderFired>,
}

impl TokioReminderScheduler {
    /// Create a scheduler bound to the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_runtime(Handle::current())
    }

    pub fn with_runtime(runtime: Handle) -> Self {
        let (fired_tx, _) = broadcast::channel(64);
        Self {
            runtime,
            jobs: Mutex::new(HashMap::new()),
            fired_tx,
        }
    }

    /// Receive every reminder that fires from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ReminderFired> {
        self.fired_tx.subscribe()
    }

    pub fn is_scheduled(&self, task_id: i64) -> bool {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&task_id)
            .is_some_and(|job| !job.is_finished())
    }

    pub fn scheduled_count(&self) -> usize {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|job| !job.is_finished())
            .count()
    }
}

impl ReminderScheduler for TokioReminderScheduler {
    fn schedule(&self, task_id: i64, title: &str, at: NaiveTime, until: Option<NaiveDate>) {
        let delay = initial_delay(Local::now().naive_local(), at);
        let fired_tx = self.fired_tx.clone();
        let title = title.to_string();

        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = jobs.remove(&task_id) {
            previous.abort();
            tracing::debug!(task_id, "replacing existing reminder");
        }

        let job = self.runtime.spawn(async move {
            let mut wait = delay;
            loop {
                tokio::time::sleep(wait).await;
                if until.is_some_and(|end| Local::now().date_naive() > end) {
                    tracing::debug!(task_id, "daily task ended, reminder stopped");
                    break;
                }
                tracing::info!(task_id, title = %title, "daily reminder");
                // No subscribers is fine; the log line above is the reminder.
                let _ = fired_tx.send(ReminderFired {
                    task_id,
                    title: title.clone(),
                });
                wait = DAY;
            }
        });
        jobs.insert(task_id, job);
        tracing::debug!(task_id, %at, delay_secs = delay.as_secs(), "reminder scheduled");
    }

    fn cancel(&self, task_id: i64) {
        let removed = self
            .jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&task_id);
        if let Some(job) = removed {
            job.abort();
            tracing::debug!(task_id, "reminder cancelled");
        }
    }
}

impl Drop for TokioReminderScheduler {
    fn drop(&mut self) {
        let jobs = self.jobs.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, job) in jobs.drain() {
            job.abort();
        }
    }
}

/// Scheduler used when reminders are turned off in the configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledReminders;

impl ReminderScheduler for DisabledReminders {
    fn schedule(&self, task_id: i64, _title: &str, at: NaiveTime, _until: Option<NaiveDate>) {
        tracing::debug!(task_id, %at, "reminders disabled, not scheduling");
    }

    fn cancel(&self, _task_id: i64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn now(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_initial_delay_later_today() {
        assert_eq!(
            initial_delay(now(8, 0), at(9, 30)),
            Duration::from_secs(90 * 60)
        );
    }

    #[test]
    fn test_initial_delay_rolls_to_tomorrow() {
        assert_eq!(
            initial_delay(now(10, 0), at(9, 0)),
            Duration::from_secs(23 * 60 * 60)
        );
        assert_eq!(initial_delay(now(9, 0), at(9, 0)), DAY);
    }

    #[tokio::test]
    async fn test_schedule_replaces_existing_job() {
        let scheduler = TokioReminderScheduler::new();
        scheduler.schedule(1, "Stretch", at(7, 0), None);
        scheduler.schedule(1, "Stretch", at(8, 0), None);
        scheduler.schedule(2, "Read", at(21, 0), None);

        assert_eq!(scheduler.scheduled_count(), 2);
        assert!(scheduler.is_scheduled(1));

        scheduler.cancel(1);
        assert!(!scheduler.is_scheduled(1));
        assert_eq!(scheduler.scheduled_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_and_repeats() {
        let scheduler = TokioReminderScheduler::new();
        let mut fired = scheduler.subscribe();
        scheduler.schedule(5, "Water plants", at(6, 45), None);

        let first = fired.recv().await.unwrap();
        assert_eq!(
            first,
            ReminderFired {
                task_id: 5,
                title: "Water plants".to_string()
            }
        );
        let second = fired.recv().await.unwrap();
        assert_eq!(second.task_id, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_stops_after_end_date() {
        let scheduler = TokioReminderScheduler::new();
        let mut fired = scheduler.subscribe();
        let yesterday = Local::now().date_naive() - TimeDelta::days(1);
        scheduler.schedule(9, "Old course", at(6, 45), Some(yesterday));
        assert!(scheduler.is_scheduled(9));

        tokio::time::sleep(DAY * 2).await;
        assert!(!scheduler.is_scheduled(9));
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_until_end_date() {
        let scheduler = TokioReminderScheduler::new();
        let mut fired = scheduler.subscribe();
        let far = Local::now().date_naive() + TimeDelta::days(365);
        scheduler.schedule(10, "Course", at(6, 45), Some(far));

        assert_eq!(fired.recv().await.unwrap().task_id, 10);
        assert!(scheduler.is_scheduled(10));
    }
}
