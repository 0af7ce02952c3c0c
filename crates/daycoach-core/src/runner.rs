//! Periodic job runner with an explicit lifecycle.
//!
//! Jobs are registered on a runner value owned by the caller, started once
//! a Tokio runtime is available, and torn down with [`JobRunner::shutdown`].
//! Nothing here is process-global; dropping the runner without starting it
//! is fine.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Utc, Weekday};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::calendar::reference_tz;

/// A weekly firing time in the reference timezone.
#[derive(Debug, Clone, Copy)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl WeeklySchedule {
    pub fn new(weekday: Weekday, time: NaiveTime) -> Self {
        Self { weekday, time }
    }

    /// The next instant strictly after `after` matching this schedule.
    pub fn next_occurrence(&self, after: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let after_date = after.date_naive();
        let days_ahead = (7 + self.weekday.num_days_from_monday() as i64
            - after_date.weekday().num_days_from_monday() as i64)
            % 7;
        let candidate_date = after_date + Duration::days(days_ahead);
        let candidate = crate::calendar::at(candidate_date, self.time);
        if candidate > after {
            candidate
        } else {
            crate::calendar::at(candidate_date + Duration::days(7), self.time)
        }
    }
}

type JobFn = Arc<dyn Fn() + Send + Sync>;

struct Job {
    name: String,
    schedule: WeeklySchedule,
    run: JobFn,
}

/// Runs registered jobs on their schedules until shut down.
pub struct JobRunner {
    jobs: Vec<Job>,
    shutdown_tx: Option<watch::Sender<bool>>,
    handles: Vec<JoinHandle<()>>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            shutdown_tx: None,
            handles: Vec::new(),
        }
    }

    /// Register a named job. Has no effect until [`start`](Self::start).
    pub fn register<F>(&mut self, name: impl Into<String>, schedule: WeeklySchedule, run: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.jobs.push(Job {
            name: name.into(),
            schedule,
            run: Arc::new(run),
        });
    }

    /// Spawn one task per registered job. Must be called inside a Tokio
    /// runtime. Calling it twice is a no-op for the second call.
    pub fn start(&mut self) {
        if self.shutdown_tx.is_some() {
            return;
        }
        let (tx, rx) = watch::channel(false);
        for job in self.jobs.drain(..) {
            let mut rx = rx.clone();
            let handle = tokio::spawn(async move {
                loop {
                    let now = Utc::now().with_timezone(&reference_tz());
                    let next = job.schedule.next_occurrence(now);
                    let wait = (next - now).to_std().unwrap_or_default();
                    tracing::debug!(job = %job.name, at = %next, "job scheduled");
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {
                            tracing::info!(job = %job.name, "running scheduled job");
                            (job.run)();
                        }
                        _ = rx.changed() => break,
                    }
                }
            });
            self.handles.push(handle);
        }
        self.shutdown_tx = Some(tx);
    }

    /// Signal all job tasks to stop and wait for them to finish.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }

    /// Whether [`start`](Self::start) has been called.
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn next_occurrence_same_week() {
        // Monday 2025-09-15 10:00 -> Sunday 2025-09-21 21:00.
        let after = crate::calendar::at(
            chrono::NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
            t(10, 0),
        );
        let schedule = WeeklySchedule::new(Weekday::Sun, t(21, 0));
        let next = schedule.next_occurrence(after);
        assert_eq!(next.date_naive(), chrono::NaiveDate::from_ymd_opt(2025, 9, 21).unwrap());
        assert_eq!(next.time(), t(21, 0));
    }

    #[test]
    fn next_occurrence_rolls_to_next_week() {
        // Sunday 21:30 is past this week's 21:00 slot.
        let after = crate::calendar::at(
            chrono::NaiveDate::from_ymd_opt(2025, 9, 21).unwrap(),
            t(21, 30),
        );
        let schedule = WeeklySchedule::new(Weekday::Sun, t(21, 0));
        let next = schedule.next_occurrence(after);
        assert_eq!(next.date_naive(), chrono::NaiveDate::from_ymd_opt(2025, 9, 28).unwrap());
    }

    #[test]
    fn exact_slot_rolls_forward() {
        let after = crate::calendar::at(
            chrono::NaiveDate::from_ymd_opt(2025, 9, 21).unwrap(),
            t(21, 0),
        );
        let schedule = WeeklySchedule::new(Weekday::Sun, t(21, 0));
        let next = schedule.next_occurrence(after);
        assert!(next > after);
    }

    #[tokio::test]
    async fn start_and_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut runner = JobRunner::new();
        let c = counter.clone();
        // Far-future slot: the job should never fire during the test.
        runner.register("weekly-review", WeeklySchedule::new(Weekday::Sun, t(21, 0)), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!runner.is_running());
        runner.start();
        assert!(runner.is_running());
        runner.shutdown().await;
        assert!(!runner.is_running());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
