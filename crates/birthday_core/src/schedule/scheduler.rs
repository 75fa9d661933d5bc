//! Daily scheduler state machine and its async driver.
//!
//! `DailyScheduler::poll` is the synchronous step function: feed it the
//! current local time and it decides whether to run the job. The comparison
//! is `now >= notify_time` on a day strictly after the last swept day.
//!
//! # Invariants
//! - At most one sweep per calendar day.
//! - A day whose notify time passed between two polls is swept late, on the
//!   first poll after it, so a late notify time and a coarse cadence cannot
//!   skip a day.
//! - Only the day observed by the previous poll is caught up; a host that
//!   was not running at the notify time does not replay it on startup.

use super::clock::Clock;
use crate::logging::panic_payload_summary;
use crate::reminder::job::{SweepError, SweepReport};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{error, info, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Default wait between two `poll` calls in the background loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next due time.
    Idle,
    /// Sweep in progress.
    Firing,
}

/// Result of one `poll` step.
#[derive(Debug)]
pub enum PollOutcome {
    /// Today's notify time has not been reached yet.
    NotYet,
    /// Today (or a later day) was already swept.
    AlreadySwept,
    Swept(SweepReport),
    /// The sweep failed; the day still counts as handled.
    Failed(SweepError),
}

impl PollOutcome {
    /// Whether this step executed the job.
    pub fn ran(&self) -> bool {
        matches!(self, Self::Swept(_) | Self::Failed(_))
    }
}

/// Tracks the last swept day and fires the job once per day after `notify_time`.
#[derive(Debug, Clone)]
pub struct DailyScheduler {
    notify_time: NaiveTime,
    last_swept: Option<NaiveDate>,
    last_poll: Option<NaiveDateTime>,
    state: SchedulerState,
}

impl DailyScheduler {
    pub fn new(notify_time: NaiveTime) -> Self {
        Self {
            notify_time,
            last_swept: None,
            last_poll: None,
            state: SchedulerState::Idle,
        }
    }

    /// Resumes from a host-persisted "last swept" day.
    pub fn with_last_swept(mut self, day: Option<NaiveDate>) -> Self {
        self.last_swept = day;
        self
    }

    pub fn notify_time(&self) -> NaiveTime {
        self.notify_time
    }

    pub fn last_swept(&self) -> Option<NaiveDate> {
        self.last_swept
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether a sweep should run at `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.due_day(now).is_some()
    }

    /// Runs `job` if a day is due at `now`.
    ///
    /// The job receives the due day, which is yesterday when yesterday's
    /// notify time fell between the previous poll and this one. The day is
    /// marked as swept whether the job succeeds, fails or panics, so a bad
    /// day is never retried in a tight loop.
    pub fn poll<F>(&mut self, now: NaiveDateTime, job: F) -> PollOutcome
    where
        F: FnOnce(NaiveDate) -> Result<SweepReport, SweepError>,
    {
        match self.begin(now) {
            Ok(day) => {
                let result = run_guarded(job, day);
                self.finish(day, result)
            }
            Err(outcome) => outcome,
        }
    }

    /// First half of a poll: picks the due day and enters `Firing`.
    fn begin(&mut self, now: NaiveDateTime) -> Result<NaiveDate, PollOutcome> {
        let due = self.due_day(now);
        self.last_poll = Some(now);

        let Some(day) = due else {
            return Err(if self.already_swept(now.date()) {
                PollOutcome::AlreadySwept
            } else {
                PollOutcome::NotYet
            });
        };

        self.state = SchedulerState::Firing;
        if day < now.date() {
            warn!("event=scheduler_fire module=schedule status=late day={day} now={now}");
        }
        info!("event=scheduler_fire module=schedule status=start today={day}");
        Ok(day)
    }

    /// Second half of a poll: records the day and returns to `Idle`.
    fn finish(
        &mut self,
        day: NaiveDate,
        result: Result<SweepReport, SweepError>,
    ) -> PollOutcome {
        self.last_swept = Some(day);
        self.state = SchedulerState::Idle;

        match result {
            Ok(report) => PollOutcome::Swept(report),
            Err(err) => {
                error!(
                    "event=scheduler_fire module=schedule status=error today={day} error={err}"
                );
                PollOutcome::Failed(err)
            }
        }
    }

    fn due_day(&self, now: NaiveDateTime) -> Option<NaiveDate> {
        let today = now.date();
        if now.time() >= self.notify_time {
            return (!self.already_swept(today)).then_some(today);
        }

        let yesterday = today.pred_opt()?;
        let missed = self
            .last_poll
            .is_some_and(|previous| previous < yesterday.and_time(self.notify_time));
        (missed && !self.already_swept(yesterday)).then_some(yesterday)
    }

    fn already_swept(&self, day: NaiveDate) -> bool {
        self.last_swept.is_some_and(|last| last >= day)
    }
}

fn run_guarded<F>(job: F, day: NaiveDate) -> Result<SweepReport, SweepError>
where
    F: FnOnce(NaiveDate) -> Result<SweepReport, SweepError>,
{
    catch_unwind(AssertUnwindSafe(|| job(day)))
        .unwrap_or_else(|payload| Err(SweepError::Panicked(panic_payload_summary(payload.as_ref()))))
}

/// Background loop: polls `scheduler` every `poll_interval` until shutdown.
///
/// Shutdown is requested by sending `true` on the watch channel or by
/// dropping its sender. The idle wait is interrupted immediately; a sweep in
/// progress always runs to completion first. The job runs on tokio's
/// blocking pool since it does storage and terminal I/O. Returns the
/// scheduler so the host can persist `last_swept`.
pub async fn run_daily_scheduler<C, F>(
    mut scheduler: DailyScheduler,
    clock: C,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    job: F,
) -> DailyScheduler
where
    C: Clock,
    F: FnMut(NaiveDate) -> Result<SweepReport, SweepError> + Send + 'static,
{
    info!(
        "event=scheduler_start module=schedule status=ok notify_time={} poll_interval_ms={}",
        scheduler.notify_time().format("%H:%M:%S"),
        poll_interval.as_millis()
    );
    let job = Arc::new(Mutex::new(job));

    loop {
        if *shutdown.borrow() {
            break;
        }

        if let Ok(day) = scheduler.begin(clock.now()) {
            let job = Arc::clone(&job);
            let result = tokio::task::spawn_blocking(move || {
                let mut job = job.lock().unwrap_or_else(|e| e.into_inner());
                run_guarded(&mut *job, day)
            })
            .await
            .unwrap_or_else(|err| Err(SweepError::Panicked(err.to_string())));
            scheduler.finish(day, result);
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!(
        "event=scheduler_stop module=schedule status=ok last_swept={}",
        scheduler
            .last_swept()
            .map_or_else(|| "none".to_string(), |day| day.to_string())
    );
    scheduler
}
