//! Periodic scheduler with an explicit lifecycle.
//!
//! A scheduler runs its job once on start, then at every cadence boundary,
//! until [`PeriodicScheduler::stop`] is called. A cycle already in flight
//! when stop arrives is allowed to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tide_core::{civil_offset, Error, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// A unit of periodic work.
#[async_trait]
pub trait SyncJob: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Runs one cycle and returns how many records it wrote.
    async fn run_cycle(&self) -> Result<usize>;
}

/// When cycles run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// At every multiple of `interval_hours` counted from local midnight in
    /// the given offset.
    Aligned {
        interval_hours: u32,
        offset: FixedOffset,
    },
    /// A fixed delay after each cycle.
    Fixed(Duration),
}

impl Cadence {
    fn validate(&self) -> Result<()> {
        match *self {
            Self::Aligned { interval_hours, .. } if !(1..=24).contains(&interval_hours) => Err(
                Error::config(format!("aligned interval must be 1..=24 hours, got {interval_hours}")),
            ),
            Self::Fixed(d) if d.is_zero() => Err(Error::config("fixed interval must be non-zero")),
            _ => Ok(()),
        }
    }

    /// The next run strictly after `now`.
    pub fn next_run(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match *self {
            Self::Aligned {
                interval_hours,
                offset,
            } => next_aligned_boundary(now.with_timezone(&offset), interval_hours)
                .map(|local| local.with_timezone(&Utc)),
            Self::Fixed(interval) => {
                let step = chrono::Duration::from_std(interval)
                    .map_err(|e| Error::config(format!("fixed interval too large: {e}")))?;
                Ok(now + step)
            }
        }
    }

    fn offset(&self) -> FixedOffset {
        match *self {
            Self::Aligned { offset, .. } => offset,
            Self::Fixed(_) => civil_offset(),
        }
    }
}

/// Next boundary of an `interval_hours` grid anchored at local midnight.
///
/// The current hour is rounded up to the next multiple of the interval; if
/// that reaches 24 the boundary is midnight of the following day.
pub fn next_aligned_boundary(
    now_local: DateTime<FixedOffset>,
    interval_hours: u32,
) -> Result<DateTime<FixedOffset>> {
    if !(1..=24).contains(&interval_hours) {
        return Err(Error::config(format!(
            "aligned interval must be 1..=24 hours, got {interval_hours}"
        )));
    }

    let next_hour = (now_local.hour() / interval_hours + 1) * interval_hours;
    let today = now_local.date_naive();

    let (date, hour) = if next_hour >= 24 {
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| Error::config(format!("no day after {today}")))?;
        (tomorrow, 0)
    } else {
        (today, next_hour)
    };

    let time = NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| Error::config(format!("invalid boundary hour {hour}")))?;

    now_local
        .offset()
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| Error::config(format!("ambiguous boundary {date} {time}")))
}

/// Cadence settings as they appear in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Align cycles to clock boundaries in civil time
    #[serde(default = "default_aligned")]
    pub aligned: bool,
    /// Boundary spacing when aligned
    #[serde(default = "default_tide_interval_hours")]
    pub tide_interval_hours: u32,
    /// Delay between cycles when not aligned
    #[serde(default = "default_fetch_interval_secs")]
    pub fetch_interval_secs: u64,
}

fn default_aligned() -> bool {
    true
}

fn default_tide_interval_hours() -> u32 {
    2
}

fn default_fetch_interval_secs() -> u64 {
    300
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            aligned: default_aligned(),
            tide_interval_hours: default_tide_interval_hours(),
            fetch_interval_secs: default_fetch_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn cadence(&self) -> Cadence {
        if self.aligned {
            Cadence::Aligned {
                interval_hours: self.tide_interval_hours,
                offset: civil_offset(),
            }
        } else {
            Cadence::Fixed(Duration::from_secs(self.fetch_interval_secs))
        }
    }
}

/// Lifecycle state of a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    /// Waiting for start or for the next boundary.
    Idle,
    /// A cycle is executing.
    Running,
    /// Terminal.
    Stopped,
}

/// Drives a [`SyncJob`] on a [`Cadence`].
pub struct PeriodicScheduler {
    job: Arc<dyn SyncJob>,
    cadence: Cadence,
    state: Mutex<SchedulerState>,
    started: AtomicBool,
    stop_tx: watch::Sender<bool>,
}

impl PeriodicScheduler {
    pub fn new(job: Arc<dyn SyncJob>, cadence: Cadence) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            job,
            cadence,
            state: Mutex::new(SchedulerState::Idle),
            started: AtomicBool::new(false),
            stop_tx,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Spawns the scheduling loop. The first cycle runs immediately.
    ///
    /// Fails if the scheduler was already started or has been stopped.
    pub fn start(self: &Arc<Self>) -> Result<JoinHandle<()>> {
        self.cadence.validate()?;

        if self.state() == SchedulerState::Stopped {
            return Err(Error::config(format!(
                "scheduler {} is stopped and cannot be restarted",
                self.job.name()
            )));
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::config(format!(
                "scheduler {} is already running",
                self.job.name()
            )));
        }

        let stop_rx = self.stop_tx.subscribe();
        let scheduler = self.clone();

        info!(job = self.job.name(), cadence = ?self.cadence, "Scheduler started");
        Ok(tokio::spawn(async move { scheduler.run(stop_rx).await }))
    }

    /// Signals the loop to stop without waiting for it.
    ///
    /// Returns true for the call that requested the stop; later calls are
    /// no-ops and return false.
    pub fn stop(&self) -> bool {
        let already = self.stop_tx.send_replace(true);
        if already {
            return false;
        }

        if !self.started.load(Ordering::SeqCst) {
            *self.state.lock() = SchedulerState::Stopped;
        }
        info!(job = self.job.name(), "Scheduler stop requested");
        true
    }

    async fn run(self: Arc<Self>, mut stop_rx: watch::Receiver<bool>) {
        let name = self.job.name().to_string();

        loop {
            if *stop_rx.borrow() {
                break;
            }

            self.run_once(&name).await;

            if *stop_rx.borrow() {
                break;
            }

            let now = Utc::now();
            let next = match self.cadence.next_run(now) {
                Ok(next) => next,
                Err(e) => {
                    error!(job = %name, error = %e, "Cannot compute next run, stopping");
                    break;
                }
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

            info!(
                job = %name,
                next_run = %next.with_timezone(&self.cadence.offset()),
                wait_secs = wait.as_secs(),
                "Next cycle scheduled"
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = stop_rx.changed() => {
                    debug!(job = %name, "Woken by stop signal");
                }
            }
        }

        *self.state.lock() = SchedulerState::Stopped;
        info!(job = %name, "Scheduler stopped");
    }

    async fn run_once(&self, name: &str) {
        *self.state.lock() = SchedulerState::Running;

        match self.job.run_cycle().await {
            Ok(count) => debug!(job = %name, count, "Cycle finished"),
            Err(e) => error!(
                job = %name,
                code = e.error_code().code(),
                error = %e,
                "Scheduled cycle failed, retrying at next boundary"
            ),
        }

        let mut state = self.state.lock();
        if *state == SchedulerState::Running {
            *state = SchedulerState::Idle;
        }
    }
}
