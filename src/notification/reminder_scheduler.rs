use chrono::{DateTime, Duration, DurationRound, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, warn};

use super::notification_service::{DispatchReport, NotificationDispatcher};
use crate::{error::Result, task::TaskStore};

/// Second zero of every minute.
pub const SWEEP_SCHEDULE: &str = "0 * * * * *";

/// Scheduled minute a job firing belongs to. Consecutive ticks then cover
/// adjacent lookback windows however late or early each one fires.
pub fn tick_time(fired_at: DateTime<Utc>) -> DateTime<Utc> {
    fired_at
        .duration_round(Duration::minutes(1))
        .unwrap_or(fired_at)
}

/// One pass of the reminder check: query due tasks, hand them to the
/// dispatcher.
pub struct ReminderSweep {
    store: Arc<dyn TaskStore>,
    dispatcher: NotificationDispatcher,
    running: Mutex<()>,
}

impl ReminderSweep {
    pub fn new(store: Arc<dyn TaskStore>, dispatcher: NotificationDispatcher) -> Self {
        Self {
            store,
            dispatcher,
            running: Mutex::new(()),
        }
    }

    /// Returns `None` when a previous sweep is still in flight.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<Option<DispatchReport>> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Previous reminder sweep still running, skipping this tick");
            return Ok(None);
        };

        let tasks = self.store.find_due_incomplete(now).await?;
        if tasks.is_empty() {
            debug!("No due reminders at {}", now);
            return Ok(Some(DispatchReport::default()));
        }

        debug!("Found {} due reminders", tasks.len());
        Ok(Some(self.dispatcher.dispatch(tasks).await))
    }
}

/// Owns the recurring sweep job for the lifetime of the process.
pub struct ReminderScheduler {
    sweep: Arc<ReminderSweep>,
    scheduler: Option<JobScheduler>,
}

impl ReminderScheduler {
    pub fn new(sweep: Arc<ReminderSweep>) -> Self {
        Self {
            sweep,
            scheduler: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    pub async fn start(&mut self) -> std::result::Result<(), JobSchedulerError> {
        if self.is_running() {
            warn!("Reminder scheduler already started");
            return Ok(());
        }

        let scheduler = JobScheduler::new().await?;

        let sweep = self.sweep.clone();
        let job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _l| {
            let sweep = sweep.clone();

            Box::pin(async move {
                match sweep.run(tick_time(Utc::now())).await {
                    Ok(Some(report)) if report != DispatchReport::default() => {
                        info!("Reminder sweep finished: {:?}", report);
                    }
                    Ok(_) => {}
                    Err(e) => error!("Error checking reminders: {:?}", e),
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;
        self.scheduler = Some(scheduler);

        info!("Reminder scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> std::result::Result<(), JobSchedulerError> {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.shutdown().await?;
            info!("Reminder scheduler stopped");
        }
        Ok(())
    }
}
