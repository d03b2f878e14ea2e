//! Recurring dispatch loop built on tokio-cron-scheduler.
//!
//! The scheduler object owns its tick cadence; `now` is read from the
//! injected clock at the top of each tick, so the same dispatcher drives
//! the timer loop, the operator endpoint, and tests identically.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use chirp_core::dispatch::Dispatcher;
use chirp_core::ports::Clock;

use crate::config::DispatchSettings;

/// Dispatch loop wrapper.
pub struct Scheduler {
    inner: JobScheduler,
}

impl Scheduler {
    /// Create the scheduler and register the recurring dispatch tick.
    ///
    /// With `settings.enabled = false` the loop is registered but never
    /// started; posts are then only dispatched through the tick endpoint.
    pub async fn start_dispatch_loop(
        settings: DispatchSettings,
        dispatcher: Arc<Dispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;

        if !settings.enabled {
            tracing::info!("Dispatch loop disabled; posts publish via the tick endpoint only");
            return Ok(Self { inner });
        }

        let job = Job::new_repeated_async(settings.tick_interval, move |_uuid, _lock| {
            let dispatcher = dispatcher.clone();
            let clock = clock.clone();
            Box::pin(async move {
                let now = clock.now();
                match dispatcher.tick(now).await {
                    Ok(summary) if summary.due > 0 => {
                        tracing::info!(
                            due = summary.due,
                            published = summary.published,
                            failed = summary.failed,
                            skipped = summary.skipped,
                            "Dispatch tick complete"
                        );
                    }
                    Ok(_) => {
                        tracing::debug!("Dispatch tick complete, nothing due");
                    }
                    Err(err) => {
                        // Abandoned tick: due items stay put and are
                        // re-discovered on the next cycle.
                        tracing::error!(error = %err, "Dispatch tick abandoned");
                    }
                }
            })
        })?;

        let id = inner.add(job).await?;
        inner.start().await?;

        tracing::info!(
            interval_secs = settings.tick_interval.as_secs(),
            job_id = %id,
            "Dispatch loop started"
        );

        Ok(Self { inner })
    }

    /// Stop the dispatch loop.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Dispatch loop stopped");
        Ok(())
    }
}
