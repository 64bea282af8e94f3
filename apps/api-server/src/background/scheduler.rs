//! Cron-style job scheduler using tokio-cron-scheduler.
//!
//! Drives the reconciliation sweeps: expired OTP cleanup every 10
//! minutes and overdue booking completion every 15. Both jobs are
//! idempotent, so overlapping runs and restarts are harmless.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use fleet_core::service::Reconciler;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable scheduler.
    pub enabled: bool,
    pub otp_sweep_schedule: String,
    pub booking_sweep_schedule: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            otp_sweep_schedule: "0 */10 * * * *".to_string(),
            booking_sweep_schedule: "0 */15 * * * *".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            otp_sweep_schedule: std::env::var("OTP_SWEEP_SCHEDULE")
                .unwrap_or(defaults.otp_sweep_schedule),
            booking_sweep_schedule: std::env::var("BOOKING_SWEEP_SCHEDULE")
                .unwrap_or(defaults.booking_sweep_schedule),
        }
    }
}

/// Cron job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a new scheduler.
    pub async fn new(config: SchedulerConfig) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self { inner, config })
    }

    /// Register both reconciliation sweeps.
    pub async fn register_reconciliation(
        &self,
        reconciler: Arc<Reconciler>,
    ) -> Result<(), JobSchedulerError> {
        let otp_reconciler = reconciler.clone();
        self.add_cron(&self.config.otp_sweep_schedule, move || {
            let reconciler = otp_reconciler.clone();
            async move {
                if let Err(e) = reconciler.sweep_otps().await {
                    tracing::error!(error = %e, "otp sweep failed");
                }
            }
        })
        .await?;

        self.add_cron(&self.config.booking_sweep_schedule, move || {
            let reconciler = reconciler.clone();
            async move {
                if let Err(e) = reconciler.sweep_bookings().await {
                    tracing::error!(error = %e, "booking sweep failed");
                }
            }
        })
        .await?;

        Ok(())
    }

    /// Add a cron job.
    pub async fn add_cron<F, Fut>(
        &self,
        schedule: &str,
        task: F,
    ) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task().await;
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}
