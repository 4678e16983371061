//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the nightly
//! attendance synchronization job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use storepulse_core::AppConfig;
use storepulse_upstream::retry::retry_with_backoff;
use storepulse_upstream::{ReportService, StaticToken};

/// Builds and starts the background job scheduler.
///
/// Registers the recurring jobs and starts the scheduler. Returns the running
/// [`JobScheduler`] handle, which must be kept alive for the lifetime of the
/// process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    service: Arc<ReportService<StaticToken>>,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_attendance_job(&scheduler, pool, service, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the nightly attendance synchronization job.
///
/// Runs daily at 01:00 (`0 0 1 * * *`), fetching the previous day's
/// work-track list and upserting one record per (employee, date). An atomic
/// in-progress flag skips a tick if the previous run is still going, so two
/// syncs never overlap.
async fn register_attendance_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    service: Arc<ReportService<StaticToken>>,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);
    let running = Arc::new(AtomicBool::new(false));

    let job = Job::new_async("0 0 1 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let service = Arc::clone(&service);
        let config = Arc::clone(&config);
        let running = Arc::clone(&running);

        Box::pin(async move {
            if running
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                tracing::warn!("scheduler: attendance sync still running, skipping this tick");
                return;
            }

            tracing::info!("scheduler: starting nightly attendance sync");
            run_attendance_sync(&pool, &service, &config).await;

            running.store(false, Ordering::SeqCst);
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Fetch yesterday's work-track list and upsert the derived records.
///
/// The upstream fetch is wrapped in back-off retry (transient failures only);
/// a persistent fetch failure abandons the run and the next tick picks the
/// day up again. Individual upsert failures are logged and skipped so one bad
/// record cannot block the rest of the batch.
async fn run_attendance_sync(
    pool: &PgPool,
    service: &ReportService<StaticToken>,
    config: &AppConfig,
) {
    let day = previous_day(Local::now().date_naive());

    let records = match retry_with_backoff(
        config.sync_max_retries,
        config.sync_retry_backoff_base_ms,
        || service.work_track(&day, &day),
    )
    .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(day, error = %e, "scheduler: work-track fetch failed");
            return;
        }
    };

    if records.is_empty() {
        tracing::info!(day, "scheduler: no attendance records for the day");
        return;
    }

    let mut inserted = 0_u32;
    let mut updated = 0_u32;
    let mut failed = 0_u32;

    for record in &records {
        match storepulse_db::upsert_attendance(pool, record).await {
            Ok(outcome) if outcome.is_new => inserted += 1,
            Ok(_) => updated += 1,
            Err(e) => {
                failed += 1;
                tracing::error!(
                    username = %record.username,
                    date = %record.date,
                    error = %e,
                    "scheduler: attendance upsert failed"
                );
            }
        }
    }

    tracing::info!(
        day,
        total = records.len(),
        inserted,
        updated,
        failed,
        "scheduler: attendance sync complete"
    );
}

/// The day before `today`, formatted the way the work-track endpoint expects.
fn previous_day(today: chrono::NaiveDate) -> String {
    (today - chrono::Duration::days(1))
        .format("%d/%m/%Y")
        .to_string()
}
