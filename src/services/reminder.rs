use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use teloxide::{prelude::*, Bot};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::database::{connection::DatabaseManager, models::Task};

/// Outbound message boundary used by the reconciler. Production wraps the
/// Telegram bot; tests substitute a recording implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_reminder(&self, recipient_id: i64, text: &str) -> anyhow::Result<()>;
}

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_reminder(&self, recipient_id: i64, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(teloxide::types::ChatId(recipient_id), text)
            .await?;
        Ok(())
    }
}

/// What a single reconciler pass did, for the tick log line and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub due: usize,
    pub sent: usize,
    pub send_failures: usize,
    pub advanced: usize,
    pub deleted: usize,
}

/// One reconciliation pass: every task with `scheduled_time <= now` gets a
/// notification, then is advanced to its next occurrence (recurring) or
/// deleted (one-time). Each task is processed independently; one task's
/// failure is logged and the pass moves on.
pub async fn check_due_tasks(
    db: &DatabaseManager,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Result<ReconcileSummary, sqlx::Error> {
    let due_tasks = Task::find_due(&db.pool, now).await?;
    let mut summary = ReconcileSummary {
        due: due_tasks.len(),
        ..ReconcileSummary::default()
    };

    for task in due_tasks {
        if let Err(e) = process_due_task(&db.pool, notifier, &task, &mut summary).await {
            tracing::error!("Failed to process due task {}: {}", task.id, e);
        }
    }

    Ok(summary)
}

async fn process_due_task(
    pool: &sqlx::SqlitePool,
    notifier: &dyn Notifier,
    task: &Task,
    summary: &mut ReconcileSummary,
) -> Result<(), sqlx::Error> {
    let text = format!("⏰ Reminder: {}", task.description);

    // At-most-once delivery: a failed send still advances or deletes the row.
    match notifier.send_reminder(task.owner_id, &text).await {
        Ok(()) => summary.sent += 1,
        Err(e) => {
            summary.send_failures += 1;
            tracing::warn!(
                "Failed to send reminder for task {} to {}: {}",
                task.id,
                task.owner_id,
                e
            );
        }
    }

    match task.recurrence {
        Some(recurrence) => {
            // Next occurrence is computed from the prior scheduled time,
            // not from the moment this pass runs.
            let next = recurrence.next_occurrence(task.scheduled_time);
            Task::advance(pool, task.id, next).await?;
            summary.advanced += 1;
        }
        None => {
            Task::delete(pool, task.id).await?;
            summary.deleted += 1;
        }
    }

    Ok(())
}

/// Drives `check_due_tasks` on a fixed-period timer. The first run happens
/// one interval after start.
pub struct ReminderService {
    db: Arc<DatabaseManager>,
    notifier: Arc<TelegramNotifier>,
    scheduler: JobScheduler,
    interval_secs: u64,
}

impl ReminderService {
    pub async fn new(
        bot: Bot,
        db: Arc<DatabaseManager>,
        interval_secs: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            db,
            notifier: Arc::new(TelegramNotifier::new(bot)),
            scheduler,
            interval_secs,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();
        let notifier = self.notifier.clone();

        let reconcile_job = Job::new_repeated_async(
            std::time::Duration::from_secs(self.interval_secs),
            move |_uuid, _l| {
                let db = db.clone();
                let notifier = notifier.clone();
                Box::pin(async move {
                    match check_due_tasks(db.as_ref(), notifier.as_ref(), Utc::now()).await {
                        Ok(summary) if summary.due > 0 => {
                            tracing::info!(
                                "Reminder pass: {} due, {} sent, {} advanced, {} deleted, {} send failures",
                                summary.due,
                                summary.sent,
                                summary.advanced,
                                summary.deleted,
                                summary.send_failures
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!("Reminder pass failed: {}", e);
                        }
                    }
                })
            },
        )?;

        self.scheduler.add(reconcile_job).await?;
        self.scheduler.start().await?;

        tracing::info!(
            "Reminder service started - checking for due tasks every {}s",
            self.interval_secs
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger for testing
    pub async fn check_now(&self) -> Result<ReconcileSummary, sqlx::Error> {
        check_due_tasks(self.db.as_ref(), self.notifier.as_ref(), Utc::now()).await
    }
}
