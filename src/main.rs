//! # Task Reminder Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database,
//! starts the reminder reconciler, and runs the Telegram bot alongside
//! the health check server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_reminder_bot::bot::handlers::BotHandler;
use task_reminder_bot::config::Config;
use task_reminder_bot::database::connection::DatabaseManager;
use task_reminder_bot::services::health::HealthService;
use task_reminder_bot::services::reminder::ReminderService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_reminder_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing token or database URL is fatal here.
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Task Reminder Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Reminder interval: {}s",
        config.database_url, config.http_port, config.reminder_interval_secs
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(db_arc.as_ref().clone());
    info!("Telegram bot initialized successfully");

    // Initialize and start the reminder reconciler
    info!("Initializing reminder service...");
    let mut reminder_service =
        match ReminderService::new(bot.clone(), db_arc.clone(), config.reminder_interval_secs).await
        {
            Ok(service) => {
                info!("Reminder service initialized successfully");
                service
            }
            Err(e) => {
                tracing::error!("Failed to create reminder service: {}", e);
                return Err(anyhow::anyhow!("Failed to create reminder service: {}", e));
            }
        };

    if let Err(e) = reminder_service.start().await {
        tracing::error!("Failed to start reminder service: {}", e);
    } else {
        info!("Reminder service started successfully");
    }

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    // Stop reminder service on shutdown
    if let Err(e) = reminder_service.stop().await {
        tracing::warn!("Error stopping reminder service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
