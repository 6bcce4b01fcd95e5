#![allow(clippy::unwrap_used)]

use anyhow::Result;
use chrono::{TimeZone, Utc};
use task_reminder_bot::bot::commands::tasks::{
    add_task, change_time, delete_task, list_tasks, set_routine,
};
use task_reminder_bot::bot::commands::{
    CommandError, ADDTASK_USAGE, CHANGETIME_USAGE, DELETETASK_USAGE,
};
use task_reminder_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn assert_usage(result: Result<String, CommandError>, expected: &str) {
    match result {
        Err(CommandError::Usage(text)) => assert_eq!(text, expected),
        other => panic!("Expected usage error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_add_task_and_list_round_trip() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let reply = add_task(&db.pool, 1, "2099-03-20 15:30 Buy milk").await.unwrap();
    assert_eq!(reply, "Task added with ID 1");

    // The stored task keeps the description and the parsed UTC time intact.
    let task = Task::find_by_id(&db.pool, 1).await?.unwrap();
    assert_eq!(task.owner_id, 1);
    assert_eq!(task.description, "Buy milk");
    assert_eq!(
        task.scheduled_time,
        Utc.with_ymd_and_hms(2099, 3, 20, 15, 30, 0).unwrap()
    );
    assert_eq!(task.recurrence, None);

    let listing = list_tasks(&db.pool, 1).await.unwrap();
    assert_eq!(listing, "Your upcoming tasks:\n1: Buy milk at 2099-03-20 15:30 UTC");

    Ok(())
}

#[tokio::test]
async fn test_add_task_usage_errors() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert_usage(add_task(&db.pool, 1, "").await, ADDTASK_USAGE);
    assert_usage(add_task(&db.pool, 1, "2099-03-20").await, ADDTASK_USAGE);
    assert_usage(add_task(&db.pool, 1, "2099-03-20 15:30").await, ADDTASK_USAGE);
    assert_usage(add_task(&db.pool, 1, "not-a-date 15:30 Buy milk").await, ADDTASK_USAGE);
    assert_usage(add_task(&db.pool, 1, "2099-03-20 25:61 Buy milk").await, ADDTASK_USAGE);

    // Nothing was inserted along the way.
    let listing = list_tasks(&db.pool, 1).await.unwrap();
    assert_eq!(listing, "No upcoming tasks.");

    Ok(())
}

#[tokio::test]
async fn test_add_task_in_the_past_is_due_but_never_listed() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let reply = add_task(&db.pool, 1, "2020-01-01 00:00 Overdue thing").await.unwrap();
    assert_eq!(reply, "Task added with ID 1");

    assert_eq!(list_tasks(&db.pool, 1).await.unwrap(), "No upcoming tasks.");

    let due = Task::find_due(&db.pool, Utc::now()).await?;
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].description, "Overdue thing");

    Ok(())
}

#[tokio::test]
async fn test_list_tasks_empty() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let listing = list_tasks(&db.pool, 1).await.unwrap();
    assert_eq!(listing, "No upcoming tasks.");

    Ok(())
}

#[tokio::test]
async fn test_delete_task() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    add_task(&db.pool, 1, "2099-03-20 15:30 Buy milk").await.unwrap();

    let reply = delete_task(&db.pool, 1, "1").await.unwrap();
    assert_eq!(reply, "Task deleted.");
    assert!(Task::find_by_id(&db.pool, 1).await?.is_none());

    // Deleting again reports not found, without error.
    match delete_task(&db.pool, 1, "1").await {
        Err(CommandError::NotFound) => {}
        other => panic!("Expected not found, got {other:?}"),
    }

    assert_usage(delete_task(&db.pool, 1, "abc").await, DELETETASK_USAGE);
    assert_usage(delete_task(&db.pool, 1, "").await, DELETETASK_USAGE);

    Ok(())
}

#[tokio::test]
async fn test_change_time() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    add_task(&db.pool, 1, "2099-03-20 15:30 Buy milk").await.unwrap();

    let reply = change_time(&db.pool, 1, "1 2099-04-01 09:00").await.unwrap();
    assert_eq!(reply, "Task time updated.");

    let task = Task::find_by_id(&db.pool, 1).await?.unwrap();
    assert_eq!(
        task.scheduled_time,
        Utc.with_ymd_and_hms(2099, 4, 1, 9, 0, 0).unwrap()
    );

    assert_usage(change_time(&db.pool, 1, "1").await, CHANGETIME_USAGE);
    assert_usage(change_time(&db.pool, 1, "1 2099-04-01").await, CHANGETIME_USAGE);
    assert_usage(change_time(&db.pool, 1, "x 2099-04-01 09:00").await, CHANGETIME_USAGE);

    Ok(())
}

#[tokio::test]
async fn test_set_routine() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    add_task(&db.pool, 1, "2099-03-20 15:30 Water plants").await.unwrap();

    let reply = set_routine(&db.pool, 1, "1 weekly").await.unwrap();
    assert_eq!(reply, "Task recurrence set to weekly.");

    let task = Task::find_by_id(&db.pool, 1).await?.unwrap();
    assert_eq!(task.recurrence, Some(Recurrence::Weekly));

    assert_usage(
        set_routine(&db.pool, 1, "1 hourly").await,
        "Recurrence must be daily, weekly, or monthly.",
    );

    Ok(())
}

#[tokio::test]
async fn test_ownership_isolation() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    // User 1 owns task 1.
    add_task(&db.pool, 1, "2099-03-20 15:30 Private task").await.unwrap();
    let before = Task::find_by_id(&db.pool, 1).await?.unwrap();

    // User 2 cannot touch it through any mutating operation.
    for result in [
        delete_task(&db.pool, 2, "1").await,
        change_time(&db.pool, 2, "1 2099-05-01 08:00").await,
        set_routine(&db.pool, 2, "1 weekly").await,
    ] {
        match result {
            Err(e @ CommandError::NotFound) => {
                assert_eq!(e.to_string(), "Task not found or not yours.");
            }
            other => panic!("Expected not found, got {other:?}"),
        }
    }

    let after = Task::find_by_id(&db.pool, 1).await?.unwrap();
    assert_eq!(after.description, before.description);
    assert_eq!(after.scheduled_time, before.scheduled_time);
    assert_eq!(after.recurrence, before.recurrence);

    Ok(())
}

#[tokio::test]
async fn test_set_routine_on_foreign_task_reply_text() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    // Five filler tasks so id 5 exists and belongs to user 1.
    for i in 1..=5 {
        add_task(&db.pool, 1, &format!("2099-03-20 15:30 Task {i}")).await.unwrap();
    }

    let err = set_routine(&db.pool, 99, "5 weekly").await.unwrap_err();
    assert_eq!(err.to_string(), "Task not found or not yours.");

    let task = Task::find_by_id(&db.pool, 5).await?.unwrap();
    assert_eq!(task.recurrence, None);

    Ok(())
}
