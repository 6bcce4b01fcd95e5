use teloxide::prelude::*;

use super::{
    parse_addtask_args, parse_changetime_args, parse_deletetask_args, parse_setroutine_args,
    CommandError,
};
use crate::database::{connection::DatabaseManager, models::Task};
use crate::utils::datetime::format_datetime;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};
use chrono::Utc;

/// `/mytasks` shows at most this many rows.
pub const UPCOMING_TASKS_LIMIT: i64 = 20;

/// Reply for store failures; the real error only goes to the log.
pub const GENERIC_FAILURE_REPLY: &str = "Something went wrong. Please try again later.";

/// Inserts a one-time task for `owner_id` and returns the confirmation reply.
pub async fn add_task(
    pool: &sqlx::SqlitePool,
    owner_id: i64,
    args: &str,
) -> Result<String, CommandError> {
    let (scheduled_time, description) = parse_addtask_args(args)?;
    let task_id = Task::create(pool, owner_id, &description, scheduled_time).await?;

    Ok(format!("Task added with ID {}", task_id))
}

/// Lists the caller's upcoming tasks, soonest first, capped at 20.
pub async fn list_tasks(pool: &sqlx::SqlitePool, owner_id: i64) -> Result<String, CommandError> {
    let tasks = Task::find_upcoming(pool, owner_id, Utc::now(), UPCOMING_TASKS_LIMIT).await?;

    if tasks.is_empty() {
        return Ok("No upcoming tasks.".to_string());
    }

    let mut reply = String::from("Your upcoming tasks:");
    for task in &tasks {
        reply.push_str(&format!(
            "\n{}: {} at {}",
            task.id,
            task.description,
            format_datetime(&task.scheduled_time)
        ));
    }

    Ok(reply)
}

/// Deletes the caller's task by id.
pub async fn delete_task(
    pool: &sqlx::SqlitePool,
    owner_id: i64,
    args: &str,
) -> Result<String, CommandError> {
    let task_id = parse_deletetask_args(args)?;
    let affected = Task::delete_owned(pool, task_id, owner_id).await?;

    if affected == 0 {
        return Err(CommandError::NotFound);
    }
    Ok("Task deleted.".to_string())
}

/// Reschedules the caller's task to a new UTC time.
pub async fn change_time(
    pool: &sqlx::SqlitePool,
    owner_id: i64,
    args: &str,
) -> Result<String, CommandError> {
    let (task_id, new_time) = parse_changetime_args(args)?;
    let affected = Task::update_time_owned(pool, task_id, owner_id, new_time).await?;

    if affected == 0 {
        return Err(CommandError::NotFound);
    }
    Ok("Task time updated.".to_string())
}

/// Sets the recurrence rule on the caller's task.
pub async fn set_routine(
    pool: &sqlx::SqlitePool,
    owner_id: i64,
    args: &str,
) -> Result<String, CommandError> {
    let (task_id, recurrence) = parse_setroutine_args(args)?;
    let affected = Task::update_recurrence_owned(pool, task_id, owner_id, recurrence).await?;

    if affected == 0 {
        return Err(CommandError::NotFound);
    }
    Ok(format!("Task recurrence set to {}.", recurrence))
}

/// Maps a command error to the reply text. Usage and not-found errors render
/// verbatim; store errors are logged and masked.
pub fn error_reply(command: &str, user_id: i64, chat_id: i64, err: &CommandError) -> String {
    match err {
        CommandError::Store(e) => {
            log_command_error(command, user_id, chat_id, &e.to_string());
            GENERIC_FAILURE_REPLY.to_string()
        }
        other => other.to_string(),
    }
}

pub async fn handle_addtask(
    bot: Bot,
    msg: Message,
    args: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let Some((owner_id, chat_id)) = caller_identity(&msg) else {
        return Ok(());
    };

    log_command_start("addtask", owner_id, chat_id, None);
    let reply = match add_task(&db.pool, owner_id, &args).await {
        Ok(text) => {
            log_command_success("addtask", owner_id, chat_id, Some(&text));
            text
        }
        Err(e) => error_reply("addtask", owner_id, chat_id, &e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

pub async fn handle_mytasks(bot: Bot, msg: Message, db: &DatabaseManager) -> ResponseResult<()> {
    let Some((owner_id, chat_id)) = caller_identity(&msg) else {
        return Ok(());
    };

    log_command_start("mytasks", owner_id, chat_id, None);
    let reply = match list_tasks(&db.pool, owner_id).await {
        Ok(text) => {
            log_command_success("mytasks", owner_id, chat_id, None);
            text
        }
        Err(e) => error_reply("mytasks", owner_id, chat_id, &e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

pub async fn handle_deletetask(
    bot: Bot,
    msg: Message,
    args: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let Some((owner_id, chat_id)) = caller_identity(&msg) else {
        return Ok(());
    };

    log_command_start("deletetask", owner_id, chat_id, Some(&args));
    let reply = match delete_task(&db.pool, owner_id, &args).await {
        Ok(text) => {
            log_command_success("deletetask", owner_id, chat_id, None);
            text
        }
        Err(e) => error_reply("deletetask", owner_id, chat_id, &e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

pub async fn handle_changetime(
    bot: Bot,
    msg: Message,
    args: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let Some((owner_id, chat_id)) = caller_identity(&msg) else {
        return Ok(());
    };

    log_command_start("changetime", owner_id, chat_id, Some(&args));
    let reply = match change_time(&db.pool, owner_id, &args).await {
        Ok(text) => {
            log_command_success("changetime", owner_id, chat_id, None);
            text
        }
        Err(e) => error_reply("changetime", owner_id, chat_id, &e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

pub async fn handle_setroutine(
    bot: Bot,
    msg: Message,
    args: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let Some((owner_id, chat_id)) = caller_identity(&msg) else {
        return Ok(());
    };

    log_command_start("setroutine", owner_id, chat_id, Some(&args));
    let reply = match set_routine(&db.pool, owner_id, &args).await {
        Ok(text) => {
            log_command_success("setroutine", owner_id, chat_id, None);
            text
        }
        Err(e) => error_reply("setroutine", owner_id, chat_id, &e),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Owner and chat ids for a command message. Messages without a sender
/// (channel posts) carry no owner identity and are ignored.
fn caller_identity(msg: &Message) -> Option<(i64, i64)> {
    let user = msg.from()?;
    Some((user.id.0 as i64, msg.chat.id.0))
}
