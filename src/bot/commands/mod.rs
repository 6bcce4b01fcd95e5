pub mod tasks;

use crate::database::models::Recurrence;
use crate::utils::datetime::parse_date_time;
use crate::utils::validation::validate_description;
use chrono::{DateTime, Utc};
use teloxide::utils::command::BotCommands;
use thiserror::Error;

pub const ADDTASK_USAGE: &str = "Usage: /addtask YYYY-MM-DD HH:MM description";
pub const DELETETASK_USAGE: &str = "Usage: /deletetask <task_id>";
pub const CHANGETIME_USAGE: &str = "Usage: /changetime <task_id> YYYY-MM-DD HH:MM";
pub const SETROUTINE_USAGE: &str = "Usage: /setroutine <task_id> daily|weekly|monthly";

/// Commands understood by the bot. Argument-taking variants capture the raw
/// text after the command; the parse_* helpers below turn it into typed
/// values so malformed input surfaces as the usage hints users expect,
/// not as framework parse errors.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Task reminder bot commands:")]
pub enum Command {
    #[command(description = "display this help message")]
    Help,
    #[command(description = "start the bot")]
    Start,
    #[command(description = "add a one-time task: /addtask YYYY-MM-DD HH:MM description")]
    AddTask(String),
    #[command(description = "list your upcoming tasks")]
    MyTasks,
    #[command(description = "delete a task: /deletetask <task_id>")]
    DeleteTask(String),
    #[command(description = "reschedule a task: /changetime <task_id> YYYY-MM-DD HH:MM")]
    ChangeTime(String),
    #[command(description = "set task recurrence: /setroutine <task_id> daily|weekly|monthly")]
    SetRoutine(String),
}

/// Command-boundary error taxonomy. `Usage` and `NotFound` render directly as
/// the reply text; `Store` is logged and replaced with a generic reply so
/// internal error text never reaches the chat.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error("Task not found or not yours.")]
    NotFound,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

pub fn parse_addtask_args(args: &str) -> Result<(DateTime<Utc>, String), CommandError> {
    let mut parts = args.split_whitespace();
    let (Some(date), Some(time)) = (parts.next(), parts.next()) else {
        return Err(CommandError::Usage(ADDTASK_USAGE.to_string()));
    };

    let description = parts.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err(CommandError::Usage(ADDTASK_USAGE.to_string()));
    }
    validate_description(&description).map_err(|e| CommandError::Usage(e.to_string()))?;

    let scheduled_time = parse_date_time(date, time)
        .map_err(|_| CommandError::Usage(ADDTASK_USAGE.to_string()))?;

    Ok((scheduled_time, description))
}

pub fn parse_deletetask_args(args: &str) -> Result<i64, CommandError> {
    parse_task_id(args.split_whitespace().next(), DELETETASK_USAGE)
}

pub fn parse_changetime_args(args: &str) -> Result<(i64, DateTime<Utc>), CommandError> {
    let mut parts = args.split_whitespace();
    let task_id = parse_task_id(parts.next(), CHANGETIME_USAGE)?;

    let (Some(date), Some(time)) = (parts.next(), parts.next()) else {
        return Err(CommandError::Usage(CHANGETIME_USAGE.to_string()));
    };
    let new_time = parse_date_time(date, time)
        .map_err(|_| CommandError::Usage(CHANGETIME_USAGE.to_string()))?;

    Ok((task_id, new_time))
}

pub fn parse_setroutine_args(args: &str) -> Result<(i64, Recurrence), CommandError> {
    let mut parts = args.split_whitespace();
    let task_id = parse_task_id(parts.next(), SETROUTINE_USAGE)?;

    let Some(name) = parts.next() else {
        return Err(CommandError::Usage(SETROUTINE_USAGE.to_string()));
    };
    let recurrence = name
        .parse::<Recurrence>()
        .map_err(|e| CommandError::Usage(e.to_string()))?;

    Ok((task_id, recurrence))
}

fn parse_task_id(token: Option<&str>, usage: &str) -> Result<i64, CommandError> {
    token
        .and_then(|t| t.parse::<i64>().ok())
        .ok_or_else(|| CommandError::Usage(usage.to_string()))
}
