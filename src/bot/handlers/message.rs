use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{tasks, Command};
use crate::database::connection::DatabaseManager;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db: DatabaseManager,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "Hello! I'm your task reminder bot.\n\n\
                 Use /addtask YYYY-MM-DD HH:MM description to schedule a reminder.\n\
                 Use /help to see all commands.",
            )
            .await?;
        }
        Command::AddTask(args) => {
            tasks::handle_addtask(bot, msg, args, &db).await?;
        }
        Command::MyTasks => {
            tasks::handle_mytasks(bot, msg, &db).await?;
        }
        Command::DeleteTask(args) => {
            tasks::handle_deletetask(bot, msg, args, &db).await?;
        }
        Command::ChangeTime(args) => {
            tasks::handle_changetime(bot, msg, args, &db).await?;
        }
        Command::SetRoutine(args) => {
            tasks::handle_setroutine(bot, msg, args, &db).await?;
        }
    }
    Ok(())
}
