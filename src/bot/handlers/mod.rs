pub mod general_message;
pub mod message;

use crate::bot::commands::Command;
use crate::database::connection::DatabaseManager;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

pub struct BotHandler {
    pub db: DatabaseManager,
}

impl BotHandler {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    /// Recognized commands go to the command handler; any other message that
    /// looks like a command gets the fallback reply.
    pub fn schema(&self) -> UpdateHandler<teloxide::RequestError> {
        use teloxide::dispatching::UpdateFilterExt;

        let db = self.db.clone();

        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let db = db.clone();
                        async move { message::command_handler(bot, msg, cmd, db).await }
                    }),
            )
            .branch(dptree::endpoint(general_message::handle_general_message))
    }
}
