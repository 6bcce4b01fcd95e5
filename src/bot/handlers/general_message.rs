use teloxide::prelude::*;

/// Fallback for messages the command filter rejected. Unrecognized commands
/// get a reply; plain chatter is ignored to avoid spam.
pub async fn handle_general_message(bot: Bot, msg: Message) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            tracing::debug!(
                "Unknown command in chat {}: {}",
                msg.chat.id,
                text.split_whitespace().next().unwrap_or(text)
            );
            bot.send_message(msg.chat.id, "Sorry, I didn't understand that command.")
                .await?;
        }
    }

    Ok(())
}
