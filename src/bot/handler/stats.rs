use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::dispatcher::HandlerResult;
use crate::bot::ledger::Ledger;
use crate::bot::processor::{leaderboard, register_user};

use super::constants::UNKNOWN_ERROR_MESSAGE;
use super::utils::{display_leaderboard, log_message};

/* Balance command.
 * Displays the sender's tokens and round results.
 */
pub async fn action_show_balance(bot: Bot, msg: Message, ledger: Arc<Ledger>) -> HandlerResult {
    log_message(&msg);

    let user = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;

    let record =
        match register_user(&ledger, user_id, user.username.as_deref(), &user.first_name) {
            Ok(record) => record,
            Err(err) => {
                log::error!(
                    "Balance - Processor failed for user {} in chat {}: {}",
                    user_id,
                    msg.chat.id,
                    err.to_string()
                );
                bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
                return Ok(());
            }
        };

    bot.send_message(
        msg.chat.id,
        format!(
            "💰 Balance: {} tokens\n🏆 Wins: {}\n💀 Losses: {}\n🤝 Draws: {}",
            record.tokens, record.wins, record.losses, record.draws
        ),
    )
    .await?;
    Ok(())
}

/* Top command.
 * Displays the richest players, ordered by their token balance.
 */
pub async fn action_show_leaderboard(bot: Bot, msg: Message, ledger: Arc<Ledger>) -> HandlerResult {
    log_message(&msg);

    let top = match leaderboard(&ledger) {
        Ok(top) => top,
        Err(err) => {
            log::error!(
                "Top - Processor failed for chat {}: {}",
                msg.chat.id,
                err.to_string()
            );
            bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, display_leaderboard(&top))
        .await?;
    Ok(())
}
