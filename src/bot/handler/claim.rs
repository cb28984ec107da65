use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;

use crate::bot::dispatcher::HandlerResult;
use crate::bot::ledger::Ledger;
use crate::bot::processor::{claim_tokens, ClaimOutcome};

use super::constants::UNKNOWN_ERROR_MESSAGE;
use super::utils::{display_countdown, log_message};

/* Claim action.
 * Grants the periodic token payout, or reports the remaining cooldown.
 */
pub async fn action_claim(bot: Bot, msg: Message, ledger: Arc<Ledger>) -> HandlerResult {
    log_message(&msg);

    let user = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;

    let outcome = claim_tokens(
        &ledger,
        user_id,
        user.username.as_deref(),
        &user.first_name,
        Utc::now(),
    );
    match outcome {
        Ok(ClaimOutcome::Granted { amount, balance }) => {
            log::info!(
                "Claim - Granted {} tokens to user {} in chat {}, balance now {}",
                amount,
                user_id,
                msg.chat.id,
                balance
            );
            bot.send_message(msg.chat.id, format!("🎉 You received {} tokens!", amount))
                .await?;
        }
        Ok(ClaimOutcome::OnCooldown { remaining }) => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "⌛️ You can claim more tokens in: {}",
                    display_countdown(&remaining)
                ),
            )
            .await?;
        }
        Err(err) => {
            log::error!(
                "Claim - Processor failed for user {} in chat {}: {}",
                user_id,
                msg.chat.id,
                err.to_string()
            );
            bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
        }
    }
    Ok(())
}
