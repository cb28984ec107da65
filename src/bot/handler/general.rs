use std::sync::Arc;

use teloxide::{payloads::SendMessageSetters, prelude::*, utils::command::BotCommands};

use crate::bot::dispatcher::{Command, HandlerResult, UserDialogue};
use crate::bot::ledger::Ledger;
use crate::bot::processor::register_user;

use super::{
    action_claim, action_show_balance, action_show_leaderboard, action_start_blackjack,
    constants::{
        BUTTON_BALANCE, BUTTON_BLACKJACK, BUTTON_CLAIM, BUTTON_HIT, BUTTON_STAND, BUTTON_TOP,
        NO_ACTIVE_GAME_MESSAGE, UNKNOWN_ERROR_MESSAGE,
    },
    handle_repeated_blackjack,
    utils::{log_message, main_menu},
};

/* Start command.
 * Registers the user and displays a welcome message with the main menu.
 */
pub async fn action_start(bot: Bot, msg: Message, ledger: Arc<Ledger>) -> HandlerResult {
    log_message(&msg);

    let user = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;

    if let Err(err) = register_user(&ledger, user_id, user.username.as_deref(), &user.first_name) {
        log::error!(
            "Start - Processor failed to register user {} in chat {}: {}",
            user_id,
            msg.chat.id,
            err.to_string()
        );
        bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        "👋 Hi! I'm a game bot with tokens and mini games! Pick an action below:",
    )
    .reply_markup(main_menu())
    .await?;
    Ok(())
}

/* Help command.
 * Displays a list of commands available to the user.
 */
pub async fn action_help(bot: Bot, msg: Message) -> HandlerResult {
    log_message(&msg);

    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/* Menu dispatch.
 * This action is invoked when no round is active, and there is a non-command
 * message addressed to the bot. Matches the main menu buttons, reminds the
 * user when a round button arrives without a round, and otherwise does not
 * respond to anything. Reduces spam.
 */
pub async fn action_menu(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    ledger: Arc<Ledger>,
) -> HandlerResult {
    // Checks if msg is a service message, ignores it if so
    let text = match msg.text() {
        Some(text) => text,
        None => return Ok(()),
    };

    match text {
        BUTTON_CLAIM => action_claim(bot, msg, ledger).await,
        BUTTON_BLACKJACK => action_start_blackjack(bot, dialogue, msg, ledger).await,
        BUTTON_BALANCE => action_show_balance(bot, msg, ledger).await,
        BUTTON_TOP => action_show_leaderboard(bot, msg, ledger).await,
        BUTTON_HIT | BUTTON_STAND => {
            log_message(&msg);
            bot.send_message(msg.chat.id, NO_ACTIVE_GAME_MESSAGE).await?;
            Ok(())
        }
        _ => Ok(()),
    }
}
