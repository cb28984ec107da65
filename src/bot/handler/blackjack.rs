use std::sync::Arc;

use teloxide::{payloads::SendMessageSetters, prelude::*};

use crate::bot::dispatcher::{HandlerResult, State, UserDialogue};
use crate::bot::game::{BlackjackGame, Outcome};
use crate::bot::ledger::Ledger;
use crate::bot::processor::{hit_card, place_bet, register_user, stand, BetOutcome, HitOutcome};

use super::{
    action_claim, action_show_balance, action_show_leaderboard,
    constants::{
        BUTTON_BALANCE, BUTTON_BLACKJACK, BUTTON_CLAIM, BUTTON_HIT, BUTTON_STAND, BUTTON_TOP,
        UNKNOWN_ERROR_MESSAGE,
    },
    utils::{card_to_symbol, display_hand, game_menu, log_message, main_menu, parse_bet},
};

/* Utilities */
const BET_PROMPT_MESSAGE: &str = "💵 Enter a bet for the blackjack round:";
const GAME_IN_PROGRESS_MESSAGE: &str =
    "🃏 A round is already running. Enter your bet or finish the current round.";
const INSUFFICIENT_TOKENS_MESSAGE: &str = "❌ Not enough tokens for that bet.";

// Displays the opening hands, with the dealer showing one card.
fn display_deal(game: &BlackjackGame) -> String {
    format!(
        "┌───────────── BLACKJACK ─────────────┐\n│ 🂠 Your hand: {}\n│ 🂠 Dealer's card: {}\n└─────────────────────────────────────┘",
        display_hand(&game.player),
        card_to_symbol(game.dealer[0]),
    )
}

/* Blackjack entry.
 * Registers the user, opens a round bound to them, and asks for a bet.
 */
pub async fn action_start_blackjack(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    ledger: Arc<Ledger>,
) -> HandlerResult {
    log_message(&msg);

    let user = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;

    if let Err(err) = register_user(&ledger, user_id, user.username.as_deref(), &user.first_name) {
        log::error!(
            "Blackjack Entry - Processor failed to register user {} in chat {}: {}",
            user_id,
            msg.chat.id,
            err.to_string()
        );
        bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, BET_PROMPT_MESSAGE).await?;
    dialogue.update(State::AwaitingBet { user_id }).await?;
    Ok(())
}

/* Handles a repeated attempt to start a round.
 * Does nothing to the running round, simply notifies the user.
 */
pub async fn handle_repeated_blackjack(bot: Bot, msg: Message) -> HandlerResult {
    log_message(&msg);

    bot.send_message(msg.chat.id, GAME_IN_PROGRESS_MESSAGE)
        .await?;
    Ok(())
}

/* Bet placement.
 * Bot receives a bet amount from the user who opened the round, validates
 * it against the balance, and deals the opening hands. Messages from
 * anyone else are ignored.
 */
pub async fn action_place_bet(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    ledger: Arc<Ledger>,
    user_id: i64,
) -> HandlerResult {
    let user = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    if user.id.0 as i64 != user_id {
        return Ok(());
    }

    log_message(&msg);

    let text = match msg.text() {
        Some(text) => text,
        None => return Ok(()),
    };

    let bet = match parse_bet(text) {
        Ok(bet) => bet,
        Err(err) => {
            bot.send_message(msg.chat.id, err.to_string()).await?;
            return Ok(());
        }
    };

    let result = place_bet(
        &ledger,
        user_id,
        user.username.as_deref(),
        &user.first_name,
        bet,
        &mut rand::thread_rng(),
    );
    match result {
        Ok(BetOutcome::Accepted(game)) => {
            log::info!(
                "Blackjack Bet - User {} in chat {} bet {} tokens on a new round",
                user_id,
                msg.chat.id,
                bet
            );
            bot.send_message(msg.chat.id, display_deal(&game))
                .reply_markup(game_menu())
                .await?;
            dialogue.update(State::InProgress { user_id, game }).await?;
        }
        Ok(BetOutcome::InsufficientTokens { .. }) => {
            bot.send_message(msg.chat.id, INSUFFICIENT_TOKENS_MESSAGE)
                .await?;
        }
        Err(err) => {
            log::error!(
                "Blackjack Bet - Processor failed for user {} in chat {}: {}",
                user_id,
                msg.chat.id,
                err.to_string()
            );
            bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
        }
    }
    Ok(())
}

/* Round actions.
 * Bot receives the hit or stand button during a round. Only the user who
 * opened the round is heard, and messages from anyone else are ignored.
 * The main menu buttons keep working mid-round, another blackjack request
 * is turned away, and any other text is ignored.
 */
pub async fn action_game_move(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    ledger: Arc<Ledger>,
    (user_id, game): (i64, BlackjackGame),
) -> HandlerResult {
    let sender = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    if sender.id.0 as i64 != user_id {
        return Ok(());
    }

    let text = match msg.text() {
        Some(text) => text,
        None => return Ok(()),
    };

    match text {
        BUTTON_HIT => action_hit(bot, dialogue, msg, ledger, user_id, game).await,
        BUTTON_STAND => action_stand(bot, dialogue, msg, ledger, user_id, game).await,
        BUTTON_CLAIM => action_claim(bot, msg, ledger).await,
        BUTTON_BALANCE => action_show_balance(bot, msg, ledger).await,
        BUTTON_TOP => action_show_leaderboard(bot, msg, ledger).await,
        BUTTON_BLACKJACK => handle_repeated_blackjack(bot, msg).await,
        _ => Ok(()),
    }
}

/* Hit: draws another card for the player.
 * A bust settles the round as a loss against its owner and closes it.
 */
async fn action_hit(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    ledger: Arc<Ledger>,
    user_id: i64,
    game: BlackjackGame,
) -> HandlerResult {
    log_message(&msg);

    let result = hit_card(&ledger, user_id, game, &mut rand::thread_rng());
    match result {
        Ok(HitOutcome::Drawn(game)) => {
            bot.send_message(
                msg.chat.id,
                format!("🂠 Your hand: {}", display_hand(&game.player)),
            )
            .reply_markup(game_menu())
            .await?;
            dialogue.update(State::InProgress { user_id, game }).await?;
        }
        Ok(HitOutcome::Bust { game, balance }) => {
            log::info!(
                "Blackjack Hit - User {} in chat {} went bust, balance now {}",
                user_id,
                msg.chat.id,
                balance
            );
            dialogue.exit().await?;

            let report = format!(
                "┌─────── RESULT 🃏 ───────┐\n│ 💥 Bust! Your total: {}\n│ You lost 💸\n└─────────────────────────┘",
                game.player_total()
            );
            bot.send_message(msg.chat.id, report)
                .reply_markup(main_menu())
                .await?;
        }
        Err(err) => {
            log::error!(
                "Blackjack Hit - Processor failed for user {} in chat {}: {}",
                user_id,
                msg.chat.id,
                err.to_string()
            );
            bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
        }
    }
    Ok(())
}

/* Stand: plays out the dealer hand and settles the round for its owner. */
async fn action_stand(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    ledger: Arc<Ledger>,
    user_id: i64,
    game: BlackjackGame,
) -> HandlerResult {
    log_message(&msg);

    let result = stand(&ledger, user_id, game, &mut rand::thread_rng());
    match result {
        Ok(summary) => {
            log::info!(
                "Blackjack Stand - User {} in chat {} finished a round with {:?}, balance now {}",
                user_id,
                msg.chat.id,
                summary.outcome,
                summary.balance
            );
            dialogue.exit().await?;

            let verdict = match summary.outcome {
                Outcome::Win => "🎉 You won!",
                Outcome::Loss => "💸 You lost.",
                Outcome::Draw => "🤝 Draw. Your bet is returned.",
            };
            let report = format!(
                "┌─────── RESULT 🃏 ───────┐\n│ 🂠 Your hand: {}\n│ 🂠 Dealer's hand: {}\n│ {}\n└─────────────────────────┘",
                display_hand(&summary.game.player),
                display_hand(&summary.game.dealer),
                verdict
            );
            bot.send_message(msg.chat.id, report)
                .reply_markup(main_menu())
                .await?;
        }
        Err(err) => {
            log::error!(
                "Blackjack Stand - Processor failed for user {} in chat {}: {}",
                user_id,
                msg.chat.id,
                err.to_string()
            );
            bot.send_message(msg.chat.id, UNKNOWN_ERROR_MESSAGE).await?;
        }
    }
    Ok(())
}
