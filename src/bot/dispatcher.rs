use std::sync::Arc;

use teloxide::{
    dispatching::{
        dialogue,
        dialogue::{InMemStorage, InMemStorageError},
    },
    prelude::*,
    utils::command::BotCommands,
    RequestError,
};

use super::game::BlackjackGame;
use super::handler::{
    action_game_move, action_help, action_menu, action_place_bet, action_show_balance,
    action_show_leaderboard, action_start, action_start_blackjack, handle_repeated_blackjack,
};
use super::ledger::Ledger;
use super::processor::ProcessError;

/* Dispatcher is the front-facing agent of the bot.
 * It receives messages and commands from the user, and routes them by the
 * current dialogue state. All user interaction, including sending and
 * crafting of messages, is done in the handler, which communicates only
 * with the Processor. Processor may propagate some errors here.
 */

/* Types */
pub type UserDialogue = Dialogue<State, InMemStorage<State>>;
pub type HandlerResult = Result<(), BotError>;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("{0}")]
    UserError(String),
    #[error("Process error: {0}")]
    ProcessError(ProcessError),
    #[error("Request error: {0}")]
    RequestError(RequestError),
}

// Implement the From trait to convert from RequestError to BotError
impl From<RequestError> for BotError {
    fn from(request_error: RequestError) -> BotError {
        BotError::RequestError(request_error)
    }
}

// Implement the From trait to convert from ProcessError to BotError
impl From<ProcessError> for BotError {
    fn from(process_error: ProcessError) -> BotError {
        BotError::ProcessError(process_error)
    }
}

// Implement the From trait to convert from InMemStorageError to BotError
impl From<InMemStorageError> for BotError {
    fn from(storage_error: InMemStorageError) -> BotError {
        BotError::UserError(storage_error.to_string())
    }
}

/* A running session is bound to the user who opened it. Every non-idle
 * state carries that user's id, so the handlers can ignore messages from
 * anyone else and settle the round against its owner.
 */
#[derive(Clone, Default)]
pub enum State {
    #[default]
    Idle,
    AwaitingBet {
        user_id: i64,
    },
    InProgress {
        user_id: i64,
        game: BlackjackGame,
    },
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Show the main menu.")]
    Start,
    #[command(description = "Show this list of commands.")]
    Help,
    #[command(description = "Show your tokens and round results.")]
    Balance,
    #[command(description = "Show the top players by tokens.")]
    Top,
    #[command(description = "Start a round of blackjack.")]
    Blackjack,
}

/* Main Dispatch function */
pub async fn run_dispatcher(bot: Bot, ledger: Arc<Ledger>) {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(action_start))
        .branch(case![Command::Help].endpoint(action_help))
        .branch(case![Command::Balance].endpoint(action_show_balance))
        .branch(case![Command::Top].endpoint(action_show_leaderboard))
        .branch(
            case![State::Idle].branch(case![Command::Blackjack].endpoint(action_start_blackjack)),
        )
        .branch(case![Command::Blackjack].endpoint(handle_repeated_blackjack));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(case![State::AwaitingBet { user_id }].endpoint(action_place_bet))
        .branch(case![State::InProgress { user_id, game }].endpoint(action_game_move))
        .branch(dptree::endpoint(action_menu));

    let schema = dialogue::enter::<Update, InMemStorage<State>, State, _>().branch(message_handler);

    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![InMemStorage::<State>::new(), ledger])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
