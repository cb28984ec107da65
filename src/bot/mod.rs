// bot/mod.rs

// Exported functions
pub use self::dispatcher::run_dispatcher;
pub use self::ledger::database_path;

// Exported structs and types
pub use self::dispatcher::{BotError, Command, HandlerResult, State, UserDialogue};
pub use self::game::{BlackjackGame, Outcome};
pub use self::ledger::{CrudError, Ledger, UserRecord};
pub use self::processor::ProcessError;

// Declare submodules
mod dispatcher;
mod game;
mod handler;
mod ledger;
mod processor;
