// Exported functions
pub use self::blackjack::{
    action_game_move, action_place_bet, action_start_blackjack, handle_repeated_blackjack,
};
pub use self::claim::action_claim;
pub use self::general::{action_help, action_menu, action_start};
pub use self::stats::{action_show_balance, action_show_leaderboard};

// Submodules
mod blackjack;
mod claim;
mod constants;
mod general;
mod stats;
mod utils;
