/* Button labels and messages shared across handlers. */

// Main menu button labels
pub const BUTTON_CLAIM: &str = "💰 Claim tokens";
pub const BUTTON_BLACKJACK: &str = "🃏 Blackjack";
pub const BUTTON_BALANCE: &str = "📊 Balance";
pub const BUTTON_TOP: &str = "🏆 Top players";

// In-game button labels
pub const BUTTON_HIT: &str = "➕ Hit";
pub const BUTTON_STAND: &str = "🛑 Stand";

// Shared messages
pub const UNKNOWN_ERROR_MESSAGE: &str = "❓ Something went wrong! Please try again later.";
pub const NO_ACTIVE_GAME_MESSAGE: &str = "❌ You don't have an active game.";
