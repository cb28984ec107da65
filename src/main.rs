use std::fs;
use std::sync::Arc;

use tokenjack::bot::{database_path, run_dispatcher, Ledger};

const TOKEN_FILE: &str = "settings/token.txt";

// Prefers the environment token, falling back to the token file.
fn bot_token() -> String {
    if let Ok(token) = std::env::var("TELOXIDE_TOKEN") {
        return token;
    }

    fs::read_to_string(TOKEN_FILE)
        .map(|token| token.trim().to_string())
        .expect("Failed to read the bot token")
}

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting TokenJack bot...");

    let bot = teloxide::Bot::new(bot_token());
    let ledger = Arc::new(Ledger::new(&database_path()).expect("Failed to open the token database"));

    log::info!("TokenJack bot started successfully!");

    run_dispatcher(bot, ledger).await;
}
