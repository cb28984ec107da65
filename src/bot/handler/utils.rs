use chrono::Duration;
use teloxide::types::{KeyboardButton, KeyboardMarkup, Message};

use crate::bot::dispatcher::BotError;
use crate::bot::game::{hand_total, Card};
use crate::bot::ledger::UserRecord;

use super::constants::{
    BUTTON_BALANCE, BUTTON_BLACKJACK, BUTTON_CLAIM, BUTTON_HIT, BUTTON_STAND, BUTTON_TOP,
};

/* Common utilities for handlers. */

// Make a reply keyboard, button menu.
pub fn make_keyboard(options: Vec<&str>, columns: Option<usize>) -> KeyboardMarkup {
    let mut keyboard: Vec<Vec<KeyboardButton>> = Vec::new();
    if let Some(col) = columns {
        for chunk in options.chunks(col) {
            let mut row: Vec<KeyboardButton> = Vec::new();
            for option in chunk {
                row.push(KeyboardButton::new(option.to_string()));
            }
            keyboard.push(row);
        }
    } else {
        for option in options {
            keyboard.push(vec![KeyboardButton::new(option)]);
        }
    }

    KeyboardMarkup::new(keyboard).resize_keyboard(true)
}

// Keyboard with the four main menu actions.
pub fn main_menu() -> KeyboardMarkup {
    make_keyboard(
        vec![BUTTON_CLAIM, BUTTON_BLACKJACK, BUTTON_BALANCE, BUTTON_TOP],
        Some(2),
    )
}

// Keyboard with the two round actions.
pub fn game_menu() -> KeyboardMarkup {
    make_keyboard(vec![BUTTON_HIT, BUTTON_STAND], Some(2))
}

// Parse a bet amount. Reads a string, and returns a positive integer.
pub fn parse_bet(text: &str) -> Result<i64, BotError> {
    let bet = match text.trim().parse::<i64>() {
        Ok(bet) => bet,
        Err(_) => {
            return Err(BotError::UserError(
                "❌ Enter a whole number for the bet.".to_string(),
            ));
        }
    };

    if bet <= 0 {
        Err(BotError::UserError(
            "❌ The bet must be positive.".to_string(),
        ))
    } else {
        Ok(bet)
    }
}

// Emoji face for a single card value.
pub fn card_to_symbol(card: Card) -> String {
    match card {
        2 => "2️⃣".to_string(),
        3 => "3️⃣".to_string(),
        4 => "4️⃣".to_string(),
        5 => "5️⃣".to_string(),
        6 => "6️⃣".to_string(),
        7 => "7️⃣".to_string(),
        8 => "8️⃣".to_string(),
        9 => "9️⃣".to_string(),
        10 => "🔟".to_string(),
        11 => "🂡".to_string(),
        other => other.to_string(),
    }
}

// Displays a hand as card symbols followed by its total.
pub fn display_hand(hand: &[Card]) -> String {
    let symbols: Vec<String> = hand.iter().map(|&card| card_to_symbol(card)).collect();
    format!("{} (total: {})", symbols.join(" "), hand_total(hand))
}

// Displays a remaining duration as a zero-padded HH:MM:SS countdown.
pub fn display_countdown(remaining: &Duration) -> String {
    let total_seconds = remaining.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

// Displays the leaderboard, one numbered line per player.
pub fn display_leaderboard(users: &[UserRecord]) -> String {
    let mut text = "🏆 Top players by tokens:\n\n".to_string();
    for (position, user) in users.iter().enumerate() {
        let name = match &user.username {
            Some(username) => format!("@{}", username),
            None => user.first_name.clone(),
        };
        text += &format!("{}. {} - {} tokens\n", position + 1, name, user.tokens);
    }

    text
}

// Logs a handled user message to the transcript target.
pub fn log_message(msg: &Message) {
    if let Some(user) = msg.from() {
        let handle = match &user.username {
            Some(username) => format!("@{}", username),
            None => "no username".to_string(),
        };
        log::info!(
            target: "messages",
            "{} ({}) - {}",
            user.first_name,
            handle,
            msg.text().unwrap_or("")
        );
    }
}

// Tests
#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::{display_countdown, display_hand, display_leaderboard, parse_bet};
    use crate::bot::dispatcher::BotError;
    use crate::bot::ledger::UserRecord;

    fn record(user_id: i64, username: Option<&str>, first_name: &str, tokens: i64) -> UserRecord {
        UserRecord {
            user_id,
            username: username.map(|name| name.to_string()),
            first_name: first_name.to_string(),
            tokens,
            wins: 0,
            losses: 0,
            draws: 0,
            last_claim: None,
        }
    }

    #[test]
    fn test_parse_bet_valid() {
        assert!(matches!(parse_bet("200"), Ok(200)));
        assert!(matches!(parse_bet("  15 "), Ok(15)));
    }

    #[test]
    fn test_parse_bet_not_a_number() {
        let result = parse_bet("all in");
        assert!(
            matches!(result, Err(BotError::UserError(text)) if text.contains("whole number"))
        );
    }

    #[test]
    fn test_parse_bet_not_positive() {
        for input in ["0", "-5"] {
            let result = parse_bet(input);
            assert!(
                matches!(result, Err(BotError::UserError(text)) if text.contains("positive"))
            );
        }
    }

    #[test]
    fn test_display_hand_shows_symbols_and_total() {
        assert_eq!(display_hand(&[2, 10, 11]), "2️⃣ 🔟 🂡 (total: 23)");
    }

    #[test]
    fn test_display_countdown_pads_fields() {
        assert_eq!(display_countdown(&Duration::seconds(5)), "00:00:05");
        assert_eq!(
            display_countdown(&Duration::seconds(5 * 3600 + 59 * 60 + 59)),
            "05:59:59"
        );
    }

    #[test]
    fn test_display_countdown_floors_at_zero() {
        assert_eq!(display_countdown(&Duration::seconds(-30)), "00:00:00");
    }

    #[test]
    fn test_display_leaderboard_prefers_username() {
        let users = vec![
            record(1, Some("alice"), "Alice", 900),
            record(2, None, "Bob", 400),
        ];
        let text = display_leaderboard(&users);

        assert_eq!(
            text,
            "🏆 Top players by tokens:\n\n1. @alice - 900 tokens\n2. Bob - 400 tokens\n"
        );
    }
}
