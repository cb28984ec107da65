use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::{
    game::{BlackjackGame, Outcome},
    ledger::{CrudError, Ledger, UserRecord},
};

/* Processor is the overall logic center of the bot.
 * It handles the main logic, communicating with the front-facing handler
 * and the back-facing ledger.
 * It defines and executes the main functions required of the bot,
 * and handles exceptions and errors in the back.
 */

const CLAIM_AMOUNT: i64 = 500;
const CLAIM_COOLDOWN_HOURS: i64 = 6;
const LEADERBOARD_SIZE: u32 = 10;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProcessError {
    #[error("{0}")]
    CrudError(CrudError),
}

// Implement the From trait to convert from CrudError to ProcessError
impl From<CrudError> for ProcessError {
    fn from(crud_error: CrudError) -> ProcessError {
        ProcessError::CrudError(crud_error)
    }
}

// Verdict of a claim attempt.
#[derive(Debug, PartialEq)]
pub enum ClaimOutcome {
    Granted { amount: i64, balance: i64 },
    OnCooldown { remaining: Duration },
}

// Verdict of a bet attempt.
#[derive(Debug, PartialEq)]
pub enum BetOutcome {
    Accepted(BlackjackGame),
    InsufficientTokens { bet: i64, balance: i64 },
}

// Verdict of drawing another card.
#[derive(Debug, PartialEq)]
pub enum HitOutcome {
    Drawn(BlackjackGame),
    Bust { game: BlackjackGame, balance: i64 },
}

// A played-out round together with its settled balance.
#[derive(Debug, PartialEq)]
pub struct RoundSummary {
    pub game: BlackjackGame,
    pub outcome: Outcome,
    pub balance: i64,
}

/* Utility functions */

// True once the cooldown has fully elapsed since the last claim.
pub fn can_claim(last_claim: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_claim {
        Some(last) => now - last >= Duration::hours(CLAIM_COOLDOWN_HOURS),
        None => true,
    }
}

// Time left until the next claim becomes available.
pub fn claim_remaining(last_claim: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    last_claim + Duration::hours(CLAIM_COOLDOWN_HOURS) - now
}

/* Registers the message sender in the ledger.
 * Execution flow: get or create the user row, refreshing profile fields.
 * Called at the start of every user-facing operation.
 */
pub fn register_user(
    ledger: &Ledger,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
) -> Result<UserRecord, ProcessError> {
    Ok(ledger.get_or_create_user(user_id, username, first_name)?)
}

/* Attempts a periodic token claim.
 * Execution flow: check the cooldown against the last recorded claim,
 * then credit the claim amount and stamp the claim time together.
 */
pub fn claim_tokens(
    ledger: &Ledger,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
    now: DateTime<Utc>,
) -> Result<ClaimOutcome, ProcessError> {
    let user = ledger.get_or_create_user(user_id, username, first_name)?;

    match user.last_claim {
        Some(last) if !can_claim(Some(last), now) => Ok(ClaimOutcome::OnCooldown {
            remaining: claim_remaining(last, now),
        }),
        _ => {
            let balance = ledger.grant_claim(user_id, CLAIM_AMOUNT, now)?;
            Ok(ClaimOutcome::Granted {
                amount: CLAIM_AMOUNT,
                balance,
            })
        }
    }
}

/* Starts a blackjack round for a parsed bet amount.
 * Execution flow: check the bet against the current balance, then deal
 * the opening hands. Tokens only move once the round settles.
 */
pub fn place_bet<R: Rng>(
    ledger: &Ledger,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
    bet: i64,
    rng: &mut R,
) -> Result<BetOutcome, ProcessError> {
    let user = ledger.get_or_create_user(user_id, username, first_name)?;

    if bet > user.tokens {
        return Ok(BetOutcome::InsufficientTokens {
            bet,
            balance: user.tokens,
        });
    }

    Ok(BetOutcome::Accepted(BlackjackGame::deal(bet, rng)))
}

/* Draws another card for the player.
 * Execution flow: hit the player hand; on a bust, settle the round
 * as an immediate loss of the bet.
 */
pub fn hit_card<R: Rng>(
    ledger: &Ledger,
    user_id: i64,
    mut game: BlackjackGame,
    rng: &mut R,
) -> Result<HitOutcome, ProcessError> {
    game.hit(rng);

    if game.is_player_bust() {
        let balance =
            ledger.settle_round(user_id, Outcome::Loss.token_delta(game.bet), Outcome::Loss)?;
        return Ok(HitOutcome::Bust { game, balance });
    }

    Ok(HitOutcome::Drawn(game))
}

/* Stands on the current player hand.
 * Execution flow: play out the dealer hand, compare the totals, then
 * settle the token change and result counter together.
 */
pub fn stand<R: Rng>(
    ledger: &Ledger,
    user_id: i64,
    mut game: BlackjackGame,
    rng: &mut R,
) -> Result<RoundSummary, ProcessError> {
    game.resolve_dealer(rng);

    let outcome = game.outcome();
    let balance = ledger.settle_round(user_id, outcome.token_delta(game.bet), outcome)?;

    Ok(RoundSummary {
        game,
        outcome,
        balance,
    })
}

/* Views the leaderboard.
 * Execution flow: get the richest users from the ledger.
 */
pub fn leaderboard(ledger: &Ledger) -> Result<Vec<UserRecord>, ProcessError> {
    Ok(ledger.top_users(LEADERBOARD_SIZE)?)
}
