use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::bot::game::Outcome;

use super::connect::open_database;
use super::user::{
    add_tokens_clamped, get_tokens, get_top_users, get_user_exists, get_user_row, increment_draws,
    increment_losses, increment_wins, insert_user, set_last_claim, update_user_profile, UserRecord,
};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CrudError {
    #[error("SQLite operation error: {0}")]
    SqliteError(rusqlite::Error),
    #[error("Database lock poisoned")]
    PoisonedLockError(),
}

// Implement the From trait to convert from rusqlite::Error to CrudError
impl From<rusqlite::Error> for CrudError {
    fn from(sqlite_error: rusqlite::Error) -> CrudError {
        CrudError::SqliteError(sqlite_error)
    }
}

/* SQLite Ledger
 * Ledger represents a module that manages all database operations.
 * No external package should call any of the row operations directly,
 * only through the ledger.
 * The ledger then exposes APIs for the main package to call.
 */
pub struct Ledger {
    conn: Mutex<Connection>,
}

impl Ledger {
    // Opens the ledger at the given database path.
    pub fn new(path: &str) -> Result<Ledger, CrudError> {
        let conn = open_database(path)?;

        Ok(Ledger {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> Result<MutexGuard<Connection>, CrudError> {
        self.conn.lock().map_err(|_| CrudError::PoisonedLockError())
    }

    /* Checks if a user exists, and if not, adds them.
     * If the user exists, ensures that the stored profile fields are current.
     * Called on every interaction, and returns the resulting row.
     */
    pub fn get_or_create_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
    ) -> Result<UserRecord, CrudError> {
        let conn = self.connection()?;

        if !get_user_exists(&conn, user_id)? {
            insert_user(&conn, user_id, username, first_name)?;
        } else {
            let current = get_user_row(&conn, user_id)?;
            if current.username.as_deref() != username || current.first_name != first_name {
                update_user_profile(&conn, user_id, username, first_name)?;
            }
        }

        Ok(get_user_row(&conn, user_id)?)
    }

    /* Pays out a periodic claim in one step:
     * credits the claim amount and stamps the claim time together.
     * Returns the updated token balance.
     */
    pub fn grant_claim(
        &self,
        user_id: i64,
        amount: i64,
        claimed_at: DateTime<Utc>,
    ) -> Result<i64, CrudError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        add_tokens_clamped(&tx, user_id, amount)?;
        set_last_claim(&tx, user_id, claimed_at)?;
        let balance = get_tokens(&tx, user_id)?;
        tx.commit()?;

        Ok(balance)
    }

    /* Settles a finished round in one step:
     * applies the signed token change (clamped at zero) and bumps the
     * matching result counter together.
     * Returns the updated token balance.
     */
    pub fn settle_round(
        &self,
        user_id: i64,
        token_delta: i64,
        outcome: Outcome,
    ) -> Result<i64, CrudError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        add_tokens_clamped(&tx, user_id, token_delta)?;
        match outcome {
            Outcome::Win => increment_wins(&tx, user_id)?,
            Outcome::Loss => increment_losses(&tx, user_id)?,
            Outcome::Draw => increment_draws(&tx, user_id)?,
        }
        let balance = get_tokens(&tx, user_id)?;
        tx.commit()?;

        Ok(balance)
    }

    /* Gets the current leaderboard.
     * Returns up to the requested number of users, richest first.
     */
    pub fn top_users(&self, limit: u32) -> Result<Vec<UserRecord>, CrudError> {
        let conn = self.connection()?;

        Ok(get_top_users(&conn, limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_ledger() -> Ledger {
        Ledger::new(":memory:").unwrap()
    }

    #[test]
    fn test_get_or_create_user_adds_once() {
        let ledger = test_ledger();

        let created = ledger
            .get_or_create_user(10, Some("test_user"), "Test")
            .unwrap();
        assert_eq!(created.tokens, 0);
        assert_eq!(created.last_claim, None);

        // Performs again, nothing should happen
        let fetched = ledger
            .get_or_create_user(10, Some("test_user"), "Test")
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_or_create_user_refreshes_profile() {
        let ledger = test_ledger();

        ledger.get_or_create_user(11, None, "Before").unwrap();
        ledger.grant_claim(11, 500, Utc::now()).unwrap();

        let updated = ledger
            .get_or_create_user(11, Some("new_handle"), "After")
            .unwrap();

        // Profile fields follow Telegram, game fields are untouched.
        assert_eq!(updated.username, Some("new_handle".to_string()));
        assert_eq!(updated.first_name, "After");
        assert_eq!(updated.tokens, 500);
    }

    #[test]
    fn test_grant_claim() {
        let ledger = test_ledger();
        ledger.get_or_create_user(12, None, "Test").unwrap();

        let claimed_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let balance = ledger.grant_claim(12, 500, claimed_at).unwrap();

        assert_eq!(balance, 500);
        let record = ledger.get_or_create_user(12, None, "Test").unwrap();
        assert_eq!(record.tokens, 500);
        assert_eq!(record.last_claim, Some(claimed_at));
    }

    #[test]
    fn test_settle_round_updates_balance_and_counters() {
        let ledger = test_ledger();
        ledger.get_or_create_user(13, None, "Test").unwrap();
        ledger.grant_claim(13, 500, Utc::now()).unwrap();

        assert_eq!(ledger.settle_round(13, 300, Outcome::Win).unwrap(), 800);
        assert_eq!(ledger.settle_round(13, -100, Outcome::Loss).unwrap(), 700);
        assert_eq!(ledger.settle_round(13, 0, Outcome::Draw).unwrap(), 700);

        let record = ledger.get_or_create_user(13, None, "Test").unwrap();
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 1);
        assert_eq!(record.draws, 1);
    }

    #[test]
    fn test_settle_round_clamps_at_zero() {
        let ledger = test_ledger();
        ledger.get_or_create_user(14, None, "Test").unwrap();
        ledger.grant_claim(14, 100, Utc::now()).unwrap();

        let balance = ledger.settle_round(14, -500, Outcome::Loss).unwrap();

        assert_eq!(balance, 0);
    }

    #[test]
    fn test_top_users_orders_and_limits() {
        let ledger = test_ledger();

        for (user_id, tokens) in [(1, 300), (2, 900), (3, 600), (4, 50)] {
            ledger
                .get_or_create_user(user_id, None, "Player")
                .unwrap();
            ledger.grant_claim(user_id, tokens, Utc::now()).unwrap();
        }

        let top = ledger.top_users(3).unwrap();

        assert_eq!(
            top.iter().map(|user| user.user_id).collect::<Vec<i64>>(),
            vec![2, 3, 1]
        );
    }
}
