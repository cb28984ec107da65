use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const USER_COLUMNS: &str =
    "user_id, username, first_name, tokens, wins, losses, draws, last_claim";

// UserRecord contains all columns stored for a single player.
#[derive(Debug, PartialEq, Clone)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub tokens: i64,
    pub wins: i64,
    pub losses: i64,
    pub draws: i64,
    pub last_claim: Option<DateTime<Utc>>,
}

fn row_to_user(row: &Row) -> Result<UserRecord, rusqlite::Error> {
    Ok(UserRecord {
        user_id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        tokens: row.get(3)?,
        wins: row.get(4)?,
        losses: row.get(5)?,
        draws: row.get(6)?,
        last_claim: row.get(7)?,
    })
}

// Checks if a user row exists
pub fn get_user_exists(conn: &Connection, user_id: i64) -> Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

// Adds a new user row with a zero balance and no claim history
pub fn insert_user(
    conn: &Connection,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO users (user_id, username, first_name) VALUES (?1, ?2, ?3)",
        params![user_id, username, first_name],
    )?;

    Ok(())
}

// Gets a full user row
pub fn get_user_row(conn: &Connection, user_id: i64) -> Result<UserRecord, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
        params![user_id],
        row_to_user,
    )
}

// Overwrites the Telegram profile fields of a user row
pub fn update_user_profile(
    conn: &Connection,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET username = ?2, first_name = ?3 WHERE user_id = ?1",
        params![user_id, username, first_name],
    )?;

    Ok(())
}

// Applies a signed token change, clamping the balance at zero
pub fn add_tokens_clamped(
    conn: &Connection,
    user_id: i64,
    delta: i64,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET tokens = MAX(tokens + ?2, 0) WHERE user_id = ?1",
        params![user_id, delta],
    )?;

    Ok(())
}

// Gets the current token balance of a user row
pub fn get_tokens(conn: &Connection, user_id: i64) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        "SELECT tokens FROM users WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
}

// Records the time of the latest successful claim
pub fn set_last_claim(
    conn: &Connection,
    user_id: i64,
    claimed_at: DateTime<Utc>,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET last_claim = ?2 WHERE user_id = ?1",
        params![user_id, claimed_at],
    )?;

    Ok(())
}

// Bumps the win counter of a user row
pub fn increment_wins(conn: &Connection, user_id: i64) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET wins = wins + 1 WHERE user_id = ?1",
        params![user_id],
    )?;

    Ok(())
}

// Bumps the loss counter of a user row
pub fn increment_losses(conn: &Connection, user_id: i64) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET losses = losses + 1 WHERE user_id = ?1",
        params![user_id],
    )?;

    Ok(())
}

// Bumps the draw counter of a user row
pub fn increment_draws(conn: &Connection, user_id: i64) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET draws = draws + 1 WHERE user_id = ?1",
        params![user_id],
    )?;

    Ok(())
}

// Gets the richest user rows, highest balance first
pub fn get_top_users(conn: &Connection, limit: u32) -> Result<Vec<UserRecord>, rusqlite::Error> {
    let mut statement = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY tokens DESC LIMIT ?1"
    ))?;

    let rows = statement.query_map(params![limit], row_to_user)?;
    rows.collect()
}

// Tests
#[cfg(test)]
mod tests {
    use super::super::connect::open_database;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_insert_get_user() {
        let conn = open_database(":memory:").unwrap();

        insert_user(&conn, 100, Some("test_user"), "Test").unwrap();

        assert_eq!(
            get_user_row(&conn, 100).unwrap(),
            UserRecord {
                user_id: 100,
                username: Some("test_user".to_string()),
                first_name: "Test".to_string(),
                tokens: 0,
                wins: 0,
                losses: 0,
                draws: 0,
                last_claim: None,
            }
        );
    }

    #[test]
    fn test_insert_user_without_username() {
        let conn = open_database(":memory:").unwrap();

        insert_user(&conn, 101, None, "Anon").unwrap();

        let record = get_user_row(&conn, 101).unwrap();
        assert_eq!(record.username, None);
        assert_eq!(record.first_name, "Anon");
    }

    #[test]
    fn test_get_user_exists() {
        let conn = open_database(":memory:").unwrap();

        assert!(!get_user_exists(&conn, 102).unwrap());
        insert_user(&conn, 102, None, "Test").unwrap();
        assert!(get_user_exists(&conn, 102).unwrap());
    }

    #[test]
    fn test_update_user_profile() {
        let conn = open_database(":memory:").unwrap();

        insert_user(&conn, 103, None, "Old").unwrap();
        update_user_profile(&conn, 103, Some("fresh_handle"), "New").unwrap();

        let record = get_user_row(&conn, 103).unwrap();
        assert_eq!(record.username, Some("fresh_handle".to_string()));
        assert_eq!(record.first_name, "New");
    }

    #[test]
    fn test_add_tokens_clamped() {
        let conn = open_database(":memory:").unwrap();
        insert_user(&conn, 104, None, "Test").unwrap();

        add_tokens_clamped(&conn, 104, 500).unwrap();
        assert_eq!(get_tokens(&conn, 104).unwrap(), 500);

        add_tokens_clamped(&conn, 104, -200).unwrap();
        assert_eq!(get_tokens(&conn, 104).unwrap(), 300);

        // A debit past zero leaves the balance at zero.
        add_tokens_clamped(&conn, 104, -1000).unwrap();
        assert_eq!(get_tokens(&conn, 104).unwrap(), 0);
    }

    #[test]
    fn test_set_last_claim() {
        let conn = open_database(":memory:").unwrap();
        insert_user(&conn, 105, None, "Test").unwrap();

        let claimed_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        set_last_claim(&conn, 105, claimed_at).unwrap();

        assert_eq!(get_user_row(&conn, 105).unwrap().last_claim, Some(claimed_at));
    }

    #[test]
    fn test_increment_result_counters() {
        let conn = open_database(":memory:").unwrap();
        insert_user(&conn, 106, None, "Test").unwrap();

        increment_wins(&conn, 106).unwrap();
        increment_wins(&conn, 106).unwrap();
        increment_losses(&conn, 106).unwrap();
        increment_draws(&conn, 106).unwrap();

        let record = get_user_row(&conn, 106).unwrap();
        assert_eq!(record.wins, 2);
        assert_eq!(record.losses, 1);
        assert_eq!(record.draws, 1);
    }

    #[test]
    fn test_get_top_users() {
        let conn = open_database(":memory:").unwrap();

        insert_user(&conn, 1, Some("first"), "First").unwrap();
        insert_user(&conn, 2, Some("second"), "Second").unwrap();
        insert_user(&conn, 3, Some("third"), "Third").unwrap();
        add_tokens_clamped(&conn, 1, 300).unwrap();
        add_tokens_clamped(&conn, 2, 900).unwrap();
        add_tokens_clamped(&conn, 3, 600).unwrap();

        let top = get_top_users(&conn, 2).unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, 2);
        assert_eq!(top[1].user_id, 3);
    }
}
