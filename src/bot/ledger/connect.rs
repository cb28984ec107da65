use rusqlite::Connection;
use std::env;

const DATABASE_PATH_DEFAULT: &str = "tokenjack.db";

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    username TEXT,
    first_name TEXT NOT NULL,
    tokens INTEGER NOT NULL DEFAULT 0,
    wins INTEGER NOT NULL DEFAULT 0,
    losses INTEGER NOT NULL DEFAULT 0,
    draws INTEGER NOT NULL DEFAULT 0,
    last_claim TEXT
)";

// Databases written before the result counters existed lack these columns.
const RESULT_COLUMN_MIGRATIONS: [&str; 3] = [
    "ALTER TABLE users ADD COLUMN wins INTEGER NOT NULL DEFAULT 0",
    "ALTER TABLE users ADD COLUMN losses INTEGER NOT NULL DEFAULT 0",
    "ALTER TABLE users ADD COLUMN draws INTEGER NOT NULL DEFAULT 0",
];

// Resolves the database file location, preferring the environment.
pub fn database_path() -> String {
    env::var("DATABASE_PATH").unwrap_or_else(|_| DATABASE_PATH_DEFAULT.to_string())
}

// Opens the SQLite database at the given path and prepares the schema.
pub fn open_database(path: &str) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    init_tables(&conn)?;
    Ok(conn)
}

/* Creates the users table if missing and migrates older databases.
 * Rerunning on a prepared database is a no-op.
 */
pub fn init_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(CREATE_USERS_TABLE, [])?;

    for migration in RESULT_COLUMN_MIGRATIONS {
        add_column_if_missing(conn, migration)?;
    }

    Ok(())
}

// Applies an ALTER TABLE ADD COLUMN, treating an existing column as success.
fn add_column_if_missing(conn: &Connection, ddl: &str) -> Result<(), rusqlite::Error> {
    match conn.execute(ddl, []) {
        Ok(_) => Ok(()),
        Err(err) if is_duplicate_column(&err) => Ok(()),
        Err(err) => Err(err),
    }
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.contains("duplicate column name")
        }
        _ => false,
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_database_creates_users_table() {
        let conn = open_database(":memory:").unwrap();

        conn.execute(
            "INSERT INTO users (user_id, first_name) VALUES (1, 'Tester')",
            [],
        )
        .unwrap();

        let tokens: i64 = conn
            .query_row("SELECT tokens FROM users WHERE user_id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tokens, 0);
    }

    #[test]
    fn test_init_tables_is_idempotent() {
        let conn = open_database(":memory:").unwrap();
        assert!(init_tables(&conn).is_ok());
        assert!(init_tables(&conn).is_ok());
    }

    #[test]
    fn test_init_tables_migrates_legacy_table() {
        let conn = Connection::open_in_memory().unwrap();

        // Schema from before the result counters were tracked.
        conn.execute(
            "CREATE TABLE users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT NOT NULL,
                tokens INTEGER NOT NULL DEFAULT 0,
                last_claim TEXT
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO users (user_id, username, first_name, tokens)
             VALUES (7, 'veteran', 'Vera', 1500)",
            [],
        )
        .unwrap();

        init_tables(&conn).unwrap();

        let (tokens, wins, losses, draws): (i64, i64, i64, i64) = conn
            .query_row(
                "SELECT tokens, wins, losses, draws FROM users WHERE user_id = 7",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();

        // Existing data is preserved and new counters start at zero.
        assert_eq!(tokens, 1500);
        assert_eq!(wins, 0);
        assert_eq!(losses, 0);
        assert_eq!(draws, 0);
    }
}
