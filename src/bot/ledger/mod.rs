// Exported functions
pub use self::connect::database_path;

// Exported structs and types
pub use self::manager::{CrudError, Ledger};
pub use self::user::UserRecord;

// Declare submodules
mod connect;
mod manager;
mod user;
