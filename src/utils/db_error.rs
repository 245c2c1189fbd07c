//! Classification of database errors on the insert path.
//!
//! The existence check and the insert are separate operations, so a second
//! writer can win the same code in between. The unique constraint is the
//! source of truth; a losing insert must surface as a taken alias, not as a
//! generic server error.

use crate::error::AppError;

/// True when the error is a unique violation on the short-code constraint.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some("links_code_key"))
}

/// Maps an insert failure to the error the caller can act on.
pub fn map_insert_error(e: sqlx::Error, code: &str) -> AppError {
    if is_unique_violation_on_code(&e) {
        AppError::AliasTaken {
            alias: code.to_string(),
        }
    } else {
        AppError::Internal(anyhow::Error::new(e))
    }
}
