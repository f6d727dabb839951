use sqlx::error::ErrorKind;
use thiserror::Error;

pub use sqlx::Error as SqlxError;

/// Errors raised by the persistence layer.
#[derive(Error, Debug)]
pub enum DbError {
    /// The store rejected a write because of a unique or foreign-key constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("migration '{module}/{id}' failed: {source}")]
    Migration {
        module: String,
        id: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation
            ) {
                return DbError::Constraint(db_err.message().to_string());
            }
        }
        DbError::Sqlx(err)
    }
}
