//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Every failing operation is rolled back before one of these reaches the caller.

use std::fmt;

/// The kind of entity a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Borrower,
    Staff,
    Copy,
    Department,
    Book,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Missing::Borrower => "borrower",
            Missing::Staff => "staff",
            Missing::Copy => "copy",
            Missing::Department => "department",
            Missing::Book => "book",
        };
        f.write_str(name)
    }
}

/// A lending transition refused because the copy is in the wrong state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// Issue attempted on a copy that is not AVAILABLE.
    CopyUnavailable { copy_id: i32, status: String },
    /// Return attempted on a copy with no outstanding ledger entry.
    NotOnLoan { copy_id: i32 },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::CopyUnavailable { copy_id, status } => {
                write!(f, "copy unavailable: copy {} is {}", copy_id, status)
            }
            Conflict::NotOnLoan { copy_id } => write!(f, "not on loan: copy {}", copy_id),
        }
    }
}

#[derive(Debug)]
pub enum DomainError {
    /// Malformed input shape
    Validation(String),
    /// Referenced entity absent
    NotFound(Missing),
    /// Entity exists but cannot make the requested transition
    Conflict(Conflict),
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::NotFound(what) => write!(f, "Not found: {}", what),
            DomainError::Conflict(conflict) => write!(f, "Conflict: {}", conflict),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            DomainError::NotFound(Missing::Staff).to_string(),
            "Not found: staff"
        );
        let err = DomainError::Conflict(Conflict::CopyUnavailable {
            copy_id: 22,
            status: "LOST".to_string(),
        });
        assert_eq!(err.to_string(), "Conflict: copy unavailable: copy 22 is LOST");
    }
}
