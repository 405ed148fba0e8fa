pub mod cart_repo;
pub mod catalog_repo;
pub mod ledger;
pub mod models;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod test_support;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            // CHECK constraints guard the stock invariants; tripping one means
            // the data is already inconsistent.
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                DomainError::IntegrityFault(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
