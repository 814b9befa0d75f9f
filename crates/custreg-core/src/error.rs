//! # Error Types
//!
//! Validation errors for the domain newtypes, built with `thiserror`.
//! The free functions in [`crate::cpf`] are total and never produce these;
//! only the typed constructors do.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Carries the rejected input so operators can see exactly what the client
/// sent without re-deriving it from logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// CPF is not 11 digits after removing `.` and `-`, or its check digits
    /// do not match.
    #[error("invalid CPF: \"{0}\" (expected 11 digits with valid check digits, optionally as XXX.XXX.XXX-XX)")]
    InvalidCpf(String),
}
