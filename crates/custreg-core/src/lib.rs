#![deny(missing_docs)]

//! # custreg-core: Foundational Types for the Customer Registry
//!
//! This crate holds the only piece of deterministic business logic in the
//! registry: turning a human-entered Brazilian taxpayer identifier (CPF) into
//! its canonical digit-only form and checking its two modulo-11 check digits.
//! It has no internal crate dependencies and performs no I/O.
//!
//! ## Design Principles
//!
//! 1. **Total functions.** [`sanitize`] and [`validate`] never fail. Malformed
//!    input is a `false` verdict or a pass-through, not an error.
//!
//! 2. **Newtype at the boundary.** Handlers that need a CPF they can store or
//!    query by go through [`Cpf::parse`], which sanitizes, validates, and keeps
//!    only the canonical 11-digit form.
//!
//! 3. **No degenerate-sequence policy.** Repeated-digit values such as
//!    `"11111111111"` satisfy the official checksum and are accepted.

pub mod cpf;
pub mod error;

pub use cpf::{make_check_digit, sanitize, sanitize_opt, sum_digits, validate, Cpf, CPF_LEN};
pub use error::ValidationError;
