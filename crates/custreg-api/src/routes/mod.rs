//! # API Route Modules
//!
//! - `customers`: customer list, detail (by id, by CPF, by request body),
//!   and creation under `/v1/customers`.

pub mod customers;
