//! Domain model for todo records.
//!
//! # Responsibility
//! - Define the canonical `Todo` record and its write payload.
//! - Own field-level validation shared by transport and persistence.
//!
//! # Invariants
//! - Every persisted todo carries a store-assigned `TodoId`.
//! - `name` and `description` are never blank on persisted records.

pub mod todo;
