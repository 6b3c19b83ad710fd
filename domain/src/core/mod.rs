//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: identifiers for trips, participants, items and accounts
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
