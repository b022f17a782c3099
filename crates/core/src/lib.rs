//! Shared building blocks for the walk-in order checker.
//!
//! This crate contains **pure** primitives (no I/O): the error model used at
//! domain boundaries and strongly-typed identifiers.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::ReportId;
