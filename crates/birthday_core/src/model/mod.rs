//! Domain model for birthday records and reminder rules.
//!
//! # Responsibility
//! - Define canonical data structures used by core reminder logic.
//! - Validate external input at the boundary where it enters the core.
//!
//! # Invariants
//! - Every record is identified by its unique, non-empty `name`.
//! - The origin date is always stored in civil `YYYY-MM-DD` form, even for
//!   lunar recurrence.
//! - The core never mutates a record; derived values live only per sweep.

pub mod record;
pub mod rules;
