//! Daily reminder scheduling.
//!
//! # Responsibility
//! - Abstract wall-clock reads behind `Clock` so tests can fast-forward time.
//! - Run the reminder job at most once per calendar day, once the configured
//!   local time has passed.
//!
//! # Invariants
//! - Day N's sweep completes before day N+1's sweep can start.
//! - A failing or panicking sweep never terminates the background loop.
//! - Shutdown interrupts the idle wait, never a sweep in progress.

pub mod clock;
pub mod scheduler;
