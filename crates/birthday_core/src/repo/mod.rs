//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define record data access contracts for the editor and the sweep.
//! - Isolate SQLite query details from service/reminder orchestration.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Sweep snapshots exclude invalid persisted rows instead of failing.

pub mod birthday_repo;
pub mod record_source;
