//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into edit/import/listing use-cases.
//! - Keep the CLI decoupled from storage details.

pub mod birthday_service;
