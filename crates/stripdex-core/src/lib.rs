//! Core types and shared utilities for the stripdex services.
//!
//! This crate provides:
//! - Domain models (comics, stats, update status, lifecycle events)
//! - The shared error taxonomy used across service boundaries
//! - Admin token issuance and verification
//! - The best-effort close orchestrator for graceful shutdown
//! - Wire DTOs for the internal service-to-service HTTP surfaces
//! - The words-service client shared by the update and search services

mod closers;
mod error;
mod event;
mod model;
mod words;

pub mod auth;
pub mod config;
pub mod rpc;

pub use closers::{close_all, Closer};
pub use error::{Error, Result};
pub use event::Event;
pub use model::{Comic, DbStats, ServiceStats, UpdateStatus};
pub use words::{Normalizer, WordsClient};

/// Maximum phrase length (in bytes) accepted by the normalizer.
pub const MAX_PHRASE_LEN: usize = 20_000;
