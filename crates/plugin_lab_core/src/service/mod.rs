//! Use-case services over the record and metadata stores.
//!
//! # Responsibility
//! - Save posts and notify save hooks.
//! - Count keyword occurrences and keep the stored count current.
//!
//! # Invariants
//! - Services depend on repository traits only, never on SQL.

pub mod keyword_service;
pub mod post_service;
