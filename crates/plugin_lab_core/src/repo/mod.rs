//! Record store and metadata store contracts with SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Give the analyzer and Ajax handlers narrow, object-safe traits they can
//!   be tested against.
//!
//! # Invariants
//! - Post writes run `Post::validate()` before touching SQL.
//! - Reads reject invalid persisted state instead of masking it.

pub mod meta_repo;
pub mod post_repo;
