//! Content records shared by the storage, service and Ajax layers.
//!
//! # Invariants
//! - A stored post is identified by a positive `PostId`; `0` means "unsaved"
//!   or "no id given".
//! - Revisions and autosaves are ordinary posts of type `revision` that point
//!   at their parent.

pub mod post;
pub mod post_type;
