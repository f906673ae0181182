//! Post record model.
//!
//! # Responsibility
//! - Define the content record read by the keyword analyzer.
//! - Classify revisions and autosaves for the save-hook gate.
//!
//! # Invariants
//! - `post_type` is never blank.
//! - A `revision` always has a parent; only revisions use `inherit` status.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-owned record identity. `0` is treated as "no id".
pub type PostId = i64;

/// Post type of regular blog entries; the only type the analyzer scans.
pub const PRIMARY_POST_TYPE: &str = "post";
/// Post type used for revision and autosave snapshots.
pub const REVISION_POST_TYPE: &str = "revision";

const AUTOSAVE_NAME_MARKER: &str = "-autosave-";

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Publish,
    Draft,
    Private,
    Pending,
    Trash,
    /// Revisions inherit status from their parent.
    Inherit,
}

impl PostStatus {
    /// Stable storage string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Private => "private",
            Self::Pending => "pending",
            Self::Trash => "trash",
            Self::Inherit => "inherit",
        }
    }

    /// Parses a storage string; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "publish" => Some(Self::Publish),
            "draft" => Some(Self::Draft),
            "private" => Some(Self::Private),
            "pending" => Some(Self::Pending),
            "trash" => Some(Self::Trash),
            "inherit" => Some(Self::Inherit),
            _ => None,
        }
    }
}

/// Content record with a title and a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Assigned by the record store on insert; `0` before that.
    pub id: PostId,
    pub post_type: String,
    pub status: PostStatus,
    /// Slug. Autosaves use `<parent>-autosave-v1`.
    pub name: String,
    pub parent: Option<PostId>,
    pub title: String,
    /// Raw body, markup included.
    pub content: String,
}

impl Post {
    /// Creates an unsaved draft of `post_type`.
    pub fn new(
        post_type: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            post_type: post_type.into(),
            status: PostStatus::Draft,
            name: String::new(),
            parent: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Shortcut for an unsaved blog entry (`post` type).
    pub fn entry(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(PRIMARY_POST_TYPE, title, content)
    }

    /// Builds an unsaved revision snapshot of `parent`.
    ///
    /// With `autosave = true` the slug carries the autosave marker.
    pub fn revision_of(parent: &Post, autosave: bool) -> Self {
        let name = if autosave {
            format!("{}{AUTOSAVE_NAME_MARKER}v1", parent.id)
        } else {
            format!("{}-revision-v1", parent.id)
        };
        Self {
            id: 0,
            post_type: REVISION_POST_TYPE.to_string(),
            status: PostStatus::Inherit,
            name,
            parent: Some(parent.id),
            title: parent.title.clone(),
            content: parent.content.clone(),
        }
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_revision(&self) -> bool {
        self.post_type == REVISION_POST_TYPE
    }

    pub fn is_autosave(&self) -> bool {
        self.is_revision() && self.name.contains(AUTOSAVE_NAME_MARKER)
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), PostValidationError> {
        if self.post_type.trim().is_empty() {
            return Err(PostValidationError::BlankPostType);
        }
        if self.is_revision() && self.parent.is_none() {
            return Err(PostValidationError::RevisionWithoutParent);
        }
        if !self.is_revision() && self.status == PostStatus::Inherit {
            return Err(PostValidationError::InheritOutsideRevision);
        }
        Ok(())
    }
}

/// Violations reported by [`Post::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostValidationError {
    BlankPostType,
    RevisionWithoutParent,
    InheritOutsideRevision,
}

impl Display for PostValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankPostType => write!(f, "post_type must not be blank"),
            Self::RevisionWithoutParent => write!(f, "revision must reference a parent post"),
            Self::InheritOutsideRevision => {
                write!(f, "status `inherit` is reserved for revisions")
            }
        }
    }
}

impl Error for PostValidationError {}
