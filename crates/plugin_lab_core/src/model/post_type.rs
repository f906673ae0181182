//! Registry of known post types.
//!
//! Backs the "does this post type exist" check of the post-count endpoint.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BUILTIN_POST_TYPES: &[&str] = &["post", "page", "attachment", "revision", "nav_menu_item"];
const MAX_POST_TYPE_LEN: usize = 20;

static POST_TYPE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid post type key regex"));

/// Set of registered post type keys.
#[derive(Debug, Clone)]
pub struct PostTypeRegistry {
    types: BTreeSet<String>,
}

impl Default for PostTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl PostTypeRegistry {
    /// Registry pre-filled with the built-in types.
    pub fn with_builtins() -> Self {
        Self {
            types: BUILTIN_POST_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Registers a custom post type key.
    pub fn register(&mut self, key: &str) -> Result<(), PostTypeError> {
        if key.trim().is_empty() {
            return Err(PostTypeError::Empty);
        }
        if key.len() > MAX_POST_TYPE_LEN {
            return Err(PostTypeError::TooLong(key.to_string()));
        }
        if !POST_TYPE_KEY_RE.is_match(key) {
            return Err(PostTypeError::InvalidKey(key.to_string()));
        }
        if !self.types.insert(key.to_string()) {
            return Err(PostTypeError::Duplicate(key.to_string()));
        }
        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.types.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}

/// Post type registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostTypeError {
    Empty,
    TooLong(String),
    InvalidKey(String),
    Duplicate(String),
}

impl Display for PostTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "post type key must not be empty"),
            Self::TooLong(key) => write!(
                f,
                "post type key `{key}` exceeds {MAX_POST_TYPE_LEN} characters"
            ),
            Self::InvalidKey(key) => write!(
                f,
                "post type key `{key}` may only contain lowercase letters, digits, `_` and `-`"
            ),
            Self::Duplicate(key) => write!(f, "post type `{key}` is already registered"),
        }
    }
}

impl Error for PostTypeError {}

#[cfg(test)]
mod tests {
    use super::{PostTypeError, PostTypeRegistry};

    #[test]
    fn builtins_are_known() {
        let registry = PostTypeRegistry::default();
        assert!(registry.exists("post"));
        assert!(registry.exists("page"));
        assert!(!registry.exists("product"));
    }

    #[test]
    fn register_accepts_custom_type_once() {
        let mut registry = PostTypeRegistry::default();
        registry.register("product").expect("first registration");
        assert!(registry.exists("product"));
        assert_eq!(
            registry.register("product"),
            Err(PostTypeError::Duplicate("product".to_string()))
        );
    }

    #[test]
    fn register_rejects_malformed_keys() {
        let mut registry = PostTypeRegistry::default();
        assert_eq!(registry.register(" "), Err(PostTypeError::Empty));
        assert!(matches!(
            registry.register("Product"),
            Err(PostTypeError::InvalidKey(_))
        ));
        assert!(matches!(
            registry.register("a_really_long_post_type_key"),
            Err(PostTypeError::TooLong(_))
        ));
    }
}
