//! Keyword analyzer.
//!
//! # Responsibility
//! - Count case-insensitive occurrences of a keyword across a post's title
//!   and body.
//! - Persist the count as post metadata and read it back.
//!
//! # Invariants
//! - Matching is literal substring matching, not whole-word; markup is
//!   scanned as plain text.
//! - A recount always overwrites; there is no read-modify-write.
//! - A falsy id (`None` or `0`) short-circuits to `0` without store access.

use crate::model::post::{Post, PostId, PRIMARY_POST_TYPE};
use crate::repo::meta_repo::MetaRepository;
use crate::repo::post_repo::{PostRepository, RepoResult};
use crate::service::post_service::SavePostHook;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Meta key the count is stored under.
pub const KEYWORD_COUNT_META_KEY: &str = "_how_many_wordpress";
pub const DEFAULT_KEYWORD: &str = "wordpress";

static DEFAULT_MATCHER: Lazy<KeywordMatcher> =
    Lazy::new(|| KeywordMatcher::new(DEFAULT_KEYWORD).expect("valid default keyword regex"));
static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?[0-9]+").expect("valid leading integer regex"));

/// Case-insensitive literal matcher for one keyword.
///
/// Only ASCII letters fold; non-ASCII characters in the keyword or the text
/// must match exactly.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    /// `None` for an empty keyword, which never matches.
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Result<Self, regex::Error> {
        let pattern = if keyword.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&regex::escape(keyword))
                    .case_insensitive(true)
                    .unicode(false)
                    .build()?,
            )
        };
        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Non-overlapping matches in `text`.
    pub fn count(&self, text: &str) -> u64 {
        self.pattern
            .as_ref()
            .map_or(0, |pattern| pattern.find_iter(text).count() as u64)
    }

    /// Matches across `title` and `body` joined by one space.
    pub fn count_in(&self, title: &str, body: &str) -> u64 {
        self.count(&format!("{title} {body}"))
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        (*DEFAULT_MATCHER).clone()
    }
}

/// Keyword count reader/writer over the record and metadata stores.
pub struct KeywordAnalyzer<'a> {
    posts: &'a dyn PostRepository,
    meta: &'a dyn MetaRepository,
    matcher: KeywordMatcher,
    current_post: Option<PostId>,
}

impl<'a> KeywordAnalyzer<'a> {
    /// Analyzer for [`DEFAULT_KEYWORD`].
    pub fn new(posts: &'a dyn PostRepository, meta: &'a dyn MetaRepository) -> Self {
        Self {
            posts,
            meta,
            matcher: KeywordMatcher::default(),
            current_post: None,
        }
    }

    pub fn with_matcher(mut self, matcher: KeywordMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Post that [`Self::read_keyword_count`] falls back to when called
    /// without an id.
    pub fn with_current_post(mut self, post_id: PostId) -> Self {
        self.current_post = Some(post_id);
        self
    }

    pub fn keyword(&self) -> &str {
        self.matcher.keyword()
    }

    /// Counts keyword occurrences in the stored post and saves the count.
    ///
    /// Returns `0` without touching either store for a falsy id, and `0`
    /// without writing when the post does not exist.
    pub fn count_keyword(&self, post_id: Option<PostId>) -> RepoResult<u64> {
        let Some(post_id) = truthy(post_id) else {
            return Ok(0);
        };
        let Some(post) = self.posts.get_post(post_id)? else {
            debug!("event=keyword_count module=analyzer status=skip reason=not_found post_id={post_id}");
            return Ok(0);
        };
        self.store_count(&post)
    }

    /// Same as [`Self::count_keyword`] for a record already in hand.
    pub fn count_post(&self, post: &Post) -> RepoResult<u64> {
        if truthy(Some(post.id)).is_none() {
            return Ok(0);
        }
        self.store_count(post)
    }

    /// Stored count for `post_id` (or the current post), `0` when absent.
    pub fn read_keyword_count(&self, post_id: Option<PostId>) -> RepoResult<i64> {
        let Some(post_id) = truthy(post_id).or(self.current_post) else {
            return Ok(0);
        };
        let stored = self.meta.get_meta(post_id, KEYWORD_COUNT_META_KEY)?;
        Ok(stored.as_deref().map_or(0, cast_to_int))
    }

    /// Recounts `post_id`. Succeeds whenever the stores do.
    pub fn recalculate(&self, post_id: Option<PostId>) -> RepoResult<bool> {
        self.count_keyword(post_id)?;
        Ok(true)
    }

    /// Removes the stored count; `false` when there was none.
    pub fn clear(&self, post_id: PostId) -> RepoResult<bool> {
        self.meta.delete_meta(post_id, KEYWORD_COUNT_META_KEY)
    }

    /// Whether a non-empty count is stored. A stored `0` counts as present.
    pub fn has_count(&self, post_id: PostId) -> RepoResult<bool> {
        let stored = self.meta.get_meta(post_id, KEYWORD_COUNT_META_KEY)?;
        Ok(stored.is_some_and(|value| !value.is_empty()))
    }

    /// Save-event gate: recounts regular `post` entries only.
    ///
    /// Returns `None` when the save was skipped.
    pub fn handle_post_save(&self, post: &Post) -> RepoResult<Option<u64>> {
        let skip_reason = if post.is_autosave() {
            Some("autosave")
        } else if post.is_revision() {
            Some("revision")
        } else if post.post_type != PRIMARY_POST_TYPE {
            Some("post_type")
        } else {
            None
        };

        if let Some(reason) = skip_reason {
            debug!(
                "event=keyword_count module=analyzer status=skip reason={reason} post_id={}",
                post.id
            );
            return Ok(None);
        }
        self.count_post(post).map(Some)
    }

    fn store_count(&self, post: &Post) -> RepoResult<u64> {
        let count = self.matcher.count_in(&post.title, &post.content);
        self.meta
            .set_meta(post.id, KEYWORD_COUNT_META_KEY, &count.to_string())?;
        info!(
            "event=keyword_count module=analyzer status=ok post_id={} count={count}",
            post.id
        );
        Ok(count)
    }
}

impl SavePostHook for KeywordAnalyzer<'_> {
    fn on_save_post(&self, post: &Post) -> RepoResult<()> {
        self.handle_post_save(post).map(|_| ())
    }
}

fn truthy(post_id: Option<PostId>) -> Option<PostId> {
    post_id.filter(|id| *id != 0)
}

/// Loose integer cast of a stored string: numeric strings truncate toward
/// zero, otherwise the leading integer digits are used, otherwise `0`.
fn cast_to_int(value: &str) -> i64 {
    if let Some(number) = crate::ajax::number::parse_numeric(value) {
        // `as` saturates at the i64 bounds and maps NaN to 0.
        return number as i64;
    }
    LEADING_INT_RE
        .find(value)
        .and_then(|found| found.as_str().trim().parse::<i64>().ok())
        .unwrap_or(0)
}
