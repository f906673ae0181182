//! Post save flow with revision snapshots and save hooks.
//!
//! # Invariants
//! - Every stored post, revision and autosave is announced to each hook
//!   exactly once, in registration order.
//! - Hooks see the record as persisted, with its assigned id.

use crate::model::post::{Post, PostId};
use crate::repo::post_repo::{PostRepository, RepoError, RepoResult};
use log::info;

/// Callback run after a post row has been written.
pub trait SavePostHook {
    fn on_save_post(&self, post: &Post) -> RepoResult<()>;
}

/// Post writes that fan out to [`SavePostHook`]s.
pub struct PostService<'a> {
    posts: &'a dyn PostRepository,
    hooks: Vec<&'a dyn SavePostHook>,
}

impl<'a> PostService<'a> {
    pub fn new(posts: &'a dyn PostRepository) -> Self {
        Self {
            posts,
            hooks: Vec::new(),
        }
    }

    pub fn add_save_hook(&mut self, hook: &'a dyn SavePostHook) {
        self.hooks.push(hook);
    }

    /// Inserts `post` and returns it with the assigned id.
    pub fn create_post(&self, post: &Post) -> RepoResult<Post> {
        let stored = self.insert(post)?;
        info!(
            "event=post_create module=service status=ok post_id={} post_type={}",
            stored.id, stored.post_type
        );
        Ok(stored)
    }

    /// Replaces an existing post and records a revision of the new state.
    pub fn update_post(&self, post: &Post) -> RepoResult<()> {
        self.posts.update_post(post)?;
        self.insert(&Post::revision_of(post, false))?;
        self.fire(post)?;
        info!(
            "event=post_update module=service status=ok post_id={}",
            post.id
        );
        Ok(())
    }

    /// Stores an autosave snapshot of `post_id` with the given draft text.
    ///
    /// The post itself is left untouched.
    pub fn autosave(
        &self,
        post_id: PostId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> RepoResult<Post> {
        let parent = self
            .posts
            .get_post(post_id)?
            .ok_or(RepoError::NotFound(post_id))?;

        let mut snapshot = Post::revision_of(&parent, true);
        snapshot.title = title.into();
        snapshot.content = content.into();
        self.insert(&snapshot)
    }

    fn insert(&self, post: &Post) -> RepoResult<Post> {
        let id = self.posts.insert_post(post)?;
        let stored = Post {
            id,
            ..post.clone()
        };
        self.fire(&stored)?;
        Ok(stored)
    }

    fn fire(&self, post: &Post) -> RepoResult<()> {
        for hook in &self.hooks {
            hook.on_save_post(post)?;
        }
        Ok(())
    }
}
