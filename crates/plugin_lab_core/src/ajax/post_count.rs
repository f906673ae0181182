//! Post-count request handler.

use crate::ajax::response::AjaxResponse;
use crate::ajax::{param, AjaxContext, AjaxParams};
use crate::model::post::PRIMARY_POST_TYPE;
use log::{error, info, warn};
use serde::Serialize;

/// Published/draft/private totals for one post type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCountSummary {
    pub post_type: String,
    pub published: u64,
    pub draft: u64,
    pub private: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostCountFailure {
    InvalidToken,
    InvalidPostType,
    /// Record store failed; detail stays in the log.
    Storage,
}

impl PostCountFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidToken => "Security check failed.",
            Self::InvalidPostType => "Invalid post type specified.",
            Self::Storage => "Could not load post counts.",
        }
    }
}

/// Token check, then post type existence, then counting.
///
/// `post_type` defaults to `post` when absent.
pub fn count_posts(
    ctx: &AjaxContext<'_>,
    token: &str,
    post_type: Option<&str>,
) -> Result<PostCountSummary, PostCountFailure> {
    if !ctx.verifier.verify(token) {
        warn!("event=ajax_post_count module=ajax status=error error_code=invalid_token");
        return Err(PostCountFailure::InvalidToken);
    }

    let post_type = post_type.unwrap_or(PRIMARY_POST_TYPE);
    if !ctx.post_types.exists(post_type) {
        warn!("event=ajax_post_count module=ajax status=error error_code=invalid_post_type");
        return Err(PostCountFailure::InvalidPostType);
    }

    let counts = ctx.posts.count_posts(post_type).map_err(|err| {
        error!("event=ajax_post_count module=ajax status=error error_code=storage error={err}");
        PostCountFailure::Storage
    })?;

    info!("event=ajax_post_count module=ajax status=ok post_type={post_type}");
    Ok(PostCountSummary {
        post_type: post_type.to_string(),
        published: counts.publish,
        draft: counts.draft,
        private: counts.private,
        total: counts.total(),
    })
}

/// Ajax entry point for the post-count action.
pub fn post_count_action(ctx: &AjaxContext<'_>, params: &AjaxParams) -> AjaxResponse {
    let token = params.get("nonce").map(String::as_str).unwrap_or_default();
    let post_type = params.contains_key("post_type").then(|| param(params, "post_type"));

    match count_posts(ctx, token, post_type.as_deref()) {
        Ok(summary) => AjaxResponse::success(summary),
        Err(failure) => AjaxResponse::error(failure.message()),
    }
}
