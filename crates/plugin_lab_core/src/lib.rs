//! Core of the plugin lab: an arithmetic Ajax endpoint, a post keyword
//! analyzer and the small host pieces they run on (hooks, nonces, post
//! storage).
//!
//! Everything the handlers need from the host is passed in through traits
//! (`TokenVerifier`, `PostRepository`, `MetaRepository`); there is no
//! process-global registry apart from logging.

pub mod ajax;
pub mod config;
pub mod db;
pub mod hooks;
pub mod lessons;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sanitize;
pub mod security;
pub mod service;

pub use ajax::calculate::{
    handle as handle_calculation, Calculation, CalculationFailure, CalculationRequest,
    CalculationResult, Operation,
};
pub use ajax::post_count::{PostCountFailure, PostCountSummary};
pub use ajax::response::{validate_ajax_response, AjaxResponse};
pub use ajax::{
    is_ajax_handler_registered, AjaxClientConfig, AjaxContext, AjaxParams, AjaxRequest,
    AjaxRouter, DispatchError, CALCULATE_ACTION, POST_COUNT_ACTION,
};
pub use config::{AppConfig, ConfigError};
pub use hooks::site_name::SiteInfo;
pub use hooks::HookRegistry;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::post::{Post, PostId, PostStatus, PostValidationError};
pub use model::post_type::PostTypeRegistry;
pub use repo::meta_repo::{MetaRepository, SqliteMetaRepository};
pub use repo::post_repo::{
    PostRepository, PostStatusCounts, RepoError, RepoResult, SqlitePostRepository,
};
pub use security::{NonceManager, TokenVerifier, AJAX_NONCE_ACTION};
pub use service::keyword_service::{KeywordAnalyzer, KeywordMatcher, KEYWORD_COUNT_META_KEY};
pub use service::post_service::{PostService, SavePostHook};

/// Health-check probe.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
