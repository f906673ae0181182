//! Ajax request routing.
//!
//! # Responsibility
//! - Map action names to handlers for logged-in and anonymous callers.
//! - Mirror registrations into the [`HookRegistry`] under
//!   `wp_ajax_<action>` / `wp_ajax_nopriv_<action>`.
//!
//! # Invariants
//! - Handlers never fail with a Rust error; every outcome is an
//!   [`AjaxResponse`].
//! - Handlers receive collaborators through [`AjaxContext`] only.

pub mod calculate;
pub mod number;
pub mod post_count;
pub mod response;

use crate::hooks::{HookRegistry, DEFAULT_PRIORITY};
use crate::model::post_type::PostTypeRegistry;
use crate::repo::post_repo::PostRepository;
use crate::sanitize::sanitize_text_field;
use crate::security::{NonceManager, TokenVerifier, AJAX_NONCE_ACTION};
use log::warn;
use self::response::AjaxResponse;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const CALCULATE_ACTION: &str = "plugin_lab_calculate";
pub const POST_COUNT_ACTION: &str = "plugin_lab_get_post_count";

const PRIVATE_HOOK_PREFIX: &str = "wp_ajax_";
const PUBLIC_HOOK_PREFIX: &str = "wp_ajax_nopriv_";

/// Raw request parameters (form fields).
pub type AjaxParams = BTreeMap<String, String>;

/// Handler signature shared by all actions.
pub type AjaxHandler = fn(&AjaxContext<'_>, &AjaxParams) -> AjaxResponse;

/// Collaborators available to handlers.
pub struct AjaxContext<'a> {
    pub verifier: &'a dyn TokenVerifier,
    pub posts: &'a dyn PostRepository,
    pub post_types: &'a PostTypeRegistry,
}

/// One incoming Ajax call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AjaxRequest {
    pub action: String,
    pub logged_in: bool,
    pub params: AjaxParams,
}

impl AjaxRequest {
    pub fn new(action: impl Into<String>, logged_in: bool) -> Self {
        Self {
            action: action.into(),
            logged_in,
            params: AjaxParams::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No handler for this action and login state.
    UnknownAction(String),
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAction(action) => write!(f, "no ajax handler for action `{action}`"),
        }
    }
}

impl Error for DispatchError {}

/// Action table split by caller login state.
#[derive(Debug, Default)]
pub struct AjaxRouter {
    private: HashMap<String, AjaxHandler>,
    public: HashMap<String, AjaxHandler>,
}

impl AjaxRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the calculator and post-count actions open to everyone.
    pub fn with_default_actions(hooks: &mut HookRegistry) -> Self {
        let mut router = Self::new();
        router.register(
            hooks,
            CALCULATE_ACTION,
            "calculate_action",
            calculate::calculate_action,
            true,
        );
        router.register(
            hooks,
            POST_COUNT_ACTION,
            "post_count_action",
            post_count::post_count_action,
            true,
        );
        router
    }

    /// Registers `handler` for logged-in callers, and for anonymous callers
    /// too when `allow_anonymous` is set.
    pub fn register(
        &mut self,
        hooks: &mut HookRegistry,
        action: &str,
        handler_name: &str,
        handler: AjaxHandler,
        allow_anonymous: bool,
    ) {
        self.private.insert(action.to_string(), handler);
        hooks.add_action(
            &format!("{PRIVATE_HOOK_PREFIX}{action}"),
            handler_name,
            DEFAULT_PRIORITY,
        );

        if allow_anonymous {
            self.public.insert(action.to_string(), handler);
            hooks.add_action(
                &format!("{PUBLIC_HOOK_PREFIX}{action}"),
                handler_name,
                DEFAULT_PRIORITY,
            );
        }
    }

    pub fn dispatch(
        &self,
        ctx: &AjaxContext<'_>,
        request: &AjaxRequest,
    ) -> Result<AjaxResponse, DispatchError> {
        let table = if request.logged_in {
            &self.private
        } else {
            &self.public
        };
        let Some(handler) = table.get(&request.action) else {
            warn!(
                "event=ajax_dispatch module=ajax status=error error_code=unknown_action logged_in={}",
                request.logged_in
            );
            return Err(DispatchError::UnknownAction(request.action.clone()));
        };
        Ok(handler(ctx, &request.params))
    }
}

/// Whether `action` has a logged-in handler (and an anonymous one, when
/// `include_nopriv` is set).
pub fn is_ajax_handler_registered(hooks: &HookRegistry, action: &str, include_nopriv: bool) -> bool {
    let private = hooks.has_hook(&format!("{PRIVATE_HOOK_PREFIX}{action}"), None);
    if !include_nopriv {
        return private;
    }
    private && hooks.has_hook(&format!("{PUBLIC_HOOK_PREFIX}{action}"), None)
}

/// Values a browser client needs to call the endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AjaxClientConfig {
    pub ajax_url: String,
    pub nonce: String,
}

impl AjaxClientConfig {
    /// Builds the endpoint URL under `admin_url` and issues a fresh nonce.
    pub fn new(admin_url: &str, nonces: &NonceManager) -> Self {
        Self {
            ajax_url: format!("{}/admin-ajax.php", admin_url.trim_end_matches('/')),
            nonce: nonces.create(AJAX_NONCE_ACTION),
        }
    }
}

/// Sanitized text parameter; missing keys read as `""`.
pub(crate) fn param(params: &AjaxParams, key: &str) -> String {
    params
        .get(key)
        .map(|value| sanitize_text_field(value))
        .unwrap_or_default()
}
