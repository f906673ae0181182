//! Request token issuing and verification.
//!
//! Handlers only see the [`TokenVerifier`] trait; the time-bucketed nonce
//! scheme lives in [`nonce`].

pub mod nonce;

pub use nonce::{ActionNonce, NonceAge, NonceManager};

/// Action name the Ajax endpoints bind their nonces to.
pub const AJAX_NONCE_ACTION: &str = "plugin_lab_ajax_nonce";

/// Verifies an opaque caller-supplied token.
pub trait TokenVerifier {
    fn verify(&self, token: &str) -> bool;
}

impl<F> TokenVerifier for F
where
    F: Fn(&str) -> bool,
{
    fn verify(&self, token: &str) -> bool {
        self(token)
    }
}
