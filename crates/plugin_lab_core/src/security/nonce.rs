//! Time-bucketed action nonces.
//!
//! # Invariants
//! - A nonce is valid for the tick it was issued in and the tick after it,
//!   so its lifetime is between `lifetime / 2` and `lifetime`.
//! - Nonces are bound to the secret, the action and the session.
//! - The empty string never verifies.

use crate::security::TokenVerifier;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const NONCE_LEN: usize = 10;
/// Offset from the end of the hex digest where the nonce window ends.
const NONCE_TAIL_SKIP: usize = 2;

/// Outcome of a nonce check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    /// Issued during the current tick.
    Fresh,
    /// Issued during the previous tick.
    Aging,
    Invalid,
}

impl NonceAge {
    pub fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

/// Issues and checks nonces for one secret and session.
#[derive(Debug, Clone)]
pub struct NonceManager {
    secret: String,
    lifetime: Duration,
    session: String,
}

impl NonceManager {
    /// `lifetime` below two seconds is raised to two so ticks stay non-zero.
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            lifetime: lifetime.max(Duration::from_secs(2)),
            session: String::new(),
        }
    }

    /// Binds issued nonces to a user session token.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    pub fn create(&self, action: &str) -> String {
        self.create_at(action, unix_now())
    }

    pub fn verify(&self, nonce: &str, action: &str) -> NonceAge {
        self.verify_at(nonce, action, unix_now())
    }

    /// Issues the nonce for `action` as of `now_secs`.
    pub fn create_at(&self, action: &str, now_secs: u64) -> String {
        self.nonce_for_tick(self.tick(now_secs), action)
    }

    /// Checks `nonce` for `action` as of `now_secs`.
    pub fn verify_at(&self, nonce: &str, action: &str, now_secs: u64) -> NonceAge {
        if nonce.is_empty() {
            return NonceAge::Invalid;
        }

        let tick = self.tick(now_secs);
        if constant_time_eq(&self.nonce_for_tick(tick, action), nonce) {
            return NonceAge::Fresh;
        }
        if tick > 0 && constant_time_eq(&self.nonce_for_tick(tick - 1, action), nonce) {
            return NonceAge::Aging;
        }
        NonceAge::Invalid
    }

    /// Returns a verifier bound to `action`.
    pub fn for_action(&self, action: impl Into<String>) -> ActionNonce<'_> {
        ActionNonce {
            manager: self,
            action: action.into(),
        }
    }

    fn tick(&self, now_secs: u64) -> u64 {
        let half_life = (self.lifetime.as_secs() / 2).max(1);
        now_secs.div_ceil(half_life)
    }

    fn nonce_for_tick(&self, tick: u64, action: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(format!("|{tick}|{action}|{}", self.session).as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        let end = digest.len() - NONCE_TAIL_SKIP;
        digest[end - NONCE_LEN..end].to_string()
    }
}

/// A [`NonceManager`] bound to one action, usable as a [`TokenVerifier`].
#[derive(Debug, Clone)]
pub struct ActionNonce<'a> {
    manager: &'a NonceManager,
    action: String,
}

impl ActionNonce<'_> {
    pub fn issue(&self) -> String {
        self.manager.create(&self.action)
    }
}

impl TokenVerifier for ActionNonce<'_> {
    fn verify(&self, token: &str) -> bool {
        self.manager.verify(token, &self.action).is_valid()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn constant_time_eq(expected: &str, given: &str) -> bool {
    expected.as_bytes().ct_eq(given.as_bytes()).into()
}
