//! OAuth token cache.

use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Access token issued by `POST /oauth/token`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// Value sent as `Authorization: Bearer <access_token>`.
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds, counted from the moment the token is stored.
    pub expires_in: u64,
    pub scope: String,
    pub jti: String,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("jti", &self.jti)
            .finish()
    }
}

/// Shared storage for the current access token.
///
/// `get` must only return tokens that are still valid. Implementations are
/// shared between concurrent requests.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<Token>;
    fn put(&self, token: Token);
}

#[derive(Debug, Clone)]
/// A token together with the instant it stops being served.
struct CachedToken {
    token: Token,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process [`TokenStore`] holding at most one token.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    cached: RwLock<Option<CachedToken>>,
    safety_margin: Duration,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat tokens as expired `margin` before Zuora does.
    pub fn with_safety_margin(margin: Duration) -> Self {
        Self {
            cached: RwLock::default(),
            safety_margin: margin,
        }
    }

    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    pub(crate) fn get_at(&self, now: Instant) -> Option<Token> {
        let cached = self.cached.read().unwrap_or_else(PoisonError::into_inner);
        cached
            .as_ref()
            .filter(|cached| cached.is_valid_at(now))
            .map(|cached| cached.token.clone())
    }

    pub(crate) fn put_at(&self, token: Token, now: Instant) {
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(self.safety_margin);
        // Overflowing the clock counts as already expired.
        let expires_at = now.checked_add(lifetime).unwrap_or(now);
        let next = CachedToken { token, expires_at };

        let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(next);
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Token> {
        self.get_at(Instant::now())
    }

    fn put(&self, token: Token) {
        self.put_at(token, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(access_token: &str, expires_in: u64) -> Token {
        Token {
            access_token: access_token.to_owned(),
            token_type: "bearer".to_owned(),
            expires_in,
            scope: String::new(),
            jti: String::new(),
        }
    }

    #[test]
    fn empty_store_returns_none() {
        assert_eq!(MemoryTokenStore::new().get(), None);
    }

    #[test]
    fn get_after_put_returns_token() {
        let store = MemoryTokenStore::new();
        store.put(token("abc", 100));
        assert_eq!(store.get().map(|t| t.access_token), Some("abc".to_owned()));
    }

    #[test]
    fn token_expires_after_lifetime() {
        let store = MemoryTokenStore::new();
        let now = Instant::now();
        store.put_at(token("abc", 100), now);

        assert!(store.get_at(now + Duration::from_secs(99)).is_some());
        assert_eq!(store.get_at(now + Duration::from_secs(100)), None);
        assert_eq!(store.get_at(now + Duration::from_secs(101)), None);
    }

    #[test]
    fn safety_margin_shortens_lifetime() {
        let store = MemoryTokenStore::with_safety_margin(Duration::from_secs(30));
        let now = Instant::now();
        store.put_at(token("abc", 100), now);

        assert!(store.get_at(now + Duration::from_secs(69)).is_some());
        assert_eq!(store.get_at(now + Duration::from_secs(70)), None);
    }

    #[test]
    fn margin_larger_than_lifetime_expires_immediately() {
        let store = MemoryTokenStore::with_safety_margin(Duration::from_secs(300));
        let now = Instant::now();
        store.put_at(token("abc", 100), now);
        assert_eq!(store.get_at(now), None);
    }

    #[test]
    fn put_replaces_previous_token() {
        let store = MemoryTokenStore::new();
        let now = Instant::now();
        store.put_at(token("first", 100), now);
        store.put_at(token("second", 10), now);

        assert_eq!(
            store.get_at(now).map(|t| t.access_token),
            Some("second".to_owned())
        );
        assert_eq!(store.get_at(now + Duration::from_secs(50)), None);
    }

    #[test]
    fn debug_censors_access_token() {
        let got = format!("{:?}", token("super-secret", 1));
        assert!(!got.contains("super-secret"), "{got}");
        assert!(got.contains("[censored]"), "{got}");
    }
}
