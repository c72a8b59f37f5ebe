use dashmap::DashMap;

use crate::engine::EngineError;
use crate::model::{Ms, UserId};

/// Authenticated caller identity handed to the engine by the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
struct Session {
    user_id: UserId,
    is_admin: bool,
    expires_at: Ms,
}

/// In-memory session-token cache: `authenticate(token) -> Caller`.
///
/// Tokens are opaque strings issued elsewhere; this cache only answers the
/// "who is calling" question and expires entries by TTL.
#[derive(Default)]
pub struct SessionCache {
    sessions: DashMap<String, Session>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: String, user_id: UserId, is_admin: bool, expires_at: Ms) {
        self.sessions.insert(
            token,
            Session {
                user_id,
                is_admin,
                expires_at,
            },
        );
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Resolve a token to a caller. Missing, unknown and expired tokens are
    /// all the same `Unauthorized` to the caller; expired entries are dropped.
    pub fn authenticate(&self, token: &str) -> Result<Caller, EngineError> {
        let now = now_ms();
        let caller = match self.sessions.get(token) {
            Some(session) if session.expires_at > now => Some(Caller {
                user_id: session.user_id,
                is_admin: session.is_admin,
            }),
            Some(_) => None, // expired
            None => None,    // unknown
        };
        match caller {
            Some(c) => Ok(c),
            None => {
                // Unknown and expired tokens both count as failures; the
                // remove is a no-op for unknown tokens.
                self.sessions.remove(token);
                metrics::counter!(crate::observability::AUTH_FAILURES_TOTAL).increment(1);
                Err(EngineError::Unauthorized)
            }
        }
    }
}

fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as Ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_token_resolves_caller() {
        let cache = SessionCache::new();
        cache.insert("tok".into(), 42, true, now_ms() + 60_000);
        assert_eq!(
            cache.authenticate("tok"),
            Ok(Caller {
                user_id: 42,
                is_admin: true
            })
        );
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let cache = SessionCache::new();
        assert_eq!(cache.authenticate("nope"), Err(EngineError::Unauthorized));
    }

    #[test]
    fn expired_token_is_unauthorized_and_evicted() {
        let cache = SessionCache::new();
        cache.insert("old".into(), 1, false, now_ms() - 1);
        assert_eq!(cache.authenticate("old"), Err(EngineError::Unauthorized));
        // Entry is gone after the failed lookup.
        assert!(cache.sessions.get("old").is_none());
    }

    #[test]
    fn failure_counter_covers_unknown_and_expired_tokens() {
        use metrics::{Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU64, Ordering};

        struct Inc(Arc<AtomicU64>);
        impl CounterFn for Inc {
            fn increment(&self, value: u64) {
                self.0.fetch_add(value, Ordering::Relaxed);
            }
            fn absolute(&self, _value: u64) {}
        }

        struct FailureRecorder(Arc<AtomicU64>);
        impl Recorder for FailureRecorder {
            fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
                if key.name() == crate::observability::AUTH_FAILURES_TOTAL {
                    Counter::from_arc(Arc::new(Inc(self.0.clone())))
                } else {
                    Counter::noop()
                }
            }
            fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
                Gauge::noop()
            }
            fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
                Histogram::noop()
            }
        }

        let failures = Arc::new(AtomicU64::new(0));
        let recorder = FailureRecorder(failures.clone());

        let cache = SessionCache::new();
        cache.insert("old".into(), 1, false, now_ms() - 1);
        metrics::with_local_recorder(&recorder, || {
            assert!(cache.authenticate("unknown").is_err());
            assert!(cache.authenticate("old").is_err());
        });
        assert_eq!(failures.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn revoked_token_is_unauthorized() {
        let cache = SessionCache::new();
        cache.insert("tok".into(), 1, false, now_ms() + 60_000);
        cache.revoke("tok");
        assert_eq!(cache.authenticate("tok"), Err(EngineError::Unauthorized));
    }
}
