/// Error taxonomy surfaced to the request layer. Each variant maps to one
/// stable transport status there; none are retried inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Missing, invalid or expired credential.
    Unauthorized,
    /// Authorization or business-rule violation: wrong owner, non-admin,
    /// wrong status, workplace conflict.
    AccessDenied(&'static str),
    /// Referenced entity absent. Carries the entity name ("Booking", ...).
    NotFound(&'static str),
    /// Malformed input, e.g. start ≥ end.
    Validation(&'static str),
    /// Persistence failure — generic, not domain-specific.
    Wal(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Unauthorized => write!(f, "Not authenticated"),
            EngineError::AccessDenied(detail) => write!(f, "{detail}"),
            EngineError::NotFound(name) => write!(f, "{name} not found"),
            EngineError::Validation(detail) => write!(f, "validation error: {detail}"),
            EngineError::Wal(e) => write!(f, "WAL error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
