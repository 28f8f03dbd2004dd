//! Read-only authentication predicate.

/// Port answering whether a user is signed in.
#[cfg_attr(test, mockall::automock)]
pub trait AuthSession: Send + Sync {
    /// Whether a user is currently authenticated.
    fn is_authenticated(&self) -> bool;
}

/// Fixture session with nobody signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAuthSession;

impl AuthSession for FixtureAuthSession {
    fn is_authenticated(&self) -> bool {
        false
    }
}
