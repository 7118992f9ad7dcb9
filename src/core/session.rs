//! Session state and the authentication state machine.
//!
//! `Session` owns the token: the in-memory copy is authoritative for the
//! running process and is mirrored into the [`TokenStore`] on every change.
//! `AuthFlow` tracks where login currently stands; network completions are
//! tagged with an attempt id so a completion from a superseded attempt (an
//! older racing login, or one issued before a logout) is dropped instead of
//! resurrecting stale state.

use tracing::{debug, warn};

use crate::auth::{TokenStore, TokenStoreError};

/// Client-held authentication state, derived from presence of a token.
pub struct Session {
    store: Box<dyn TokenStore>,
    token: Option<String>,
}

impl Session {
    /// Initialize from the persisted token. Absence is a valid outcome; a
    /// store read failure is logged and treated as absence rather than
    /// blocking startup.
    pub fn load(store: Box<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(err) => {
                warn!("token store unavailable at startup: {err}");
                None
            }
        };
        let token = token.filter(|t| !t.is_empty());
        Self { store, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Store the token in memory and mirror it to persistent storage. The
    /// in-memory session stays valid even if persistence fails; the error is
    /// returned so the caller can surface it.
    pub fn set_token(&mut self, token: String) -> Result<(), TokenStoreError> {
        let result = self.store.store(&token);
        self.token = Some(token);
        result
    }

    /// Forget the token in memory and delete the persisted copy.
    pub fn clear_token(&mut self) -> Result<(), TokenStoreError> {
        self.token = None;
        self.store.clear()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
    Failed(String),
}

/// Outcome of feeding a login completion into the flow.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginResolution {
    /// The completion belonged to the current attempt and carried a token.
    Authenticated,
    /// The completion belonged to the current attempt and failed.
    Failed,
    /// The completion was for a superseded attempt and was ignored.
    Stale,
}

/// State machine over {Anonymous, Authenticating, Authenticated, Failed}.
///
/// Calls are fire-once with no retries; concurrent attempts are allowed and
/// resolved last-issued-wins via the attempt id.
pub struct AuthFlow {
    state: AuthState,
    attempt: u64,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self {
            state: AuthState::Anonymous,
            attempt: 0,
        }
    }
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an already-authenticated flow for a session restored from
    /// persistent storage.
    pub fn restored() -> Self {
        Self {
            state: AuthState::Authenticated,
            attempt: 0,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn is_authenticating(&self) -> bool {
        self.state == AuthState::Authenticating
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            AuthState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Transition into Authenticating and hand out the attempt id that the
    /// eventual completion must echo back.
    pub fn begin_login(&mut self) -> u64 {
        self.attempt += 1;
        self.state = AuthState::Authenticating;
        debug!(attempt = self.attempt, "login attempt started");
        self.attempt
    }

    /// Apply a login completion. Only the most recently issued attempt may
    /// change state, and only while that attempt is still outstanding, so a
    /// duplicated completion cannot re-trigger the post-login work.
    pub fn resolve_login(&mut self, attempt: u64, outcome: Result<(), String>) -> LoginResolution {
        if attempt != self.attempt || !self.is_authenticating() {
            debug!(attempt, current = self.attempt, "stale login completion dropped");
            return LoginResolution::Stale;
        }
        match outcome {
            Ok(()) => {
                self.state = AuthState::Authenticated;
                LoginResolution::Authenticated
            }
            Err(reason) => {
                self.state = AuthState::Failed(reason);
                LoginResolution::Failed
            }
        }
    }

    /// Return to Anonymous and invalidate any in-flight attempt.
    pub fn reset(&mut self) {
        self.attempt += 1;
        self.state = AuthState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    #[test]
    fn is_authenticated_iff_token_present() {
        let session = Session::load(Box::new(MemoryTokenStore::new()));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);

        let session = Session::load(Box::new(MemoryTokenStore::with_token("tok123")));
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok123"));
    }

    #[test]
    fn empty_persisted_token_does_not_authenticate() {
        let session = Session::load(Box::new(MemoryTokenStore::with_token("")));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_token_persists_and_clear_token_forgets() {
        let mut session = Session::load(Box::new(MemoryTokenStore::new()));
        session.set_token("tok123".to_string()).unwrap();
        assert!(session.is_authenticated());

        session.clear_token().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn login_success_reaches_authenticated() {
        let mut flow = AuthFlow::new();
        assert_eq!(flow.state(), &AuthState::Anonymous);

        let attempt = flow.begin_login();
        assert!(flow.is_authenticating());

        assert_eq!(
            flow.resolve_login(attempt, Ok(())),
            LoginResolution::Authenticated
        );
        assert!(flow.is_authenticated());
    }

    #[test]
    fn login_failure_lands_in_failed_with_reason() {
        let mut flow = AuthFlow::new();
        let attempt = flow.begin_login();
        assert_eq!(
            flow.resolve_login(attempt, Err("invalid credentials".into())),
            LoginResolution::Failed
        );
        assert_eq!(flow.failure_reason(), Some("invalid credentials"));

        // A failed flow can start over.
        flow.begin_login();
        assert!(flow.is_authenticating());
    }

    #[test]
    fn racing_logins_resolve_last_issued_wins() {
        let mut flow = AuthFlow::new();
        let first = flow.begin_login();
        let second = flow.begin_login();

        // The first attempt's completion arrives late and is ignored.
        assert_eq!(flow.resolve_login(first, Ok(())), LoginResolution::Stale);
        assert!(flow.is_authenticating());

        assert_eq!(
            flow.resolve_login(second, Err("bad credentials".into())),
            LoginResolution::Failed
        );
    }

    #[test]
    fn duplicate_completion_is_stale_after_resolution() {
        let mut flow = AuthFlow::new();
        let attempt = flow.begin_login();
        assert_eq!(
            flow.resolve_login(attempt, Ok(())),
            LoginResolution::Authenticated
        );
        assert_eq!(flow.resolve_login(attempt, Ok(())), LoginResolution::Stale);
        assert!(flow.is_authenticated());
    }

    #[test]
    fn reset_invalidates_in_flight_attempts() {
        let mut flow = AuthFlow::new();
        let attempt = flow.begin_login();
        flow.reset();

        assert_eq!(flow.resolve_login(attempt, Ok(())), LoginResolution::Stale);
        assert_eq!(flow.state(), &AuthState::Anonymous);
    }
}
