//! Session state machine
//!
//! A [`Session`] is built once at startup and handed to whatever needs it.
//! State changes go through the pure [`AuthState::reduce`] and are published
//! on a watch channel; user-facing notifications go out on a broadcast
//! channel.

use crate::backend::AuthBackend;
use crate::error::SessionError;
use banquet_core::{Role, TokenStore, User};
use banquet_http::types::{AuthPayload, Credentials, RegisterRequest};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 32;

/// Lifecycle phase derived from [`AuthState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Boot has not looked at the token store yet
    Uninitialized,
    /// A stored token is being exchanged for an identity
    Resolving,
    Authenticated,
    Unauthenticated,
}

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
    /// True only until the boot-time resolution settles
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true, // Start with loading until boot checks the store
        }
    }
}

/// Authentication state transitions
#[derive(Debug, Clone)]
pub enum AuthAction {
    BootWithoutToken,
    BeginResolve { token: String },
    Resolved { token: String, user: User },
    ResolutionFailed { token: String },
    Login(AuthPayload),
    Logout,
}

impl AuthState {
    fn signed_out() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: false,
        }
    }

    /// A token is held; its validity is trusted until a call says otherwise
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (self.is_loading, &self.token, &self.user) {
            (true, None, _) => Phase::Uninitialized,
            (true, Some(_), _) => Phase::Resolving,
            (false, Some(_), Some(_)) => Phase::Authenticated,
            (false, _, _) => Phase::Unauthenticated,
        }
    }

    /// Whether `token` is the one currently awaiting resolution
    fn resolving(&self, token: &str) -> bool {
        self.phase() == Phase::Resolving && self.token.as_deref() == Some(token)
    }

    /// Apply `action`, returning the next state
    ///
    /// Boot actions only apply from `Uninitialized`, and resolution results
    /// only apply to the token they resolved.
    pub fn reduce(&self, action: AuthAction) -> Self {
        match action {
            AuthAction::BootWithoutToken if self.phase() == Phase::Uninitialized => {
                Self::signed_out()
            }
            AuthAction::BeginResolve { token } if self.phase() == Phase::Uninitialized => Self {
                token: Some(token),
                user: None,
                is_loading: true,
            },
            AuthAction::Resolved { token, user } if self.resolving(&token) => Self {
                token: Some(token),
                user: Some(user),
                is_loading: false,
            },
            AuthAction::ResolutionFailed { token } if self.resolving(&token) => {
                Self::signed_out()
            }
            AuthAction::Login(payload) => Self {
                token: Some(payload.token),
                user: Some(payload.user),
                is_loading: false,
            },
            AuthAction::Logout => Self::signed_out(),
            _ => self.clone(),
        }
    }
}

/// Replace `state` with its reduction under `action`; returns whether it changed
fn apply(state: &mut AuthState, action: AuthAction) -> bool {
    let next = state.reduce(action);
    if next == *state {
        false
    } else {
        *state = next;
        true
    }
}

/// Notifications for display components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Authenticated { user_id: String, role: Role },
    LoginFailed { message: String },
    RegistrationFailed { message: String },
    /// The stored token was rejected at boot and has been cleared
    ResolutionFailed { reason: String },
    /// The backend could not invalidate the token; the local session is gone regardless
    RemoteLogoutFailed { reason: String },
    LoggedOut,
}

/// The process-wide authentication session
pub struct Session {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(backend: Arc<dyn AuthBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            tokens,
            state,
            events,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Receive notifications
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Apply an action; returns whether the state changed
    fn dispatch(&self, action: AuthAction) -> bool {
        self.state.send_if_modified(|state| apply(state, action))
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Restore the session from the token store
    ///
    /// Resolution runs at most once; later calls return the current phase.
    pub async fn boot(&self) -> Phase {
        let Some(token) = self.tokens.read() else {
            if self.dispatch(AuthAction::BootWithoutToken) {
                info!("No stored token, session is unauthenticated");
            }
            return self.phase();
        };

        if !self.dispatch(AuthAction::BeginResolve {
            token: token.clone(),
        }) {
            debug!("Session already booted");
            return self.phase();
        }

        debug!("Resolving identity for stored token");
        match self.backend.resolve_identity().await {
            Ok(user) => {
                let (user_id, role) = (user.id.clone(), user.role);
                if self.dispatch(AuthAction::Resolved { token, user }) {
                    info!(%user_id, %role, "Session restored");
                    self.notify(SessionEvent::Authenticated { user_id, role });
                }
            }
            Err(e) => {
                warn!(error = %e, "Identity resolution failed, clearing stored token");
                // Clear under the state lock so a login that already replaced
                // the token cannot lose it
                let mut cleared = Ok(());
                let changed = self.state.send_if_modified(|state| {
                    let changed = apply(state, AuthAction::ResolutionFailed { token });
                    if changed {
                        cleared = self.tokens.clear();
                    }
                    changed
                });
                if let Err(e) = cleared {
                    warn!(error = %e, "Failed to clear stored token");
                }
                if changed {
                    self.notify(SessionEvent::ResolutionFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.phase()
    }

    /// Sign in; on failure the session is left untouched
    pub async fn login(&self, credentials: &Credentials) -> Result<User, SessionError> {
        debug!(email = %credentials.email, "Logging in");
        match self.backend.login(credentials).await {
            Ok(payload) => self.establish(payload, |message| SessionEvent::LoginFailed { message }),
            Err(e) => {
                let error = SessionError::from_client(e);
                warn!(error = %error, "Login failed");
                self.notify(SessionEvent::LoginFailed {
                    message: error.user_message(),
                });
                Err(error)
            }
        }
    }

    /// Create an account and sign in as it
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, SessionError> {
        debug!(email = %request.email, "Registering account");
        match self.backend.register(request).await {
            Ok(payload) => {
                self.establish(payload, |message| SessionEvent::RegistrationFailed { message })
            }
            Err(e) => {
                let error = SessionError::from_client(e);
                warn!(error = %error, "Registration failed");
                self.notify(SessionEvent::RegistrationFailed {
                    message: error.user_message(),
                });
                Err(error)
            }
        }
    }

    /// Persist the new token and switch to it in one step under the state lock
    fn establish(
        &self,
        payload: AuthPayload,
        failed: impl FnOnce(String) -> SessionEvent,
    ) -> Result<User, SessionError> {
        let user = payload.user.clone();
        let mut stored = Ok(());
        self.state.send_if_modified(|state| {
            stored = self.tokens.write(&payload.token);
            stored.is_ok() && apply(state, AuthAction::Login(payload))
        });

        if let Err(e) = stored {
            let error = SessionError::from(e);
            warn!(error = %error, "Failed to persist token");
            self.notify(failed(error.user_message()));
            return Err(error);
        }

        info!(user_id = %user.id, role = %user.role, "Signed in");
        self.notify(SessionEvent::Authenticated {
            user_id: user.id.clone(),
            role: user.role,
        });
        Ok(user)
    }

    /// Sign out
    ///
    /// Always ends unauthenticated with an empty token store, whatever the
    /// backend says.
    pub async fn logout(&self) {
        let has_token = self.tokens.read().is_some() || self.is_authenticated();

        if has_token {
            if let Err(e) = self.backend.logout().await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
                self.notify(SessionEvent::RemoteLogoutFailed {
                    reason: e.to_string(),
                });
            }
        } else {
            debug!("No token to invalidate remotely");
        }

        let mut cleared = Ok(());
        let changed = self.state.send_if_modified(|state| {
            cleared = self.tokens.clear();
            apply(state, AuthAction::Logout)
        });
        if let Err(e) = cleared {
            warn!(error = %e, "Failed to clear stored token");
        }

        if changed || has_token {
            info!("Logged out");
            self.notify(SessionEvent::LoggedOut);
        }
    }
}
