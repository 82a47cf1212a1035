//! # Auth Session
//!
//! Who is signed in, published to every interested view.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                 restore()                                               │
//! │   ┌───────────┐ ─────────────► ┌──────────────────────┐                 │
//! │   │ Resolving │                │ Authenticated(user)  │◄──┐             │
//! │   └───────────┘ ─────────────► └──────────┬───────────┘   │ sign_in ok  │
//! │                 no session                │ sign_out()    │             │
//! │                       │                   ▼               │             │
//! │                       └──────────► ┌──────────────┐ ──────┘             │
//! │                                    │  Anonymous   │                     │
//! │                                    └──────────────┘ ◄── sign_in failed  │
//! │                                                                         │
//! │  gate():  Resolving → Loading                                           │
//! │           Anonymous → RedirectToSignIn                                  │
//! │           Authenticated(user) → Render(user)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! State is held in a `tokio::sync::watch` channel: readers get the latest
//! value at any time and can await changes.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{ApiError, ErrorCode};
use fashionhub_core::AuthUser;
use fashionhub_store::{AuthClient, AuthError};

/// Authentication state of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The saved session has not been checked yet.
    Resolving,
    Authenticated(AuthUser),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// What a protected view should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Show a loading indicator; the session is still resolving.
    Loading,
    /// Send the user to the sign-in view.
    RedirectToSignIn,
    /// Render the protected content for this user.
    Render(AuthUser),
}

/// The app-wide auth session.
#[derive(Clone)]
pub struct AuthSession {
    client: Arc<AuthClient>,
    state: Arc<watch::Sender<SessionState>>,
}

impl AuthSession {
    /// A session in `Resolving` until [`restore`](Self::restore) runs.
    pub fn new(client: Arc<AuthClient>) -> Self {
        let (state, _) = watch::channel(SessionState::Resolving);
        AuthSession {
            client,
            state: Arc::new(state),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn gate(&self) -> Gate {
        match self.state() {
            SessionState::Resolving => Gate::Loading,
            SessionState::Anonymous => Gate::RedirectToSignIn,
            SessionState::Authenticated(user) => Gate::Render(user),
        }
    }

    /// Waits until the session has left `Resolving`.
    pub async fn resolved(&self) -> SessionState {
        let mut rx = self.subscribe();
        let resolved = match rx
            .wait_for(|state| !matches!(state, SessionState::Resolving))
            .await
        {
            Ok(state) => state.clone(),
            // Sender lives in self; unreachable while self exists.
            Err(_) => self.state(),
        };
        resolved
    }

    fn publish(&self, next: SessionState) {
        let previous = self.state.send_replace(next.clone());
        if previous != next {
            match &next {
                SessionState::Authenticated(user) => {
                    info!(email = %user.email, "Session authenticated")
                }
                SessionState::Anonymous => info!("Session anonymous"),
                SessionState::Resolving => info!("Session resolving"),
            }
        }
    }

    /// Resolves the initial state from the saved session, if any.
    ///
    /// An unreadable session file is logged and treated as no session.
    pub async fn restore(&self) -> SessionState {
        let next = match self.client.restore().await {
            Ok(Some(user)) => SessionState::Authenticated(user),
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                warn!(error = %e, "Could not restore session");
                SessionState::Anonymous
            }
        };
        self.publish(next.clone());
        next
    }

    /// Signs in with email and password.
    ///
    /// Every failure leaves the session `Anonymous` and reports
    /// `Invalid email or password`; the underlying cause is logged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ApiError> {
        match self.client.sign_in(email.trim(), password).await {
            Ok(user) => {
                self.publish(SessionState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                if !matches!(e, AuthError::InvalidCredentials) {
                    warn!(error = %e, "Sign-in failed");
                }
                self.publish(SessionState::Anonymous);
                Err(ApiError::new(
                    ErrorCode::AuthError,
                    AuthError::InvalidCredentials.to_string(),
                ))
            }
        }
    }

    /// Signs out. The session is `Anonymous` afterwards even when the
    /// remote revoke or the session-file cleanup failed.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let result = self.client.sign_out().await;
        self.publish(SessionState::Anonymous);
        result.map_err(ApiError::from)
    }

    /// The signed-in user, or an `Unauthenticated` error for redirects.
    pub fn require_user(&self) -> Result<AuthUser, ApiError> {
        match self.gate() {
            Gate::Render(user) => Ok(user),
            Gate::Loading => Err(ApiError::unauthenticated("Session is still loading")),
            Gate::RedirectToSignIn => Err(ApiError::unauthenticated(
                "Not signed in. Run `fashionhub sign-in --email <email>` first.",
            )),
        }
    }
}
