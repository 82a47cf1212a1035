//! # Auth Provider Client
//!
//! Email/password sign-in against the hosted auth API, token refresh, and
//! the session file that lets the CLI stay signed in between invocations.
//!
//! ## Authentication Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dashboard Auth Flow                              │
//! │                                                                         │
//! │  ┌────────────────┐              ┌─────────────────┐                    │
//! │  │  AuthClient    │              │  Auth API       │                    │
//! │  └───────┬────────┘              └────────┬────────┘                    │
//! │          │  1. POST /auth/v1/token        │                             │
//! │          │     ?grant_type=password       │                             │
//! │          │     {email, password}          │                             │
//! │          │───────────────────────────────►│                             │
//! │          │  2. access + refresh + user    │                             │
//! │          │◄───────────────────────────────│                             │
//! │          │                                │                             │
//! │          │  session.json ← TokenInfo      │                             │
//! │          │                                │                             │
//! │          │  [Later: token near expiry]    │                             │
//! │          │  3. POST /auth/v1/token        │                             │
//! │          │     ?grant_type=refresh_token  │                             │
//! │          │───────────────────────────────►│                             │
//! │          │  4. new access + refresh       │                             │
//! │          │◄───────────────────────────────│                             │
//! │          │                                │                             │
//! │          │  5. POST /auth/v1/logout       │                             │
//! │          │───────────────────────────────►│                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Storage
//! Tokens live in memory and in the session file. A refresh is attempted
//! once the access token is within 5 minutes of expiring.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::RestClient;
use crate::error::{AuthError, AuthResult, StoreError};
use crate::transport::{Method, StoreRequest};
use fashionhub_core::AuthUser;

/// Margin before token expiration to trigger refresh (5 minutes)
const REFRESH_MARGIN_SECS: i64 = 300;

const SIGN_IN: &str = "Failed to sign in";
const REFRESH: &str = "Failed to refresh session";
const SIGN_OUT: &str = "Failed to sign out";

// =============================================================================
// Token Info
// =============================================================================

/// Tokens and user returned by a successful sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl TokenInfo {
    /// Check if the token is expired or about to expire
    pub fn needs_refresh(&self) -> bool {
        Utc::now() + ChronoDuration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    /// Check if the token is completely expired (no grace period)
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Get remaining valid time
    pub fn remaining_secs(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(0) as u64
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// The remote half of authentication.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchanges email and password for tokens.
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<TokenInfo>;

    /// Exchanges a refresh token for new tokens.
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenInfo>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;
}

/// GoTrue-style auth API living next to the REST API on the same host.
#[derive(Clone)]
pub struct GoTrueAuth {
    rest: RestClient,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

impl From<TokenResponse> for TokenInfo {
    fn from(resp: TokenResponse) -> Self {
        TokenInfo {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at: Utc::now() + ChronoDuration::seconds(resp.expires_in),
            user: resp.user,
        }
    }
}

impl GoTrueAuth {
    /// Shares the transport and credentials of an existing REST client.
    pub fn new(rest: RestClient) -> Self {
        GoTrueAuth { rest }
    }

    fn request(&self, method: Method, endpoint: &str) -> AuthResult<StoreRequest> {
        let creds = self.rest.credential_source().credentials()?;
        let url = creds.endpoint(&["auth", "v1", endpoint])?;

        Ok(StoreRequest::new(method, url)
            .header("apikey", creds.api_key.as_str())
            .header("Content-Type", "application/json"))
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
        operation: &str,
        rejected: AuthError,
    ) -> AuthResult<TokenInfo> {
        let request = self
            .request(Method::Post, "token")?
            .query("grant_type", grant_type)
            .json(body);

        let response = match self.rest.execute(request, operation).await {
            Ok(response) => response,
            Err(StoreError::Http { status, .. }) if matches!(status, 400 | 401 | 422) => {
                return Err(rejected);
            }
            Err(e) => return Err(e.into()),
        };

        let token: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| StoreError::decode(operation, e.to_string()))?;
        Ok(token.into())
    }
}

#[async_trait]
impl AuthProvider for GoTrueAuth {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<TokenInfo> {
        debug!(email, "Signing in");
        self.token_grant(
            "password",
            json!({ "email": email, "password": password }),
            SIGN_IN,
            AuthError::InvalidCredentials,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenInfo> {
        debug!("Refreshing session");
        self.token_grant(
            "refresh_token",
            json!({ "refresh_token": refresh_token }),
            REFRESH,
            AuthError::SessionExpired,
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self
            .request(Method::Post, "logout")?
            .header("Authorization", format!("Bearer {}", access_token));
        self.rest.execute(request, SIGN_OUT).await?;
        Ok(())
    }
}

// =============================================================================
// Session File
// =============================================================================

/// JSON file holding the last [`TokenInfo`].
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session has been saved.
    pub fn load(&self) -> AuthResult<Option<TokenInfo>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let token = serde_json::from_str(&contents)
            .map_err(|e| AuthError::SessionFile(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(token))
    }

    pub fn save(&self, token: &TokenInfo) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(token)
            .map_err(|e| AuthError::SessionFile(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> AuthResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Auth Client
// =============================================================================

/// Signed-in state: the current tokens, refreshed on demand and mirrored
/// to the session file when one is configured.
pub struct AuthClient {
    provider: Arc<dyn AuthProvider>,
    session_file: Option<SessionFile>,
    token: RwLock<Option<TokenInfo>>,
}

impl AuthClient {
    pub fn new(provider: Arc<dyn AuthProvider>, session_file: Option<SessionFile>) -> Self {
        AuthClient {
            provider,
            session_file,
            token: RwLock::new(None),
        }
    }

    /// Loads the saved session, refreshing it when it is close to expiry.
    ///
    /// A session that can no longer be refreshed is discarded and the
    /// result is `Ok(None)`; only file errors are returned.
    pub async fn restore(&self) -> AuthResult<Option<AuthUser>> {
        let Some(file) = &self.session_file else {
            return Ok(None);
        };
        let Some(saved) = file.load()? else {
            debug!("No saved session");
            return Ok(None);
        };

        let token = if saved.needs_refresh() {
            match self.provider.refresh(&saved.refresh_token).await {
                Ok(fresh) => {
                    file.save(&fresh)?;
                    fresh
                }
                Err(e) if !saved.is_expired() => {
                    warn!(error = %e, "Session refresh failed, using current token");
                    saved
                }
                Err(e) => {
                    warn!(error = %e, "Saved session expired");
                    file.clear()?;
                    return Ok(None);
                }
            }
        } else {
            saved
        };

        let user = token.user.clone();
        info!(
            email = %user.email,
            expires_in_secs = token.remaining_secs(),
            "Session restored"
        );
        *self.token.write().await = Some(token);
        Ok(Some(user))
    }

    /// Signs in; local state is untouched when the provider rejects.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        let token = self.provider.sign_in(email, password).await?;
        if let Some(file) = &self.session_file {
            file.save(&token)?;
        }

        let user = token.user.clone();
        *self.token.write().await = Some(token);
        info!(email = %user.email, "Signed in");
        Ok(user)
    }

    /// Revokes the session remotely (best effort) and clears local state.
    pub async fn sign_out(&self) -> AuthResult<()> {
        let access_token = self
            .token
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone());

        if let Some(access_token) = access_token {
            if let Err(e) = self.provider.sign_out(&access_token).await {
                warn!(error = %e, "Failed to revoke session on server");
            }
        }

        *self.token.write().await = None;
        if let Some(file) = &self.session_file {
            file.clear()?;
        }
        info!("Signed out");
        Ok(())
    }
}
