//! # Auth Commands
//!
//! Sign-in view, sign-out and the "who am I" indicator.

use tracing::debug;

use crate::error::ApiError;
use crate::App;

/// Signs in and reports the signed-in email.
///
/// Wrong credentials leave the session anonymous and fail with
/// `Invalid email or password`.
pub async fn sign_in(app: &App, email: &str, password: &str) -> Result<String, ApiError> {
    debug!(email = %email.trim(), "sign_in command");
    let user = app.session.sign_in(email, password).await?;
    Ok(format!("Signed in as {}", user.email))
}

pub async fn sign_out(app: &App) -> Result<String, ApiError> {
    debug!("sign_out command");
    app.session.sign_out().await?;
    Ok("Signed out".to_string())
}

/// The signed-in user, or the sign-in redirect.
pub fn whoami(app: &App) -> Result<String, ApiError> {
    let user = app.session.require_user()?;
    Ok(format!("{} ({})", user.email, user.id))
}
