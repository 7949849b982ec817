//! Session cookie token: `<session_id>.<base64url(hmac_sha256(session_id))>`

use kernel::id::SessionId;
use platform::crypto::{sign_token, verify_token};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Signed token for the session cookie
pub fn issue(config: &AuthConfig, session_id: &SessionId) -> String {
    sign_token(&config.session_secret, &session_id.to_string())
}

/// Verify the signature and recover the session id
pub fn parse(config: &AuthConfig, token: &str) -> AuthResult<SessionId> {
    let payload =
        verify_token(&config.session_secret, token).map_err(|_| AuthError::SessionInvalid)?;
    payload.parse().map_err(|_| AuthError::SessionInvalid)
}
