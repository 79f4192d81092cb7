use crate::error::AuthError;
use crate::models::Session;

/// User id used when the login form is submitted with a blank id.
pub const DEFAULT_USER_ID: &str = "User";

/// Decides whether a login attempt opens a session.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, user_id: &str, secret: &str) -> Result<Session, AuthError>;
}

/// Compares the password against one shared secret. This only gates the UI;
/// it protects nothing.
pub struct SharedSecretAuthenticator {
    secret: String,
}

impl SharedSecretAuthenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Authenticator for SharedSecretAuthenticator {
    fn authenticate(&self, user_id: &str, secret: &str) -> Result<Session, AuthError> {
        if secret != self.secret {
            tracing::debug!(user_id, "login rejected");
            return Err(AuthError::LoginRejected);
        }

        let user_id = user_id.trim();
        let user_id = if user_id.is_empty() {
            DEFAULT_USER_ID
        } else {
            user_id
        };
        Ok(Session::new(user_id))
    }
}
