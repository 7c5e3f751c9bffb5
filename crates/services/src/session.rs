use std::sync::Arc;

use roadmap_core::model::{AuthToken, Stream, User};
use storage::repository::{AUTH_TOKEN_KEY, CredentialStore, USER_DATA_KEY};

use crate::error::ApiError;
pub use crate::error::SessionError;

/// Locally persisted session: the bearer token plus a cached copy of the user.
///
/// Both entries are written on login/register and removed together on logout
/// or when the server rejects the token.
#[derive(Clone)]
pub struct SessionContext {
    credentials: Arc<dyn CredentialStore>,
}

impl SessionContext {
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Stored token; a blank value counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn token(&self) -> Result<Option<AuthToken>, SessionError> {
        let token = self
            .credentials
            .get(AUTH_TOKEN_KEY)
            .await?
            .map(AuthToken::new)
            .filter(|token| !token.is_blank());
        Ok(token)
    }

    /// Cached user record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CorruptUser` if the cached JSON is unreadable.
    pub async fn user(&self) -> Result<Option<User>, SessionError> {
        let Some(raw) = self.credentials.get(USER_DATA_KEY).await? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw)?;
        Ok(Some(user))
    }

    /// # Errors
    ///
    /// Returns `SessionError` if either entry cannot be written.
    pub async fn save(&self, token: &AuthToken, user: &User) -> Result<(), SessionError> {
        self.credentials.set(AUTH_TOKEN_KEY, token.as_str()).await?;
        self.store_user(user).await
    }

    /// Replace the cached user, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the user cannot be written.
    pub async fn store_user(&self, user: &User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user)?;
        self.credentials.set(USER_DATA_KEY, &raw).await?;
        Ok(())
    }

    /// Merge `stream` into the cached user. Returns the updated user, or
    /// `None` when nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the cached user cannot be read or written.
    pub async fn update_user_stream(&self, stream: Stream) -> Result<Option<User>, SessionError> {
        let Some(user) = self.user().await? else {
            return Ok(None);
        };
        let updated = user.with_stream(stream);
        self.store_user(&updated).await?;
        Ok(Some(updated))
    }

    /// Drop the token and the cached user together.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be written.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.credentials
            .clear(&[AUTH_TOKEN_KEY, USER_DATA_KEY])
            .await?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Pass `result` through, dropping the stored session first when the
    /// server rejected the token.
    ///
    /// # Errors
    ///
    /// Returns the error in `result` unchanged.
    pub async fn expire_on_rejection<T>(
        &self,
        result: Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        if let Err(ApiError::Unauthorized(detail)) = &result {
            match self.clear().await {
                Ok(()) => tracing::info!(%detail, "stored token rejected; session cleared"),
                Err(err) => tracing::warn!(error = %err, "failed to clear rejected session"),
            }
        }
        result
    }
}
