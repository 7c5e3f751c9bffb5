use std::sync::Arc;

use roadmap_core::model::{LoginDraft, RegistrationDraft, User};

use crate::api::{AuthResponse, LoginRequest, RegisterRequest, RoadmapApi};
use crate::bootstrap::LaunchRoute;
use crate::error::AuthServiceError;
use crate::session::SessionContext;

/// Result of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub user: User,
    pub next: LaunchRoute,
}

/// Registration, login and logout against the backend, persisting the
/// session locally on success.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn RoadmapApi>,
    session: Arc<SessionContext>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn RoadmapApi>, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    /// Validate the form, create the account and store the session.
    ///
    /// New accounts always continue to stream selection.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::Validation` before any request is sent,
    /// `AuthServiceError::Api` when the server rejects the registration or
    /// is unreachable, and `AuthServiceError::Session` if storing fails.
    pub async fn register(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<AuthOutcome, AuthServiceError> {
        let valid = draft.validate()?;
        let request = RegisterRequest {
            name: valid.name,
            email: valid.email,
            password: valid.password,
        };
        let response = self.api.register(&request).await?;
        self.persist(response, LaunchRoute::StreamSelection).await
    }

    /// Validate the form, sign in and store the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::Validation` before any request is sent and
    /// `AuthServiceError::Api` when credentials are rejected. Nothing is
    /// persisted on failure.
    pub async fn login(&self, draft: &LoginDraft) -> Result<AuthOutcome, AuthServiceError> {
        let valid = draft.validate()?;
        let request = LoginRequest {
            email: valid.email,
            password: valid.password,
        };
        let response = self.api.login(&request).await?;
        let next = if response.user.has_stream() {
            LaunchRoute::Dashboard
        } else {
            LaunchRoute::StreamSelection
        };
        self.persist(response, next).await
    }

    /// # Errors
    ///
    /// Returns `AuthServiceError::Session` if the stored session cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthServiceError> {
        self.session.clear().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Re-fetch the profile with the stored token and refresh the cache.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::NotAuthenticated` without a stored token and
    /// `AuthServiceError::Api` if the request fails. A rejected token also
    /// clears the stored session.
    pub async fn refresh_profile(&self) -> Result<User, AuthServiceError> {
        let token = self
            .session
            .token()
            .await?
            .ok_or(AuthServiceError::NotAuthenticated)?;
        let user = self
            .session
            .expire_on_rejection(self.api.current_user(&token).await)
            .await?;
        self.session.store_user(&user).await?;
        Ok(user)
    }

    /// Cached user, if signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::Session` if the cache cannot be read.
    pub async fn cached_user(&self) -> Result<Option<User>, AuthServiceError> {
        Ok(self.session.user().await?)
    }

    async fn persist(
        &self,
        response: AuthResponse,
        next: LaunchRoute,
    ) -> Result<AuthOutcome, AuthServiceError> {
        self.session
            .save(&response.access_token, &response.user)
            .await?;
        tracing::info!(user_id = %response.user.id, ?next, "signed in");
        Ok(AuthOutcome {
            user: response.user,
            next,
        })
    }
}
