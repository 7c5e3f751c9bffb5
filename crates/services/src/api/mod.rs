//! Remote surface of the roadmap backend.
//!
//! `HttpRoadmapApi` talks to the real server; `InMemoryRoadmapApi` mirrors its
//! semantics for tests and offline runs.

mod fake;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use roadmap_core::model::{
    AuthToken, CareerId, CareerRoadmap, ProgressUpdate, Stream, User, UserProgress,
};

pub use crate::error::ApiError;
pub use fake::{Endpoint, InMemoryRoadmapApi};
pub use http::{ApiConfig, HttpRoadmapApi};

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus profile returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: AuthToken,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StreamUpdateRequest {
    pub stream: Stream,
}

/// Every endpoint the client uses. Authenticated calls take the bearer token
/// explicitly so implementations stay stateless.
#[async_trait]
pub trait RoadmapApi: Send + Sync {
    /// # Errors
    ///
    /// `ApiError::Rejected` when the email is already registered.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// # Errors
    ///
    /// `ApiError::Unauthorized` for unknown email or wrong password.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// # Errors
    ///
    /// `ApiError::Unauthorized` when the token is missing or invalid.
    async fn current_user(&self, token: &AuthToken) -> Result<User, ApiError>;

    /// Persist the user's stream choice.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` when the token is rejected.
    async fn update_stream(&self, token: &AuthToken, stream: Stream) -> Result<(), ApiError>;

    /// Roadmap summaries, optionally filtered by stream.
    ///
    /// # Errors
    ///
    /// Transport and auth failures.
    async fn list_roadmaps(
        &self,
        token: &AuthToken,
        stream: Option<Stream>,
    ) -> Result<Vec<CareerRoadmap>, ApiError>;

    /// # Errors
    ///
    /// `ApiError::Rejected` with status 404 for an unknown roadmap.
    async fn get_roadmap(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<CareerRoadmap, ApiError>;

    /// All progress records of the signed-in user.
    ///
    /// # Errors
    ///
    /// Transport and auth failures.
    async fn list_progress(&self, token: &AuthToken) -> Result<Vec<UserProgress>, ApiError>;

    /// Progress for one roadmap; an empty record when none exists yet.
    ///
    /// # Errors
    ///
    /// Transport and auth failures.
    async fn get_progress(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<UserProgress, ApiError>;

    /// Upsert one step's completion flag.
    ///
    /// # Errors
    ///
    /// Transport and auth failures.
    async fn update_progress(
        &self,
        token: &AuthToken,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError>;
}
