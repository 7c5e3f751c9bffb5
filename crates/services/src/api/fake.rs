use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use roadmap_core::Clock;
use roadmap_core::model::{
    AuthToken, CareerId, CareerRoadmap, ProgressUpdate, Stream, User, UserId, UserProgress,
};

use super::{ApiError, AuthResponse, LoginRequest, RegisterRequest, RoadmapApi};

const SEED_CATALOG: &str = include_str!("seed_roadmaps.json");

/// Endpoints tracked by the request counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Register,
    Login,
    CurrentUser,
    UpdateStream,
    ListRoadmaps,
    GetRoadmap,
    ListProgress,
    GetProgress,
    UpdateProgress,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    roadmaps: Vec<CareerRoadmap>,
    progress: HashMap<(UserId, CareerId), UserProgress>,
    requests: HashMap<Endpoint, usize>,
    offline: bool,
    fail_next: Option<ApiError>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, email: &str) -> AuthToken {
        let raw = format!("token-{}", self.next_id());
        self.tokens.insert(raw.clone(), email.to_owned());
        AuthToken::new(raw)
    }

    fn account_for(&mut self, token: &AuthToken) -> Result<&mut Account, ApiError> {
        let email = self
            .tokens
            .get(token.as_str())
            .ok_or_else(|| ApiError::Unauthorized("Invalid authentication credentials".into()))?;
        self.accounts
            .get_mut(email)
            .ok_or_else(|| ApiError::Unauthorized("User not found".into()))
    }

    fn roadmap(&self, career_id: &CareerId) -> Option<&CareerRoadmap> {
        self.roadmaps.iter().find(|roadmap| &roadmap.id == career_id)
    }
}

/// In-process backend with the server's semantics.
///
/// Besides serving tests it backs offline runs. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryRoadmapApi {
    state: Arc<Mutex<State>>,
    clock: Clock,
}

impl InMemoryRoadmapApi {
    /// Backend with an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_roadmaps(roadmaps: Vec<CareerRoadmap>) -> Self {
        let api = Self::default();
        if let Ok(mut state) = api.state.lock() {
            state.roadmaps = roadmaps;
        }
        api
    }

    /// Backend preloaded with two roadmaps per stream.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the bundled catalog is malformed.
    pub fn with_seed_catalog() -> Result<Self, ApiError> {
        let roadmaps: Vec<CareerRoadmap> =
            serde_json::from_str(SEED_CATALOG).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Self::with_roadmaps(roadmaps))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// While offline every request fails with `ApiError::Network`.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.offline = offline;
        }
    }

    /// The next request fails with `error`, whatever its endpoint.
    pub fn fail_next_with(&self, error: ApiError) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_next = Some(error);
        }
    }

    /// Invalidate a token as if it had expired server-side.
    pub fn revoke_token(&self, token: &AuthToken) {
        if let Ok(mut state) = self.state.lock() {
            state.tokens.remove(token.as_str());
        }
    }

    #[must_use]
    pub fn request_count(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .map(|state| state.requests.get(&endpoint).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.requests.values().sum())
            .unwrap_or(0)
    }

    /// Stored progress record, bypassing auth and counters.
    #[must_use]
    pub fn stored_progress(&self, user_id: &UserId, career_id: &CareerId) -> Option<UserProgress> {
        self.state.lock().ok().and_then(|state| {
            state
                .progress
                .get(&(user_id.clone(), career_id.clone()))
                .cloned()
        })
    }

    fn begin(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        *state.requests.entry(endpoint).or_insert(0) += 1;
        if state.offline {
            return Err(ApiError::Network("backend unreachable".into()));
        }
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(state)
    }
}

#[async_trait]
impl RoadmapApi for InMemoryRoadmapApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let mut state = self.begin(Endpoint::Register)?;
        if state.accounts.contains_key(&request.email) {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Email already registered".into(),
            });
        }
        let id = UserId::new(format!("user-{}", state.next_id()));
        let mut user = User::new(id, request.name.clone(), request.email.clone());
        user.created_at = Some(self.clock.now());
        state.accounts.insert(
            request.email.clone(),
            Account {
                user: user.clone(),
                password: request.password.clone(),
            },
        );
        let access_token = state.issue_token(&request.email);
        Ok(AuthResponse {
            access_token,
            token_type: "bearer".into(),
            user,
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let mut state = self.begin(Endpoint::Login)?;
        let user = match state.accounts.get(&request.email) {
            Some(account) if account.password == request.password => account.user.clone(),
            _ => return Err(ApiError::Unauthorized("Invalid email or password".into())),
        };
        let access_token = state.issue_token(&request.email);
        Ok(AuthResponse {
            access_token,
            token_type: "bearer".into(),
            user,
        })
    }

    async fn current_user(&self, token: &AuthToken) -> Result<User, ApiError> {
        let mut state = self.begin(Endpoint::CurrentUser)?;
        Ok(state.account_for(token)?.user.clone())
    }

    async fn update_stream(&self, token: &AuthToken, stream: Stream) -> Result<(), ApiError> {
        let mut state = self.begin(Endpoint::UpdateStream)?;
        let account = state.account_for(token)?;
        account.user.selected_stream = Some(stream);
        Ok(())
    }

    async fn list_roadmaps(
        &self,
        _token: &AuthToken,
        stream: Option<Stream>,
    ) -> Result<Vec<CareerRoadmap>, ApiError> {
        let state = self.begin(Endpoint::ListRoadmaps)?;
        Ok(state
            .roadmaps
            .iter()
            .filter(|roadmap| stream.is_none_or(|s| roadmap.stream == s))
            .cloned()
            .collect())
    }

    async fn get_roadmap(
        &self,
        _token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<CareerRoadmap, ApiError> {
        let state = self.begin(Endpoint::GetRoadmap)?;
        state
            .roadmap(career_id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected {
                status: 404,
                message: "Roadmap not found".into(),
            })
    }

    async fn list_progress(&self, token: &AuthToken) -> Result<Vec<UserProgress>, ApiError> {
        let mut state = self.begin(Endpoint::ListProgress)?;
        let user_id = state.account_for(token)?.user.id.clone();
        let mut records: Vec<UserProgress> = state
            .progress
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.career_id.cmp(&b.career_id));
        Ok(records)
    }

    async fn get_progress(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<UserProgress, ApiError> {
        let mut state = self.begin(Endpoint::GetProgress)?;
        let user_id = state.account_for(token)?.user.id.clone();
        let record = state
            .progress
            .get(&(user_id.clone(), career_id.clone()))
            .cloned()
            .unwrap_or_else(|| {
                let mut empty = UserProgress::empty(user_id, career_id.clone());
                empty.last_updated = Some(self.clock.now());
                empty
            });
        Ok(record)
    }

    async fn update_progress(
        &self,
        token: &AuthToken,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError> {
        let mut state = self.begin(Endpoint::UpdateProgress)?;
        let user_id = state.account_for(token)?.user.id.clone();
        let total_steps = state
            .roadmap(&update.career_id)
            .map_or(0, CareerRoadmap::total_steps);
        let now = self.clock.now();
        let record = state
            .progress
            .entry((user_id.clone(), update.career_id.clone()))
            .or_insert_with(|| UserProgress::empty(user_id, update.career_id.clone()));
        record.apply_toggle(&update.step_id, update.completed, total_steps);
        record.last_updated = Some(now);
        Ok(())
    }
}
