use std::sync::Arc;

use storage::repository::Storage;

use crate::api::{ApiConfig, HttpRoadmapApi, InMemoryRoadmapApi, RoadmapApi};
use crate::auth::AuthService;
use crate::bootstrap::SessionBootstrap;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::progress::ProgressService;
use crate::session::SessionContext;
use crate::stream::StreamService;

/// Assembles app-facing services over one API backend and one credential store.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionContext>,
    bootstrap: Arc<SessionBootstrap>,
    auth: Arc<AuthService>,
    stream: Arc<StreamService>,
    dashboard: Arc<DashboardService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    #[must_use]
    pub fn new(api: Arc<dyn RoadmapApi>, storage: &Storage) -> Self {
        let session = Arc::new(SessionContext::new(Arc::clone(&storage.credentials)));
        let bootstrap = Arc::new(SessionBootstrap::new(Arc::clone(&session)));
        let auth = Arc::new(AuthService::new(Arc::clone(&api), Arc::clone(&session)));
        let stream = Arc::new(StreamService::new(Arc::clone(&api), Arc::clone(&session)));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&api),
            Arc::clone(&session),
        ));
        let progress = Arc::new(ProgressService::new(api, Arc::clone(&session)));
        Self {
            session,
            bootstrap,
            auth,
            stream,
            dashboard,
            progress,
        }
    }

    /// Services talking to the HTTP backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the HTTP client cannot be built.
    pub fn new_http(config: ApiConfig, storage: &Storage) -> Result<Self, AppServicesError> {
        tracing::debug!(base_url = %config.base_url, "using HTTP backend");
        let api: Arc<dyn RoadmapApi> = Arc::new(HttpRoadmapApi::new(config)?);
        Ok(Self::new(api, storage))
    }

    /// Services backed by the in-process backend and its seed catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the bundled catalog cannot be read.
    pub fn new_offline(storage: &Storage) -> Result<Self, AppServicesError> {
        tracing::info!("using offline backend with the seed catalog");
        let api: Arc<dyn RoadmapApi> = Arc::new(InMemoryRoadmapApi::with_seed_catalog()?);
        Ok(Self::new(api, storage))
    }

    /// HTTP services with credentials persisted in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or client setup fails.
    pub async fn new_sqlite(db_url: &str, config: ApiConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new_http(config, &storage)
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionContext> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn bootstrap(&self) -> Arc<SessionBootstrap> {
        Arc::clone(&self.bootstrap)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn stream(&self) -> Arc<StreamService> {
        Arc::clone(&self.stream)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
