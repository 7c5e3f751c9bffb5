use std::sync::Arc;

use services::{
    AppServices, AuthService, DashboardService, ProgressService, SessionBootstrap, StreamService,
};

use crate::platform::{DesktopLinkOpener, LinkOpenerRef};

/// Services the views need, supplied by the composition root.
pub trait UiApp: Send + Sync {
    fn bootstrap(&self) -> Arc<SessionBootstrap>;
    fn auth(&self) -> Arc<AuthService>;
    fn stream(&self) -> Arc<StreamService>;
    fn dashboard(&self) -> Arc<DashboardService>;
    fn progress(&self) -> Arc<ProgressService>;
}

impl UiApp for AppServices {
    fn bootstrap(&self) -> Arc<SessionBootstrap> {
        AppServices::bootstrap(self)
    }

    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }

    fn stream(&self) -> Arc<StreamService> {
        AppServices::stream(self)
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        AppServices::dashboard(self)
    }

    fn progress(&self) -> Arc<ProgressService> {
        AppServices::progress(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    bootstrap: Arc<SessionBootstrap>,
    auth: Arc<AuthService>,
    stream: Arc<StreamService>,
    dashboard: Arc<DashboardService>,
    progress: Arc<ProgressService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, link_opener: LinkOpenerRef) -> Self {
        Self {
            bootstrap: app.bootstrap(),
            auth: app.auth(),
            stream: app.stream(),
            dashboard: app.dashboard(),
            progress: app.progress(),
            link_opener,
        }
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

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` that opens links in the system browser.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app, Arc::new(DesktopLinkOpener))
}
