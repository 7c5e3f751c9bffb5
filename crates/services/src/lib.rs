#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth;
pub mod bootstrap;
pub mod dashboard;
pub mod error;
pub mod progress;
pub mod session;
pub mod stream;

pub use roadmap_core::Clock;

pub use api::{ApiConfig, ApiError, Endpoint, HttpRoadmapApi, InMemoryRoadmapApi, RoadmapApi};
pub use app_services::AppServices;
pub use auth::{AuthOutcome, AuthService};
pub use bootstrap::{LaunchRoute, SessionBootstrap};
pub use dashboard::{Dashboard, DashboardCard, DashboardService, DashboardStats};
pub use error::{
    AppServicesError, AuthServiceError, DashboardError, ErrorKind, ProgressError,
    ResourceOpenError, StreamSelectionError,
};
pub use progress::{ProgressReconciler, ProgressService, ProgressSnapshot, ToggleOutcome};
pub use session::{SessionContext, SessionError};
pub use stream::{StreamSelector, StreamService};
