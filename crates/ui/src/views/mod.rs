mod dashboard;
mod landing;
mod launch;
mod login;
mod register;
mod roadmap;
mod state;
mod stream_select;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use landing::LandingView;
pub use launch::LaunchView;
pub use login::LoginView;
pub use register::RegisterView;
pub use roadmap::RoadmapView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use stream_select::StreamSelectView;
