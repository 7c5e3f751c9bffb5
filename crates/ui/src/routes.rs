use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};
use services::LaunchRoute;

use crate::views::{
    DashboardView, LandingView, LaunchView, LoginView, RegisterView, RoadmapView,
    StreamSelectView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LaunchView)] Launch {},
        #[route("/welcome", LandingView)] Landing {},
        #[route("/login", LoginView)] Login {},
        #[route("/register", RegisterView)] Register {},
        #[route("/stream", StreamSelectView)] StreamSelect {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/roadmap/:career_id", RoadmapView)] Roadmap { career_id: String },
}

impl From<LaunchRoute> for Route {
    fn from(route: LaunchRoute) -> Self {
        match route {
            LaunchRoute::Landing => Route::Landing {},
            LaunchRoute::StreamSelection => Route::StreamSelect {},
            LaunchRoute::Dashboard => Route::Dashboard {},
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
