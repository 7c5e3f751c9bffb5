use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use roadmap_core::model::{RegistrationDraft, Stream};
use services::{AppServices, InMemoryRoadmapApi};
use storage::repository::Storage;

use crate::context::{AppContext, UiApp};
use crate::platform::testing::RecordingLinkOpener;
use crate::views::{
    DashboardView, LandingView, LoginView, RegisterView, RoadmapView, StreamSelectView,
};

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Login,
    Register,
    StreamSelect,
    Dashboard,
    Roadmap(String),
    /// Mounts one roadmap, then switches the prop to another in place.
    RoadmapSwitch { from: String, to: String },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    opener: Arc<RecordingLinkOpener>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let opener = props.opener.clone();
    use_context_provider(|| AppContext::new(&app, opener));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    #[route("/login")]
    LoginRedirect {},
}

pub const LOGIN_REDIRECT_MARKER: &str = "redirected to login";

#[component]
fn LoginRedirect() -> Element {
    rsx! { p { "{LOGIN_REDIRECT_MARKER}" } }
}

#[component]
fn RoadmapSwitch(from: String, to: String) -> Element {
    let mut career_id = use_signal(|| from);
    use_future(move || {
        let to = to.clone();
        async move {
            tokio::task::yield_now().await;
            career_id.set(to);
        }
    });
    rsx! { RoadmapView { career_id: career_id() } }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Register => rsx! { RegisterView {} },
        ViewKind::StreamSelect => rsx! { StreamSelectView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Roadmap(career_id) => rsx! { RoadmapView { career_id } },
        ViewKind::RoadmapSwitch { from, to } => rsx! { RoadmapSwitch { from, to } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: InMemoryRoadmapApi,
    pub app: Arc<AppServices>,
    pub opener: Arc<RecordingLinkOpener>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then give pending resources a few chances to resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Sign up a fresh user and pick a stream through the services the views use.
pub async fn sign_in_with_stream(app: &AppServices, stream: Stream) {
    app.auth()
        .register(&RegistrationDraft {
            name: "Priya Sharma".into(),
            email: "priya@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        })
        .await
        .expect("register");
    app.stream()
        .continue_with(Some(stream))
        .await
        .expect("choose stream");
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let api = InMemoryRoadmapApi::with_seed_catalog().expect("seed catalog");
    let storage = Storage::in_memory();
    let app = Arc::new(AppServices::new(Arc::new(api.clone()), &storage));
    let opener = Arc::new(RecordingLinkOpener::default());

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::clone(&app),
            opener: Arc::clone(&opener),
            view,
        },
    );

    ViewHarness {
        dom,
        api,
        app,
        opener,
    }
}
