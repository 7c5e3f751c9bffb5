use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{DashboardCardVm, DashboardVm, map_dashboard};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let dashboard = ctx.dashboard();
    let auth = ctx.auth();

    let mut resource = use_resource(move || {
        let dashboard = dashboard.clone();
        async move {
            match dashboard.refresh().await {
                Ok(loaded) => Ok(map_dashboard(&loaded)),
                Err(err) => {
                    let err = ViewError::from_service(err.kind(), err.user_message());
                    if err.is_signed_out() {
                        navigator.replace(Route::Login {});
                    }
                    Err(err)
                }
            }
        }
    });
    let state = view_state_from_resource(&resource);
    let notice = use_signal(|| None::<String>);

    let on_logout = move |_: MouseEvent| {
        let auth = auth.clone();
        let mut notice = notice;
        spawn(async move {
            match auth.logout().await {
                Ok(()) => {
                    navigator.replace(Route::Landing {});
                }
                Err(err) => notice.set(Some(err.user_message())),
            }
        });
    };

    rsx! {
        div { class: "page dashboard",
            header { class: "page-header",
                h2 { "My Roadmaps" }
                div { class: "actions",
                    button { class: "button", onclick: move |_| resource.restart(), "Refresh" }
                    Link { class: "button", to: Route::StreamSelect {}, "Change stream" }
                    button { class: "button", onclick: on_logout, "Log out" }
                }
            }
            if let Some(message) = notice() {
                p { class: "notice error", "{message}" }
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    DashboardBody { vm }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "notice error",
                        p { "{err.message()}" }
                        if err.is_signed_out() {
                            Link { class: "button primary", to: Route::Login {}, "Log in" }
                        } else {
                            button { class: "button", onclick: move |_| resource.restart(), "Retry" }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn DashboardBody(vm: DashboardVm) -> Element {
    rsx! {
        section { class: "greeting",
            h3 { "{vm.greeting}" }
            if let Some(label) = vm.stream_label.clone() {
                span { class: "badge", "{label}" }
            }
        }
        section { class: "stats",
            div { class: "stat",
                span { class: "stat-value", "{vm.stats.total}" }
                span { class: "stat-label", "Roadmaps" }
            }
            div { class: "stat",
                span { class: "stat-value", "{vm.stats.started}" }
                span { class: "stat-label", "Started" }
            }
            div { class: "stat",
                span { class: "stat-value", "{vm.stats.completed}" }
                span { class: "stat-label", "Completed" }
            }
        }
        if vm.cards.is_empty() {
            p { "No roadmaps available for your stream yet." }
        } else {
            ul { class: "roadmap-cards",
                for card in vm.cards {
                    RoadmapCard { key: "{card.career_id}", card }
                }
            }
        }
    }
}

#[component]
fn RoadmapCard(card: DashboardCardVm) -> Element {
    rsx! {
        li { class: "roadmap-card",
            Link { to: Route::Roadmap { career_id: card.career_id.clone() },
                h4 { "{card.title}" }
                p { "{card.description}" }
                div { class: "meta",
                    span { "{card.step_count} steps" }
                    span { "{card.duration}" }
                    span { "{card.difficulty}" }
                }
                div { class: "progress-bar",
                    div { class: "progress-fill", style: "width: {card.percent}%" }
                }
                p { class: "progress-label", "{card.percent}% · {card.status}" }
            }
        }
    }
}
