use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use roadmap_core::model::{CareerId, ResourceLink, StepId};
use services::{ErrorKind, ProgressReconciler, ToggleOutcome};

use crate::context::AppContext;
use crate::platform::open_resource;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ResourceVm, RoadmapStepVm, map_roadmap};

type AttachedReconciler = Rc<RefCell<Option<Arc<ProgressReconciler>>>>;

#[component]
pub fn RoadmapView(career_id: ReadSignal<String>) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let progress = ctx.progress();
    let opener = ctx.link_opener();

    // Bumped whenever the reconciler's snapshot may have changed.
    let revision = use_signal(|| 0_u64);
    let notice = use_signal(|| None::<String>);
    let attached: AttachedReconciler = use_hook(|| Rc::new(RefCell::new(None)));

    let resource = {
        let attached = Rc::clone(&attached);
        use_resource(move || {
            let progress = progress.clone();
            let attached = Rc::clone(&attached);
            // Reading the prop here reloads the roadmap when the route changes.
            let career_id = CareerId::new(career_id());
            async move {
                let reconciler = match progress.open(&career_id).await {
                    Ok(reconciler) => Arc::new(reconciler),
                    Err(err) => {
                        let err = ViewError::from_service(err.kind(), err.user_message());
                        if err.is_signed_out() {
                            navigator.replace(Route::Login {});
                        }
                        return Err(err);
                    }
                };
                if let Some(previous) = attached.replace(Some(Arc::clone(&reconciler))) {
                    previous.detach();
                }
                Ok::<_, ViewError>(reconciler)
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let on_toggle = use_callback({
        let attached = Rc::clone(&attached);
        move |(step_id, completed): (StepId, bool)| {
            let Some(reconciler) = attached.borrow().clone() else {
                return;
            };
            let mut notice = notice;
            let mut revision = revision;
            notice.set(None);
            spawn(async move {
                revision += 1;
                match reconciler.toggle_step(&step_id, completed).await {
                    Ok(ToggleOutcome::Applied(_) | ToggleOutcome::Suppressed) => {}
                    Ok(ToggleOutcome::Stale) => return,
                    Err(err) if err.kind() == ErrorKind::Auth => {
                        navigator.replace(Route::Login {});
                        return;
                    }
                    Err(err) => notice.set(Some(err.user_message())),
                }
                revision += 1;
            });
        }
    });

    let on_open = use_callback(move |link: ResourceLink| {
        if let Err(err) = open_resource(opener.as_ref(), &link) {
            tracing::warn!(error = %err, "failed to open resource");
            let mut notice = notice;
            notice.set(Some(err.user_message()));
        }
    });

    use_drop(move || {
        if let Some(reconciler) = attached.borrow_mut().take() {
            reconciler.detach();
        }
    });

    // Subscribe to snapshot changes.
    let _ = revision();

    let content = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Loading..." }
        },
        ViewState::Ready(reconciler) => {
            let vm = map_roadmap(reconciler.roadmap(), &reconciler.snapshot());
            rsx! {
                header { class: "page-header",
                    h2 { "{vm.title}" }
                    p { "{vm.description}" }
                    div { class: "meta",
                        span { "{vm.duration}" }
                        span { "{vm.difficulty}" }
                    }
                }
                section { class: "overall-progress",
                    div { class: "progress-bar",
                        div { class: "progress-fill", style: "width: {vm.percent}%" }
                    }
                    p { "{vm.percent}% complete · {vm.completed_count} of {vm.total_steps} steps" }
                }
                ol { class: "steps",
                    for step in vm.steps {
                        StepItem { key: "{step.id}", step, on_toggle, on_open }
                    }
                }
            }
        }
        ViewState::Error(err) => rsx! {
            div { class: "notice error",
                p { "{err.message()}" }
                if err.is_signed_out() {
                    Link { class: "button primary", to: Route::Login {}, "Log in" }
                }
            }
        },
    };

    rsx! {
        div { class: "page roadmap",
            Link { class: "back", to: Route::Dashboard {}, "← Back to dashboard" }
            if let Some(message) = notice() {
                p { class: "notice error", "{message}" }
            }
            {content}
        }
    }
}

#[component]
fn StepItem(
    step: RoadmapStepVm,
    on_toggle: EventHandler<(StepId, bool)>,
    on_open: EventHandler<ResourceLink>,
) -> Element {
    let marker_class = if step.completed {
        "step-marker done"
    } else {
        "step-marker"
    };
    let step_id = step.id.clone();
    let target = !step.completed;
    rsx! {
        li { class: "step",
            div { class: "step-rail",
                span { class: marker_class, "{step.number}" }
                if step.has_next {
                    span { class: "step-connector" }
                }
            }
            div { class: "step-body",
                h4 { "{step.title}" }
                p { "{step.description}" }
                span { class: "duration", "{step.duration}" }
                if !step.resources.is_empty() {
                    ul { class: "resources",
                        for resource in step.resources.clone() {
                            ResourceChip { resource, on_open }
                        }
                    }
                }
                button {
                    class: if step.completed { "button toggle done" } else { "button toggle" },
                    disabled: step.in_flight,
                    onclick: move |_| on_toggle.call((step_id.clone(), target)),
                    if step.completed { "Completed ✓" } else { "Mark as complete" }
                }
            }
        }
    }
}

#[component]
fn ResourceChip(resource: ResourceVm, on_open: EventHandler<ResourceLink>) -> Element {
    if !resource.openable {
        return rsx! {
            li { class: "resource label", "{resource.label}" }
        };
    }
    let link = resource.link.clone();
    rsx! {
        li { class: "resource link",
            button {
                class: "link-button",
                onclick: move |_| on_open.call(link.clone()),
                "{resource.label}"
            }
        }
    }
}
