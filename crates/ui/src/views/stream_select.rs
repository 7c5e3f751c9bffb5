use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{ErrorKind, StreamSelector};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::map_stream_options;

#[component]
pub fn StreamSelectView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let streams = ctx.stream();

    let mut selector = use_signal(StreamSelector::new);
    let error = use_signal(|| None::<String>);
    let submitting = use_signal(|| false);

    let on_continue = move |_: MouseEvent| {
        if submitting() {
            return;
        }
        let selection = selector().selection();
        let streams = streams.clone();
        let mut error = error;
        let mut submitting = submitting;
        error.set(None);
        submitting.set(true);
        spawn(async move {
            match streams.continue_with(selection).await {
                Ok(_) => {
                    navigator.replace(Route::Dashboard {});
                }
                Err(err) if err.kind() == ErrorKind::Auth => {
                    navigator.replace(Route::Login {});
                }
                Err(err) => {
                    error.set(Some(err.user_message()));
                    submitting.set(false);
                }
            }
        });
    };

    let options = map_stream_options(&selector());

    rsx! {
        div { class: "page stream-select",
            h2 { "Choose your stream" }
            p { class: "lead", "We'll show the career roadmaps that fit what you study." }
            if let Some(message) = error() {
                p { class: "notice error", "{message}" }
            }
            div { class: "stream-options",
                for option in options {
                    button {
                        key: "{option.title}",
                        class: if option.selected { "stream-option selected" } else { "stream-option" },
                        onclick: move |_| selector.write().select(option.stream),
                        h3 { "{option.title}" }
                        p { "{option.tagline}" }
                    }
                }
            }
            button {
                class: "button primary",
                disabled: submitting(),
                onclick: on_continue,
                if submitting() { "Saving..." } else { "Continue" }
            }
        }
    }
}
