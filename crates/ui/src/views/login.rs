use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use roadmap_core::model::LoginDraft;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let error = use_signal(|| None::<String>);
    let submitting = use_signal(|| false);

    let on_submit = move |_: MouseEvent| {
        if submitting() {
            return;
        }
        let draft = LoginDraft {
            email: email(),
            password: password(),
        };
        let auth = auth.clone();
        let mut error = error;
        let mut submitting = submitting;
        error.set(None);
        submitting.set(true);
        spawn(async move {
            match auth.login(&draft).await {
                Ok(outcome) => {
                    navigator.replace(Route::from(outcome.next));
                }
                Err(err) => {
                    error.set(Some(err.user_message()));
                    submitting.set(false);
                }
            }
        });
    };

    rsx! {
        div { class: "page auth",
            h2 { "Welcome back" }
            if let Some(message) = error() {
                p { class: "notice error", "{message}" }
            }
            label { "Email"
                input {
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
            }
            label { "Password"
                input {
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
            }
            button {
                class: "button primary",
                disabled: submitting(),
                onclick: on_submit,
                if submitting() { "Signing in..." } else { "Log In" }
            }
            p { class: "switch",
                "New here? "
                Link { to: Route::Register {}, "Create an account" }
            }
        }
    }
}
