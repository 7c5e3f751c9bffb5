use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use roadmap_core::model::RegistrationDraft;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let error = use_signal(|| None::<String>);
    let submitting = use_signal(|| false);

    let on_submit = move |_: MouseEvent| {
        if submitting() {
            return;
        }
        let draft = RegistrationDraft {
            name: name(),
            email: email(),
            password: password(),
            confirm_password: confirm_password(),
        };
        let auth = auth.clone();
        let mut error = error;
        let mut submitting = submitting;
        error.set(None);
        submitting.set(true);
        spawn(async move {
            match auth.register(&draft).await {
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
            h2 { "Create your account" }
            if let Some(message) = error() {
                p { class: "notice error", "{message}" }
            }
            label { "Full name"
                input {
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
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
            label { "Confirm password"
                input {
                    r#type: "password",
                    value: "{confirm_password}",
                    oninput: move |evt| confirm_password.set(evt.value()),
                }
            }
            button {
                class: "button primary",
                disabled: submitting(),
                onclick: on_submit,
                if submitting() { "Creating account..." } else { "Sign Up" }
            }
            p { class: "switch",
                "Already registered? "
                Link { to: Route::Login {}, "Log in" }
            }
        }
    }
}
