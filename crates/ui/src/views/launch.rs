use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

/// Resolves the stored session and redirects; renders only a placeholder.
#[component]
pub fn LaunchView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let bootstrap = ctx.bootstrap();

    let resource = use_resource(move || {
        let bootstrap = bootstrap.clone();
        async move { bootstrap.resolve().await }
    });

    use_effect(move || {
        if let Some(route) = *resource.read() {
            navigator.replace(Route::from(route));
        }
    });

    rsx! {
        div { class: "page launch",
            p { "Loading..." }
        }
    }
}
