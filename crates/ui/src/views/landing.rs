use dioxus::prelude::*;
use dioxus_router::Link;
use roadmap_core::model::Stream;

use crate::routes::Route;

#[component]
pub fn LandingView() -> Element {
    rsx! {
        div { class: "page landing",
            h1 { "Career Roadmap" }
            p { class: "lead",
                "Step-by-step guidance from school to your dream career, for Science, Commerce and Arts students."
            }
            ul { class: "stream-list",
                for stream in Stream::ALL {
                    li { key: "{stream}",
                        strong { "{stream}" }
                        span { " {stream.tagline()}" }
                    }
                }
            }
            div { class: "actions",
                Link { class: "button primary", to: Route::Register {}, "Get Started" }
                Link { class: "button", to: Route::Login {}, "I already have an account" }
            }
        }
    }
}
