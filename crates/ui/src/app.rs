use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::{PAGE_TITLE, Route};

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "{PAGE_TITLE}" }
        document::Meta { name: "description", content: "A website for guessing Cassette Beasts." }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
