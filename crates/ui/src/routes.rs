use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::GuesserView;

pub const PAGE_TITLE: &str = "Who's that Cassette Beast?";
pub const SOURCE_URL: &str = "https://github.com/ShouvikGhosh2048/whos-that-cassette-beast";

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", GuesserView)] Home {},
}

#[component]
pub(crate) fn Layout() -> Element {
    rsx! {
        div { class: "page",
            p { class: "page-title", "{PAGE_TITLE}" }
            Outlet::<Route> {}
            div { class: "centered footer",
                a { href: SOURCE_URL, "Github" }
            }
        }
    }
}
