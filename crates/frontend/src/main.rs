mod api;
mod components;
mod coords;
mod pages;
mod storage;

use dioxus::prelude::*;
use pindrop_shared::config::WidgetConfig;

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    use_context_provider(WidgetConfig::default);

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        pages::pin_drop::PinDropPage {}
    }
}

fn main() {
    let _ = dioxus::logger::init(tracing::Level::INFO);
    launch(App);
}
