use dioxus::prelude::*;
use pindrop_shared::models::{Pin, PinId};

/// Side panel listing saved pins in the order they were saved.
#[component]
pub fn PinList(
    pins: Vec<Pin>,
    on_navigate: EventHandler<PinId>,
    on_delete: EventHandler<PinId>,
) -> Element {
    rsx! {
        div { class: "sidebar",
            h2 { "Saved Pins" }
            div { class: "pin-list",
                if pins.is_empty() {
                    p { class: "empty-hint", "Click on the map to drop a pin." }
                }
                for pin in pins.iter() {
                    PinCard {
                        key: "{pin.id}",
                        pin: pin.clone(),
                        on_navigate: on_navigate,
                        on_delete: on_delete,
                    }
                }
            }
        }
    }
}

#[component]
fn PinCard(pin: Pin, on_navigate: EventHandler<PinId>, on_delete: EventHandler<PinId>) -> Element {
    let nav_id = pin.id.clone();
    let del_id = pin.id.clone();
    rsx! {
        div { class: "pin-card",
            p { class: "pin-remarks", "{pin.display_remarks()}" }
            p { class: "pin-address", "{pin.address}" }
            div { class: "pin-actions",
                button {
                    class: "primary",
                    onclick: move |_| on_navigate.call(nav_id.clone()),
                    "View on Map"
                }
                button {
                    class: "danger",
                    onclick: move |_| on_delete.call(del_id.clone()),
                    "Delete"
                }
            }
        }
    }
}
