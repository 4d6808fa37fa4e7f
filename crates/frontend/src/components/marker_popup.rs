use dioxus::prelude::*;
use pindrop_shared::models::{Pin, PinId};

fn save_label(saving: bool) -> &'static str {
    if saving {
        "Saving…"
    } else {
        "Save Pin"
    }
}

/// CSS placing a popup so its tip sits at `(x, y)` in the map container.
pub fn popup_style(x: f64, y: f64) -> String {
    format!("left: {x}px; top: {y}px;")
}

/// Editable popup on the draft marker.
#[component]
pub fn DraftPopup(
    x: f64,
    y: f64,
    remarks: String,
    saving: bool,
    on_input: EventHandler<String>,
    on_save: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "popup",
            style: "{popup_style(x, y)}",
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
            onwheel: move |evt: Event<WheelData>| evt.stop_propagation(),

            button {
                class: "popup-close",
                "aria-label": "Close",
                onclick: move |_| on_close.call(()),
                "×"
            }
            textarea {
                placeholder: "Enter remarks",
                value: "{remarks}",
                disabled: saving,
                oninput: move |evt: Event<FormData>| on_input.call(evt.value()),
            }
            button {
                class: "primary wide",
                disabled: saving,
                onclick: move |_| on_save.call(()),
                "{save_label(saving)}"
            }
        }
    }
}

/// Read-only popup on a saved pin's marker.
#[component]
pub fn PinPopup(
    x: f64,
    y: f64,
    pin: Pin,
    on_delete: EventHandler<PinId>,
    on_close: EventHandler<()>,
) -> Element {
    let id = pin.id.clone();
    rsx! {
        div {
            class: "popup",
            style: "{popup_style(x, y)}",
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
            onwheel: move |evt: Event<WheelData>| evt.stop_propagation(),

            button {
                class: "popup-close",
                "aria-label": "Close",
                onclick: move |_| on_close.call(()),
                "×"
            }
            p { class: "pin-remarks", "{pin.display_remarks()}" }
            p { class: "pin-address", "{pin.address}" }
            button {
                class: "danger wide",
                onclick: move |_| on_delete.call(id.clone()),
                "Delete Pin"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_label() {
        assert_eq!(save_label(false), "Save Pin");
        assert_eq!(save_label(true), "Saving…");
    }

    #[test]
    fn test_popup_style() {
        assert_eq!(popup_style(97.0, 124.5), "left: 97px; top: 124.5px;");
    }
}
