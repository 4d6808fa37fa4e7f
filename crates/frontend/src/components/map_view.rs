use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use pindrop_shared::command::{Command, MarkerKind, MarkerView};
use pindrop_shared::config::{MapConfig, MarkerIcon};
use pindrop_shared::models::PinId;
use pindrop_shared::tiles::{self, TILE_SIZE};
use pindrop_shared::viewport::Viewport;

use crate::components::marker_popup::{DraftPopup, PinPopup};
use crate::coords;
use crate::pages::pin_drop::Widget;

const MAP_CONTAINER_ID: &str = "pin-map-container";

const MARKER_ICON: Asset = asset!("/assets/location.svg");

/// Mouse movement below this many pixels is a click, not a drag.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch movement below this many pixels is a tap.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// A click only drops a pin if no double-click follows within this window.
const CLICK_DELAY_MS: u32 = 250;

/// Which marker's popup is open.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupTarget {
    Draft,
    Pin(PinId),
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// One zoom level per wheel notch; scrolling up zooms in.
fn wheel_zoom(current: u8, delta_y: f64, config: &MapConfig) -> u8 {
    let step = if delta_y < 0.0 {
        1
    } else if delta_y > 0.0 {
        -1
    } else {
        0
    };
    config.clamp_zoom(i32::from(current) + step)
}

fn moved_beyond(start: (f64, f64), current: (f64, f64), threshold: f64) -> bool {
    (current.0 - start.0).abs() > threshold || (current.1 - start.1).abs() > threshold
}

fn box_style(left: f64, top: f64, width: f64, height: f64) -> String {
    format!("left: {left}px; top: {top}px; width: {width}px; height: {height}px;")
}

#[derive(Debug, Clone, PartialEq)]
struct TileView {
    key: String,
    url: String,
    style: String,
}

fn tile_views(viewport: &Viewport, config: &MapConfig, width: f64, height: f64) -> Vec<TileView> {
    viewport
        .tiles(width, height)
        .into_iter()
        .map(|placed| {
            let t = placed.tile;
            TileView {
                // The same tile can show twice when the world wraps
                key: format!("{}/{}/{}@{:.0}", t.z, t.x, t.y, placed.left),
                url: tiles::tile_url(&config.tile_url, &config.subdomains, t),
                style: box_style(placed.left, placed.top, TILE_SIZE, TILE_SIZE),
            }
        })
        .collect()
}

/// A marker's anchor point in container pixels.
#[derive(Debug, Clone, PartialEq)]
struct Placement {
    key: String,
    marker: MarkerView,
    x: f64,
    y: f64,
}

fn place_markers(
    markers: Vec<MarkerView>,
    viewport: &Viewport,
    width: f64,
    height: f64,
) -> Vec<Placement> {
    markers
        .into_iter()
        .map(|marker| {
            let (x, y) = viewport.latlng_to_container(marker.pin.position(), width, height);
            let key = match marker.kind {
                MarkerKind::Draft => format!("draft-{}", marker.pin.id),
                MarkerKind::Saved => format!("pin-{}", marker.pin.id),
            };
            Placement { key, marker, x, y }
        })
        .collect()
}

fn find_popup_owner<'a>(placements: &'a [Placement], target: &PopupTarget) -> Option<&'a Placement> {
    placements.iter().find(|p| match target {
        PopupTarget::Draft => p.marker.kind == MarkerKind::Draft,
        PopupTarget::Pin(id) => p.marker.kind == MarkerKind::Saved && p.marker.pin.id == *id,
    })
}

fn map_size(fallback: Signal<(f64, f64)>) -> (f64, f64) {
    coords::container_size(MAP_CONTAINER_ID).unwrap_or(*fallback.read())
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[component]
fn MarkerPin(x: f64, y: f64, icon: MarkerIcon, draft: bool, on_open: EventHandler<()>) -> Element {
    let (left, top) = icon.image_origin(x, y);
    let style = box_style(left, top, icon.size[0], icon.size[1]);
    rsx! {
        img {
            class: if draft { "marker draft" } else { "marker" },
            src: MARKER_ICON,
            style: "{style}",
            draggable: "false",
            alt: "",
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
            ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                on_open.call(());
            },
        }
    }
}

#[component]
pub fn MapView(
    widget: Signal<Widget>,
    config: MapConfig,
    open_popup: Signal<Option<PopupTarget>>,
    on_command: EventHandler<Command>,
) -> Element {
    let mut size = use_signal(|| coords::FALLBACK_SIZE);

    // Drag state (mouse)
    let mut drag_start = use_signal(|| None::<(f64, f64)>);
    let mut drag_last = use_signal(|| (0.0_f64, 0.0_f64));
    let mut did_drag = use_signal(|| false);

    // Bumped on every click and double-click; a delayed click fires only if
    // the counter still matches.
    let mut click_generation = use_signal(|| 0_u64);

    // Touch state
    let mut touch_start = use_signal(|| None::<(f64, f64)>);
    let mut touch_last = use_signal(|| (0.0_f64, 0.0_f64));
    let mut touch_did_pan = use_signal(|| false);

    let (width, height) = map_size(size);
    let (viewport, saving, markers) = {
        let state = widget.read();
        (*state.viewport(), state.is_saving(), state.markers())
    };

    let tile_views = tile_views(&viewport, &config, width, height);
    let placements = place_markers(markers, &viewport, width, height);
    let popup = open_popup
        .read()
        .as_ref()
        .and_then(|target| find_popup_owner(&placements, target))
        .cloned();
    let icon = config.icon;
    let attribution = config.attribution.clone();
    let wheel_config = config.clone();
    let dblclick_config = config.clone();
    let zoom_in_config = config.clone();
    let zoom_out_config = config.clone();

    let container_class = if *did_drag.read() && drag_start.read().is_some() {
        "map-container dragging"
    } else {
        "map-container"
    };

    // Map click / tap: start a new draft and show its popup
    let mut drop_pin = move |client_x: f64, client_y: f64| {
        let Some((x, y)) = coords::click_to_container(client_x, client_y, MAP_CONTAINER_ID) else {
            return;
        };
        let (w, h) = map_size(size);
        let position = widget.read().viewport().container_to_latlng(x, y, w, h);
        on_command.call(Command::BeginDraft(position));
        open_popup.set(Some(PopupTarget::Draft));
    };

    let mut schedule_click = move |client_x: f64, client_y: f64| {
        let generation = *click_generation.read() + 1;
        click_generation.set(generation);
        spawn(async move {
            TimeoutFuture::new(CLICK_DELAY_MS).await;
            if *click_generation.read() == generation {
                drop_pin(client_x, client_y);
            }
        });
    };

    let mut zoom_to = move |zoom: u8, anchor: Option<(f64, f64)>| {
        let (w, h) = map_size(size);
        let (x, y) = anchor.unwrap_or((w / 2.0, h / 2.0));
        widget.write().viewport_mut().zoom_at(zoom, x, y, w, h);
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                if let Some(measured) = coords::container_size(MAP_CONTAINER_ID) {
                    size.set(measured);
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let current = widget.read().viewport().zoom;
                let next = wheel_zoom(current, wheel_delta_y(evt.data().delta()), &wheel_config);
                if next == current {
                    return;
                }
                let client = evt.data().client_coordinates();
                zoom_to(next, coords::click_to_container(client.x, client.y, MAP_CONTAINER_ID));
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                drag_start.set(Some((client.x, client.y)));
                drag_last.set((client.x, client.y));
                did_drag.set(false);
                if let Some(measured) = coords::container_size(MAP_CONTAINER_ID) {
                    size.set(measured);
                }
            },

            onmousemove: move |evt: Event<MouseData>| {
                let Some(start) = *drag_start.read() else { return };
                let client = evt.client_coordinates();
                let current = (client.x, client.y);
                if !*did_drag.read() && moved_beyond(start, current, DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let (lx, ly) = *drag_last.read();
                    widget.write().viewport_mut().pan_by(current.0 - lx, current.1 - ly);
                    drag_last.set(current);
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let start = *drag_start.read();
                drag_start.set(None);
                // A mouseup without drag movement = a click
                if start.is_some() && !*did_drag.read() {
                    let client = evt.client_coordinates();
                    schedule_click(client.x, client.y);
                }
                did_drag.set(false);
            },

            onmouseleave: move |_| {
                drag_start.set(None);
                did_drag.set(false);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                // Cancel the pending single click
                let next = *click_generation.read() + 1;
                click_generation.set(next);
                let current = widget.read().viewport().zoom;
                let next = dblclick_config.clamp_zoom(i32::from(current) + 1);
                let client = evt.client_coordinates();
                zoom_to(next, coords::click_to_container(client.x, client.y, MAP_CONTAINER_ID));
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    let c = touches[0].client_coordinates();
                    touch_start.set(Some((c.x, c.y)));
                    touch_last.set((c.x, c.y));
                    touch_did_pan.set(false);
                } else {
                    // Multi-touch is not a tap
                    touch_start.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() != 1 {
                    return;
                }
                let Some(start) = *touch_start.read() else { return };
                let c = touches[0].client_coordinates();
                let current = (c.x, c.y);
                if !*touch_did_pan.read() && moved_beyond(start, current, TOUCH_DRAG_THRESHOLD) {
                    touch_did_pan.set(true);
                }
                if *touch_did_pan.read() {
                    let (lx, ly) = *touch_last.read();
                    widget.write().viewport_mut().pan_by(current.0 - lx, current.1 - ly);
                    touch_last.set(current);
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                if !evt.data().touches().is_empty() {
                    return;
                }
                let start = *touch_start.read();
                touch_start.set(None);
                if let (Some((x, y)), false) = (start, *touch_did_pan.read()) {
                    drop_pin(x, y);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start.set(None);
                touch_did_pan.set(false);
            },

            div { class: "tile-layer",
                for t in tile_views.iter() {
                    img {
                        key: "{t.key}",
                        class: "map-tile",
                        src: "{t.url}",
                        style: "{t.style}",
                        draggable: "false",
                        alt: "",
                    }
                }
            }

            div { class: "marker-layer",
                for p in placements.iter() {
                    MarkerPin {
                        key: "{p.key}",
                        x: p.x,
                        y: p.y,
                        icon: icon,
                        draft: p.marker.kind == MarkerKind::Draft,
                        on_open: {
                            let target = match p.marker.kind {
                                MarkerKind::Draft => PopupTarget::Draft,
                                MarkerKind::Saved => PopupTarget::Pin(p.marker.pin.id.clone()),
                            };
                            move |_| open_popup.set(Some(target.clone()))
                        },
                    }
                }
            }

            if let Some(owner) = popup {
                {
                    let (px, py) = icon.popup_tip(owner.x, owner.y);
                    match owner.marker.kind {
                        MarkerKind::Draft => rsx! {
                            DraftPopup {
                                x: px,
                                y: py,
                                remarks: owner.marker.pin.remarks.clone(),
                                saving: saving,
                                on_input: move |text: String| on_command.call(Command::SetDraftRemark(text)),
                                on_save: move |_| on_command.call(Command::SaveDraft),
                                on_close: move |_| open_popup.set(None),
                            }
                        },
                        MarkerKind::Saved => rsx! {
                            PinPopup {
                                x: px,
                                y: py,
                                pin: owner.marker.pin.clone(),
                                on_delete: move |id: PinId| {
                                    on_command.call(Command::DeletePin(id));
                                    open_popup.set(None);
                                },
                                on_close: move |_| open_popup.set(None),
                            }
                        },
                    }
                }
            }

            div {
                class: "zoom-controls",
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                button {
                    "aria-label": "Zoom in",
                    onclick: move |_| {
                        let current = widget.read().viewport().zoom;
                        zoom_to(zoom_in_config.clamp_zoom(i32::from(current) + 1), None);
                    },
                    "+"
                }
                button {
                    "aria-label": "Zoom out",
                    onclick: move |_| {
                        let current = widget.read().viewport().zoom;
                        zoom_to(zoom_out_config.clamp_zoom(i32::from(current) - 1), None);
                    },
                    "−"
                }
            }

            div { class: "attribution", "{attribution}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pindrop_shared::models::{LatLng, Pin};

    fn pin(id: &str, lat: f64, lng: f64) -> Pin {
        Pin {
            id: id.to_string(),
            lat,
            lng,
            remarks: String::new(),
            address: String::new(),
        }
    }

    #[test]
    fn test_wheel_zoom_steps_one_level() {
        let cfg = MapConfig::default();
        assert_eq!(wheel_zoom(13, -120.0, &cfg), 14);
        assert_eq!(wheel_zoom(13, 120.0, &cfg), 12);
        assert_eq!(wheel_zoom(13, 0.0, &cfg), 13);
    }

    #[test]
    fn test_wheel_zoom_clamps() {
        let cfg = MapConfig::default();
        assert_eq!(wheel_zoom(cfg.max_zoom, -1.0, &cfg), cfg.max_zoom);
        assert_eq!(wheel_zoom(cfg.min_zoom, 1.0, &cfg), cfg.min_zoom);
    }

    #[test]
    fn test_moved_beyond_threshold() {
        assert!(!moved_beyond((10.0, 10.0), (12.0, 13.0), DRAG_THRESHOLD));
        assert!(moved_beyond((10.0, 10.0), (14.0, 10.0), DRAG_THRESHOLD));
        assert!(moved_beyond((10.0, 10.0), (10.0, 5.0), DRAG_THRESHOLD));
    }

    #[test]
    fn test_tile_views_have_unique_keys() {
        let cfg = MapConfig::default();
        // At zoom 1 an 1600px wide map shows the world more than once
        let v = Viewport::new(LatLng::new(0.0, 0.0), 1);
        let views = tile_views(&v, &cfg, 1600.0, 512.0);
        let mut keys: Vec<&str> = views.iter().map(|t| t.key.as_str()).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert!(views.iter().all(|t| t.url.starts_with("https://")));
        assert!(views.iter().all(|t| !t.url.contains('{')));
    }

    #[test]
    fn test_place_markers_center_pin() {
        let v = Viewport::new(LatLng::new(51.505, -0.09), 13);
        let markers = vec![MarkerView {
            kind: MarkerKind::Saved,
            pin: pin("1", 51.505, -0.09),
        }];
        let placed = place_markers(markers, &v, 800.0, 600.0);
        assert!((placed[0].x - 400.0).abs() < 1e-6);
        assert!((placed[0].y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_find_popup_owner() {
        let v = Viewport::new(LatLng::new(0.0, 0.0), 3);
        let markers = vec![
            MarkerView {
                kind: MarkerKind::Saved,
                pin: pin("1", 0.0, 0.0),
            },
            MarkerView {
                kind: MarkerKind::Draft,
                pin: pin("2", 1.0, 1.0),
            },
        ];
        let placed = place_markers(markers, &v, 800.0, 600.0);

        let draft = find_popup_owner(&placed, &PopupTarget::Draft).unwrap();
        assert_eq!(draft.marker.pin.id, "2");
        let saved = find_popup_owner(&placed, &PopupTarget::Pin("1".to_string())).unwrap();
        assert_eq!(saved.marker.kind, MarkerKind::Saved);
        // The draft's id never opens a saved-pin popup
        assert!(find_popup_owner(&placed, &PopupTarget::Pin("2".to_string())).is_none());
        assert!(find_popup_owner(&placed, &PopupTarget::Pin("9".to_string())).is_none());
    }

    #[test]
    fn test_box_style() {
        assert_eq!(
            box_style(1.5, -2.0, 38.0, 95.0),
            "left: 1.5px; top: -2px; width: 38px; height: 95px;"
        );
    }
}
