use dioxus::prelude::*;
use pindrop_shared::command::{Command, Effect, PinDrop};
use pindrop_shared::config::WidgetConfig;
use pindrop_shared::geocode::resolve_address;
use pindrop_shared::store::{PinStore, SaveOutcome};
use tracing::{debug, error, info};

use crate::api::NominatimGeocoder;
use crate::components::map_view::{MapView, PopupTarget};
use crate::components::pin_list::PinList;
use crate::storage::{BrowserClock, LocalStorage};

pub type Widget = PinDrop<LocalStorage, BrowserClock>;

#[component]
pub fn PinDropPage() -> Element {
    let config = use_context::<WidgetConfig>();

    let map_config = config.map.clone();
    let storage_key = config.storage_key.clone();
    let mut widget = use_signal(move || {
        let store = PinStore::load(LocalStorage::open(), BrowserClock, storage_key);
        PinDrop::new(store, &map_config)
    });
    let geocoder = use_hook(|| NominatimGeocoder::new(&config.geocoder));
    let mut open_popup = use_signal(|| None::<PopupTarget>);

    let dispatch = use_callback(move |command: Command| {
        debug!(?command, "Dispatching");
        let effect = widget.write().dispatch(command);
        match effect {
            Ok(Effect::None) => {}
            Ok(Effect::ResolveAddress(pending)) => {
                let geocoder = geocoder.clone();
                spawn(async move {
                    let address = resolve_address(&geocoder, pending.position()).await;
                    let outcome = widget.write().complete_save(pending, address);
                    match outcome {
                        Ok(SaveOutcome::Saved(pin)) => {
                            info!(id = %pin.id, "Pin saved");
                            if *open_popup.read() == Some(PopupTarget::Draft) {
                                open_popup.set(None);
                            }
                        }
                        Ok(SaveOutcome::Superseded) => {
                            debug!("Draft changed while resolving the address, dropping save");
                        }
                        Err(e) => error!("Failed to save pin: {e}"),
                    }
                });
            }
            Err(e) => error!("Failed to update pins: {e}"),
        }
    });

    let pins = widget.read().store().list().to_vec();

    rsx! {
        div { class: "app",
            PinList {
                pins: pins,
                on_navigate: move |id| dispatch.call(Command::NavigateTo(id)),
                on_delete: move |id| dispatch.call(Command::DeletePin(id)),
            }
            MapView {
                widget: widget,
                config: config.map.clone(),
                open_popup: open_popup,
                on_command: move |command| dispatch.call(command),
            }
        }
    }
}
