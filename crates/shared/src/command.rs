use crate::config::MapConfig;
use crate::models::{LatLng, Pin, PinId};
use crate::storage::{KeyValueStore, StoreError};
use crate::store::{Clock, PendingSave, PinStore, SaveOutcome};
use crate::viewport::Viewport;

/// User intents, independent of how the view reports them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginDraft(LatLng),
    SetDraftRemark(String),
    SaveDraft,
    DeletePin(PinId),
    NavigateTo(PinId),
}

/// Work the caller has to carry out after a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Look up the address, then hand it to [`PinDrop::complete_save`].
    ResolveAddress(PendingSave),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Saved,
    Draft,
}

/// Read projection of one pin for the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub kind: MarkerKind,
    pub pin: Pin,
}

/// The widget state: pin store plus the map viewport.
pub struct PinDrop<S, C> {
    store: PinStore<S, C>,
    viewport: Viewport,
    navigate_zoom: u8,
    saving: Option<PinId>,
}

impl<S: KeyValueStore, C: Clock> PinDrop<S, C> {
    pub fn new(store: PinStore<S, C>, config: &MapConfig) -> Self {
        Self {
            store,
            viewport: config.initial_viewport(),
            navigate_zoom: config.clamp_zoom(i32::from(config.navigate_zoom)),
            saving: None,
        }
    }

    pub fn store(&self) -> &PinStore<S, C> {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Whether the current draft has an address lookup in flight.
    pub fn is_saving(&self) -> bool {
        match (&self.saving, self.store.draft()) {
            (Some(id), Some(draft)) => *id == draft.id,
            _ => false,
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Effect, StoreError> {
        match command {
            Command::BeginDraft(position) => {
                self.store.begin_draft(position);
            }
            Command::SetDraftRemark(text) => {
                self.store.set_draft_remark(text);
            }
            Command::SaveDraft => {
                if self.is_saving() {
                    return Ok(Effect::None);
                }
                if let Some(pending) = self.store.begin_save() {
                    self.saving = Some(pending.draft_id().to_string());
                    return Ok(Effect::ResolveAddress(pending));
                }
            }
            Command::DeletePin(id) => {
                self.store.delete(&id)?;
            }
            Command::NavigateTo(id) => {
                if let Some(pin) = self.store.get(&id) {
                    self.viewport.navigate_to(pin.position(), self.navigate_zoom);
                }
            }
        }
        Ok(Effect::None)
    }

    /// Finish a [`Effect::ResolveAddress`].
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        address: String,
    ) -> Result<SaveOutcome, StoreError> {
        if self.saving.as_deref() == Some(pending.draft_id()) {
            self.saving = None;
        }
        self.store.complete_save(pending, address)
    }

    /// Saved pins in insertion order, then the draft on top.
    pub fn markers(&self) -> Vec<MarkerView> {
        let saved = self.store.list().iter().map(|pin| MarkerView {
            kind: MarkerKind::Saved,
            pin: pin.clone(),
        });
        let draft = self.store.draft().map(|pin| MarkerView {
            kind: MarkerKind::Draft,
            pin: pin.clone(),
        });
        saved.chain(draft).collect()
    }
}
