use std::collections::HashSet;

use crate::geocode::{resolve_address, Geocoder};
use crate::models::{LatLng, Pin, PinId};
use crate::storage::{decode_pins, encode_pins, KeyValueStore, StoreError};

/// Storage key holding the whole pin collection.
pub const DEFAULT_STORAGE_KEY: &str = "pins";

/// Millisecond wall clock used to derive pin ids.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Issues time-derived ids that never repeat, even within one millisecond
/// or when the clock steps backwards.
#[derive(Debug, Clone, Default)]
struct IdGenerator {
    last: u64,
    /// Counter for suffixed ids once `last` has reached `u64::MAX`.
    spill: u64,
}

impl IdGenerator {
    fn seeded(pins: &[Pin]) -> Self {
        let last = pins
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { last, spill: 0 }
    }

    /// `taken` reports ids already in use; only consulted once numeric ids
    /// are exhausted.
    fn next(&mut self, now_ms: u64, taken: impl Fn(&str) -> bool) -> PinId {
        if let Some(after) = self.last.checked_add(1) {
            let id = now_ms.max(after);
            self.last = id;
            return id.to_string();
        }
        loop {
            self.spill += 1;
            let id = format!("{now_ms}-{}", self.spill);
            if !taken(&id) {
                return id;
            }
        }
    }
}

/// Handle for an address lookup in flight. Committing it only succeeds
/// while the draft it was taken from is still the current draft.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    draft_id: PinId,
    position: LatLng,
}

impl PendingSave {
    pub fn draft_id(&self) -> &str {
        &self.draft_id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(Pin),
    /// The draft was replaced or already saved while the address resolved.
    Superseded,
}

/// Owns the persisted pins and the single draft slot.
pub struct PinStore<S, C> {
    storage: S,
    clock: C,
    key: String,
    pins: Vec<Pin>,
    draft: Option<Pin>,
    ids: IdGenerator,
}

impl<S: KeyValueStore, C: Clock> PinStore<S, C> {
    /// Read the collection under `key`. Missing, unreadable or corrupt data
    /// yields an empty collection.
    pub fn load(storage: S, clock: C, key: impl Into<String>) -> Self {
        let key = key.into();
        let pins = read_pins(&storage, &key);
        tracing::debug!(count = pins.len(), key = %key, "Loaded pins");
        let ids = IdGenerator::seeded(&pins);
        Self {
            storage,
            clock,
            key,
            pins,
            draft: None,
            ids,
        }
    }

    /// Persisted pins in insertion order.
    pub fn list(&self) -> &[Pin] {
        &self.pins
    }

    pub fn get(&self, id: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    pub fn draft(&self) -> Option<&Pin> {
        self.draft.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Start a new draft at `position`, discarding any unsaved one.
    /// Non-finite coordinates are ignored.
    pub fn begin_draft(&mut self, position: LatLng) -> Option<&Pin> {
        if !position.is_finite() {
            tracing::debug!(?position, "Ignoring draft at invalid position");
            return None;
        }
        let now = self.clock.now_ms();
        let pins = &self.pins;
        let id = self.ids.next(now, |id| pins.iter().any(|p| p.id == id));
        if let Some(old) = self.draft.take() {
            tracing::debug!(id = %old.id, "Discarding unsaved draft");
        }
        tracing::debug!(id = %id, lat = position.lat, lng = position.lng, "Draft started");
        self.draft = Some(Pin::draft(id, position));
        self.draft.as_ref()
    }

    /// Overwrite the draft's remark. Returns `false` when there is no draft.
    pub fn set_draft_remark(&mut self, text: impl Into<String>) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.remarks = text.into();
                true
            }
            None => false,
        }
    }

    /// First half of a save: snapshot what the address lookup needs.
    pub fn begin_save(&self) -> Option<PendingSave> {
        self.draft.as_ref().map(|d| PendingSave {
            draft_id: d.id.clone(),
            position: d.position(),
        })
    }

    /// Second half of a save: append the draft with its resolved address and
    /// persist. A failed write keeps the draft and leaves the collection
    /// untouched.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        address: String,
    ) -> Result<SaveOutcome, StoreError> {
        let draft = match self.draft.as_ref() {
            Some(d) if d.id == pending.draft_id => d,
            _ => {
                tracing::debug!(id = %pending.draft_id, "Dropping address for superseded draft");
                return Ok(SaveOutcome::Superseded);
            }
        };

        let pin = Pin {
            address,
            ..draft.clone()
        };
        let mut pins = self.pins.clone();
        pins.push(pin.clone());
        self.persist(pins)?;
        self.draft = None;
        tracing::debug!(id = %pin.id, "Pin saved");
        Ok(SaveOutcome::Saved(pin))
    }

    /// Resolve the draft's address and save it. `Ok(None)` when there is no
    /// draft.
    pub async fn save_draft<G: Geocoder + ?Sized>(
        &mut self,
        geocoder: &G,
    ) -> Result<Option<Pin>, StoreError> {
        let Some(pending) = self.begin_save() else {
            return Ok(None);
        };
        let address = resolve_address(geocoder, pending.position()).await;
        match self.complete_save(pending, address)? {
            SaveOutcome::Saved(pin) => Ok(Some(pin)),
            SaveOutcome::Superseded => Ok(None),
        }
    }

    /// Remove the pin with `id`. Returns `false` (and writes nothing) when no
    /// pin matches.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let pins: Vec<Pin> = self.pins.iter().filter(|p| p.id != id).cloned().collect();
        self.persist(pins)?;
        tracing::debug!(id = %id, "Pin deleted");
        Ok(true)
    }

    fn persist(&mut self, pins: Vec<Pin>) -> Result<(), StoreError> {
        let raw = encode_pins(&pins)?;
        self.storage.set(&self.key, &raw)?;
        self.pins = pins;
        Ok(())
    }
}

fn read_pins<S: KeyValueStore>(storage: &S, key: &str) -> Vec<Pin> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Could not read stored pins, starting empty");
            return Vec::new();
        }
    };
    let pins = match decode_pins(&raw) {
        Ok(pins) => pins,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Ignoring corrupt stored pins");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    pins.into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id.clone());
            if !fresh {
                tracing::warn!(id = %p.id, "Dropping stored pin with duplicate id");
            }
            fresh
        })
        .collect()
}
