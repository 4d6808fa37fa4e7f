use pindrop_shared::storage::{KeyValueStore, StoreError};
use pindrop_shared::store::Clock;

/// `window.localStorage`. Missing when the browser blocks storage, in
/// which case every access fails and the store starts empty.
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage is unavailable, pins will not survive a reload");
        }
        Self { storage }
    }

    fn backend(&self) -> Result<&web_sys::Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend()?
            .get_item(key)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend()?
            .set_item(key, value)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))
    }
}

/// Epoch milliseconds from `performance.timeOrigin + performance.now()`;
/// `std::time` is not available on wasm32.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| (p.time_origin() + p.now()) as u64)
            .unwrap_or_default()
    }
}
