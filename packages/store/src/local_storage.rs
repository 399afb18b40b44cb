//! # localStorage draft slot: browser-side persistence
//!
//! [`LocalStorageSlot`] is the [`DraftSlot`] used on the **web platform**. The
//! draft body and label sit under [`BODY_KEY`] and [`LABEL_KEY`] in the origin's
//! `localStorage`, so they outlive reloads and client-side navigation but not a
//! switch of browser or device.
//!
//! ## Error handling
//!
//! `load` swallows errors and reports "no draft": a blocked or unavailable
//! storage area degrades to a blank editor. `save` and `clear` report
//! [`StoreError::Unavailable`]. A `save` that fails halfway (quota exceeded on
//! the second key) removes both keys before reporting.

use crate::draft::{write_draft, Draft, DraftArea, DraftSlot, BODY_KEY, LABEL_KEY};
use crate::repo::StoreError;

/// localStorage-backed DraftSlot for the web platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageSlot;

impl LocalStorageSlot {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl DraftArea for web_sys::Storage {
    type Error = wasm_bindgen::JsValue;

    fn write_key(&mut self, key: &'static str, value: &str) -> Result<(), Self::Error> {
        self.set_item(key, value)
    }

    fn remove_key(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.remove_item(key)
    }
}

impl DraftSlot for LocalStorageSlot {
    fn save(&self, draft: &Draft) -> Result<(), StoreError> {
        let mut storage = Self::storage()?;
        write_draft(&mut storage, draft)
    }

    fn load(&self) -> Option<Draft> {
        let storage = Self::storage().ok()?;
        let body = storage.get_item(BODY_KEY).ok().flatten()?;
        let label = storage.get_item(LABEL_KEY).ok().flatten().unwrap_or_default();
        Some(Draft { body, label })
    }

    fn clear(&self) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .remove_item(BODY_KEY)
            .and_then(|_| storage.remove_item(LABEL_KEY))
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}
