//! # Draft slot: durable scratch space for unsaved editor content
//!
//! A [`Draft`] is the body the author uploaded or was working on, plus a label
//! (usually the uploaded file name). It lives outside component state so it
//! survives a reload or a remount of the editor.
//!
//! The slot holds at most one draft under two fixed keys ([`BODY_KEY`] and
//! [`LABEL_KEY`]). `save` overwrites both; `clear` removes both. A slot whose
//! body key is missing holds no draft, whatever the label key says.
//!
//! Implementations:
//!
//! | Type | Medium |
//! |------|--------|
//! | [`MemoryDraftSlot`] | Process memory. Tests and server-side rendering. |
//! | `LocalStorageSlot` (`web` feature, wasm32) | The browser's `localStorage`. |

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::repo::StoreError;

/// Storage key of the draft body.
pub const BODY_KEY: &str = "writeup-draft.body";
/// Storage key of the draft label.
pub const LABEL_KEY: &str = "writeup-draft.label";

/// Unsaved editor content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub body: String,
    pub label: String,
}

impl Draft {
    pub fn new(body: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            label: label.into(),
        }
    }
}

/// Whether an uploaded file name names a markdown file.
pub fn is_markdown_file(name: &str) -> bool {
    name.len() > 3 && name.to_ascii_lowercase().ends_with(".md")
}

/// Durable single-entry slot for a [`Draft`]. Last write wins.
pub trait DraftSlot {
    fn save(&self, draft: &Draft) -> Result<(), StoreError>;
    fn load(&self) -> Option<Draft>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// A two-key storage medium a slot writes its draft into.
pub(crate) trait DraftArea {
    type Error: std::fmt::Debug;

    fn write_key(&mut self, key: &'static str, value: &str) -> Result<(), Self::Error>;
    fn remove_key(&mut self, key: &'static str) -> Result<(), Self::Error>;
}

/// Write both keys of `draft`. If either write fails both keys are removed, so
/// the area never pairs one draft's body with another's label.
pub(crate) fn write_draft<A: DraftArea>(area: &mut A, draft: &Draft) -> Result<(), StoreError> {
    let written = area
        .write_key(BODY_KEY, &draft.body)
        .and_then(|_| area.write_key(LABEL_KEY, &draft.label));
    if let Err(e) = written {
        let _ = area.remove_key(BODY_KEY);
        let _ = area.remove_key(LABEL_KEY);
        return Err(StoreError::Unavailable(format!("{e:?}")));
    }
    Ok(())
}

impl DraftArea for HashMap<&'static str, String> {
    type Error = std::convert::Infallible;

    fn write_key(&mut self, key: &'static str, value: &str) -> Result<(), Self::Error> {
        self.insert(key, value.to_string());
        Ok(())
    }

    fn remove_key(&mut self, key: &'static str) -> Result<(), Self::Error> {
        HashMap::remove(self, key);
        Ok(())
    }
}

/// In-memory DraftSlot. Clones share the same entry, which is how a remounted
/// editor sees what the previous instance saved.
#[derive(Clone, Debug, Default)]
pub struct MemoryDraftSlot {
    entries: Arc<Mutex<HashMap<&'static str, String>>>,
}

impl MemoryDraftSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under one key. Lets tests observe both keys.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl DraftSlot for MemoryDraftSlot {
    fn save(&self, draft: &Draft) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("draft slot poisoned".to_string()))?;
        write_draft(&mut *entries, draft)
    }

    fn load(&self) -> Option<Draft> {
        let entries = self.entries.lock().ok()?;
        let body = entries.get(BODY_KEY)?.clone();
        let label = entries.get(LABEL_KEY).cloned().unwrap_or_default();
        Some(Draft { body, label })
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("draft slot poisoned".to_string()))?;
        entries.remove(BODY_KEY);
        entries.remove(LABEL_KEY);
        Ok(())
    }
}
