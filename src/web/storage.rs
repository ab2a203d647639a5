//! `localStorage`-backed key-value store

use web_sys::Storage;

use crate::error::DittoError;
use crate::navigation::KeyValueStore;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, DittoError> {
        let window = web_sys::window().ok_or_else(|| DittoError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| DittoError::Storage(super::js_reason(e)))?
            .ok_or_else(|| DittoError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DittoError> {
        self.storage
            .get_item(key)
            .map_err(|e| DittoError::Storage(super::js_reason(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DittoError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| DittoError::Storage(super::js_reason(e)))
    }
}
