//! Reading progress persistence
//!
//! Keeps only the most recent chapter and its scroll depth, in a key-value
//! store that outlives the page session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::address::Address;
use crate::error::DittoError;

pub const LAST_ADDRESS_KEY: &str = "ditto_last_address";
pub const SCROLL_FRACTION_KEY: &str = "ditto_scroll_fraction";

// =============================================================================
// KeyValueStore
// =============================================================================

/// Persisted string store (browser `localStorage` in production)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DittoError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DittoError>;
}

/// In-memory store for tests and storage-less environments
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DittoError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DittoError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> Result<Option<String>, DittoError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DittoError> {
        (**self).set(key, value)
    }
}

// =============================================================================
// ProgressStore
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    /// `None` until something has been recorded
    pub last_address: Option<Address>,
    /// Always in `[0, 1]`
    pub scroll_fraction: f64,
}

impl ReadingProgress {
    /// Stored fraction, if it belongs to `address`'s chapter
    pub fn fraction_for(&self, address: &Address) -> Option<f64> {
        self.last_address
            .as_ref()
            .filter(|last| last.same_chapter(address))
            .map(|_| self.scroll_fraction)
    }
}

pub struct ProgressStore<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> ProgressStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Missing or corrupt values read back as "nothing recorded" / `0.0`
    pub fn read(&self) -> Result<ReadingProgress, DittoError> {
        let last_address = self
            .store
            .get(LAST_ADDRESS_KEY)?
            .map(|raw| Address::from_fragment(&raw));
        let scroll_fraction = self
            .store
            .get(SCROLL_FRACTION_KEY)?
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(clamp_fraction)
            .unwrap_or(0.0);
        Ok(ReadingProgress {
            last_address,
            scroll_fraction,
        })
    }

    pub fn write(&mut self, address: &Address, scroll_fraction: f64) -> Result<(), DittoError> {
        self.store.set(LAST_ADDRESS_KEY, &address.to_fragment())?;
        self.store
            .set(SCROLL_FRACTION_KEY, &clamp_fraction(scroll_fraction).to_string())
    }

    /// Record `{address, 0}` when `address` names a different chapter than
    /// the stored one. Returns whether the reset fired.
    pub fn reset_on_chapter_change(&mut self, address: &Address) -> Result<bool, DittoError> {
        let progress = self.read()?;
        let same = progress
            .last_address
            .as_ref()
            .is_some_and(|last| last.same_chapter(address));
        if same {
            return Ok(false);
        }
        self.write(address, 0.0)?;
        Ok(true)
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

/// NaN and out-of-range values collapse into `[0, 1]`
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Consumed scroll distance over total scrollable distance
pub fn scroll_fraction(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    clamp_fraction(scroll_top / scrollable)
}

/// Pixel offset for a stored fraction
pub fn scroll_offset(fraction: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    (scroll_height - viewport_height).max(0.0) * clamp_fraction(fraction)
}

// =============================================================================
// FrameThrottle
// =============================================================================

/// At most one pending sample per animation frame
#[derive(Debug, Default)]
pub struct FrameThrottle {
    scheduled: bool,
    dropped: u64,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the caller should schedule a frame callback
    pub fn try_schedule(&mut self) -> bool {
        if self.scheduled {
            self.dropped += 1;
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Call from the frame callback once the sample is taken
    pub fn frame_done(&mut self) {
        self.scheduled = false;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Events coalesced into an already scheduled frame
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, DittoError> {
            Err(DittoError::Storage("quota".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), DittoError> {
            Err(DittoError::Storage("quota".into()))
        }
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Round trip before any chapter change
    // -------------------------------------------------------------------------
    #[test]
    fn test_write_then_read() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        let address = Address::new("guide/setup", None);
        progress.write(&address, 0.42).unwrap();

        let read = progress.read().unwrap();
        assert_eq!(read.last_address, Some(address.clone()));
        assert_eq!(read.scroll_fraction, 0.42);
        assert_eq!(read.fraction_for(&address), Some(0.42));
    }

    #[test]
    fn test_empty_store_reads_default() {
        let progress = ProgressStore::new(MemoryStore::new());
        assert_eq!(progress.read().unwrap(), ReadingProgress::default());
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Only a chapter change resets
    // -------------------------------------------------------------------------
    #[test]
    fn test_reset_on_chapter_change() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        progress.write(&Address::new("a", None), 0.7).unwrap();

        assert!(progress.reset_on_chapter_change(&Address::new("b", None)).unwrap());
        let read = progress.read().unwrap();
        assert_eq!(read.last_address, Some(Address::new("b", None)));
        assert_eq!(read.scroll_fraction, 0.0);
    }

    #[test]
    fn test_same_chapter_other_anchor_keeps_progress() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        progress.write(&Address::new("a", Some("One".into())), 0.5).unwrap();

        let fired = progress
            .reset_on_chapter_change(&Address::new("a", Some("Two".into())))
            .unwrap();
        assert!(!fired);
        assert_eq!(progress.read().unwrap().scroll_fraction, 0.5);
    }

    #[test]
    fn test_first_visit_records_address() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        assert!(progress.reset_on_chapter_change(&Address::home()).unwrap());
        assert_eq!(progress.read().unwrap().last_address, Some(Address::home()));
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Fractions stay in [0, 1]
    // -------------------------------------------------------------------------
    #[test]
    fn test_fraction_clamped() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        progress.write(&Address::new("a", None), 3.0).unwrap();
        assert_eq!(progress.read().unwrap().scroll_fraction, 1.0);
        progress.write(&Address::new("a", None), f64::NAN).unwrap();
        assert_eq!(progress.read().unwrap().scroll_fraction, 0.0);
    }

    #[test]
    fn test_corrupt_fraction_reads_zero() {
        let mut store = MemoryStore::new();
        store.set(SCROLL_FRACTION_KEY, "not a number").unwrap();
        let progress = ProgressStore::new(store);
        assert_eq!(progress.read().unwrap().scroll_fraction, 0.0);
    }

    #[test]
    fn test_storage_errors_propagate() {
        let mut progress = ProgressStore::new(FailingStore);
        assert!(progress.read().is_err());
        assert!(progress.write(&Address::home(), 0.1).is_err());
    }

    #[test]
    fn test_scroll_fraction() {
        assert_eq!(scroll_fraction(0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(500.0, 2000.0, 1000.0), 0.5);
        assert_eq!(scroll_fraction(1000.0, 2000.0, 1000.0), 1.0);
        // page shorter than the viewport cannot scroll
        assert_eq!(scroll_fraction(10.0, 500.0, 1000.0), 0.0);
        assert_eq!(scroll_offset(0.5, 2000.0, 1000.0), 500.0);
    }

    #[test]
    fn test_frame_throttle() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.try_schedule());
        assert!(!throttle.try_schedule());
        assert!(!throttle.try_schedule());
        assert_eq!(throttle.dropped(), 2);
        throttle.frame_done();
        assert!(throttle.try_schedule());
    }

    #[test]
    fn test_frame_throttle_released_through_shared_handle() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let throttle = Rc::new(RefCell::new(FrameThrottle::new()));
        assert!(throttle.borrow_mut().try_schedule());

        // the frame callback owns its own handle; the listener keeps the other
        let frame_throttle = throttle.clone();
        let frame = move || frame_throttle.borrow_mut().frame_done();
        frame();

        assert!(!throttle.borrow().is_scheduled());
        assert!(throttle.borrow_mut().try_schedule());
        assert_eq!(throttle.borrow().dropped(), 0);
    }
}
