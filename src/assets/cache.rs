//! Keyed cache of decoded sheets
//!
//! Each key owns a slot guarded by its own mutex. A caller that finds the
//! slot empty loads while holding it, so concurrent requests for the same
//! key wait for that one load instead of starting their own. Requests for
//! different keys never block each other.

use image::RgbaImage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Slot = Arc<Mutex<Option<Arc<RgbaImage>>>>;

/// Lock a mutex, recovering the data if another thread panicked with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Thread-safe image cache with per-key load coalescing.
#[derive(Debug, Default)]
pub struct AssetCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached image for `key`, without loading.
    pub fn get(&self, key: &str) -> Option<Arc<RgbaImage>> {
        let slot = lock(&self.slots).get(key).cloned()?;
        let image = lock(&slot).clone();
        image
    }

    /// Cached image for `key`, running `load` if it is not cached yet.
    ///
    /// Failed loads are not cached; the next request tries again.
    pub fn get_or_load<E, F>(&self, key: &str, load: F) -> Result<Arc<RgbaImage>, E>
    where
        F: FnOnce() -> Result<RgbaImage, E>,
    {
        let slot = Arc::clone(lock(&self.slots).entry(key.to_string()).or_default());

        let mut entry = lock(&slot);
        if let Some(image) = entry.as_ref() {
            return Ok(Arc::clone(image));
        }

        match load() {
            Ok(image) => {
                let image = Arc::new(image);
                *entry = Some(Arc::clone(&image));
                Ok(image)
            }
            Err(e) => {
                drop(entry);
                self.forget_empty_slot(key, &slot);
                Err(e)
            }
        }
    }

    /// Drop a slot left empty by a failed load, unless another caller is waiting on it.
    fn forget_empty_slot(&self, key: &str, slot: &Slot) {
        let mut slots = lock(&self.slots);
        // Map plus our handle; nobody else can clone it while the map is locked
        if slots.get(key).map_or(false, |current| Arc::ptr_eq(current, slot)) && Arc::strong_count(slot) == 2 {
            slots.remove(key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of cached images
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.slots).clear();
    }
}
