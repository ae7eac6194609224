use crate::types::freshness::Acquired;
use crate::types::measurement::Measurement;
use crate::types::sensor::Sensor;
use crate::types::station::Station;
use tokio::sync::Mutex;

/// The contents of a [`SingleSlot`]: the query key and everything that query returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<K, T> {
    pub key: K,
    pub contents: Acquired<T>,
}

/// Holds the result of the most recent query only. Every `replace` evicts the
/// previous value in full; nothing is merged or retained.
#[derive(Debug)]
pub struct SingleSlot<K, T> {
    slot: Mutex<Option<Slot<K, T>>>,
}

impl<K: Clone, T: Clone> SingleSlot<K, T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub async fn replace(&self, key: K, contents: Acquired<T>) {
        let mut slot = self.slot.lock().await;
        *slot = Some(Slot { key, contents });
    }

    /// A copy of the current contents, `None` before the first `replace`.
    pub async fn current(&self) -> Option<Slot<K, T>> {
        self.slot.lock().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.slot.lock().await.is_none()
    }
}

impl<K: Clone, T: Clone> Default for SingleSlot<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The three slots the client keeps: the station directory, the sensors of the
/// last queried station and the series of the last queried sensor.
#[derive(Debug, Default)]
pub struct LocalStore {
    pub stations: SingleSlot<(), Station>,
    pub sensors: SingleSlot<u32, Sensor>,
    pub measurements: SingleSlot<u32, Measurement>,
}
