use super::{PersistenceResult, SlotStore};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        let slots = self.slots.lock().expect("slot mutex poisoned");
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let mut slots = self.slots.lock().expect("slot mutex poisoned");
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
