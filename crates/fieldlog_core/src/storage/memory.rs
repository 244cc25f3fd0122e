use super::{BlobError, BlobResult, BlobStore};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Process-local blob store.
///
/// Writes can be switched off to exercise the "persistence failed" path.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    items: RefCell<HashMap<String, String>>,
    reject_writes: Cell<bool>,
    write_count: Cell<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set_item` fail until re-enabled.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_item(&self, key: &str) -> BlobResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> BlobResult<()> {
        if self.reject_writes.get() {
            return Err(BlobError::Unavailable("writes rejected".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.write_count.set(self.write_count.get() + 1);
        Ok(())
    }
}
