//! Key/value persistence backends.

use crate::error::StorageError;
use std::collections::BTreeMap;

/// String key/value store with browser-storage semantics.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend for tests and for [`FallbackStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total number of bytes (keys plus values) the store accepts.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// A backend that rejects every operation.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable("memory storage disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if let Some(quota) = self.quota {
            if self.used_bytes_excluding(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// The platform store when the page grants one, otherwise a [`MemoryStorage`]
/// that lives as long as the page.
#[derive(Debug, Clone)]
pub enum FallbackStorage<S> {
    Platform(S),
    Memory(MemoryStorage),
}

impl<S: Storage> FallbackStorage<S> {
    pub fn new(platform: Option<S>) -> Self {
        match platform {
            Some(storage) => FallbackStorage::Platform(storage),
            None => FallbackStorage::Memory(MemoryStorage::new()),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, FallbackStorage::Memory(_))
    }
}

impl<S: Storage> Storage for FallbackStorage<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            FallbackStorage::Platform(storage) => storage.get(key),
            FallbackStorage::Memory(storage) => storage.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            FallbackStorage::Platform(storage) => storage.set(key, value),
            FallbackStorage::Memory(storage) => storage.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match self {
            FallbackStorage::Platform(storage) => storage.remove(key),
            FallbackStorage::Memory(storage) => storage.remove(key),
        }
    }
}
