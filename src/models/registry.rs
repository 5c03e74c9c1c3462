use std::rc::Rc;

use super::accessor::QueryAccessor;
use crate::search::SearchError;

/// Registry of accessors owned by a search manager
/// Keyed by accessor key, iterated in registration order
#[derive(Debug, Default)]
pub struct AccessorRegistry {
    accessors: Vec<Rc<QueryAccessor>>,
}

impl AccessorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        AccessorRegistry {
            accessors: Vec::new(),
        }
    }

    /// Register an accessor
    /// Fails if another accessor already uses the same key
    pub fn register(&mut self, accessor: Rc<QueryAccessor>) -> Result<(), SearchError> {
        if self.contains(accessor.key()) {
            return Err(SearchError::DuplicateAccessor(accessor.key().to_string()));
        }

        log::debug!("Registered accessor '{}'", accessor.key());
        self.accessors.push(accessor);
        Ok(())
    }

    /// Remove an accessor by key, returning it if it was registered
    pub fn unregister(&mut self, key: &str) -> Option<Rc<QueryAccessor>> {
        let position = self.accessors.iter().position(|a| a.key() == key)?;
        log::debug!("Unregistered accessor '{}'", key);
        Some(self.accessors.remove(position))
    }

    /// Get an accessor by key
    pub fn get(&self, key: &str) -> Option<Rc<QueryAccessor>> {
        self.accessors.iter().find(|a| a.key() == key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.accessors.iter().any(|a| a.key() == key)
    }

    /// All registered accessors in registration order
    pub fn accessors(&self) -> Vec<Rc<QueryAccessor>> {
        self.accessors.clone()
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
