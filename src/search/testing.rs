use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{SearchError, SearchManager};
use crate::models::{AccessorRegistry, QueryAccessor};

/// Search manager double that records the accessor values each search saw
pub(crate) struct RecordingSearchManager {
    registry: RefCell<AccessorRegistry>,
    searches: RefCell<Vec<Vec<(String, String)>>>,
    fail: Cell<bool>,
}

impl RecordingSearchManager {
    pub(crate) fn new() -> Self {
        RecordingSearchManager {
            registry: RefCell::new(AccessorRegistry::new()),
            searches: RefCell::new(Vec::new()),
            fail: Cell::new(false),
        }
    }

    /// Number of successful searches
    pub(crate) fn search_count(&self) -> usize {
        self.searches.borrow().len()
    }

    /// Value of accessor `key` at each successful search
    pub(crate) fn queries(&self, key: &str) -> Vec<String> {
        self.searches
            .borrow()
            .iter()
            .filter_map(|snapshot| {
                snapshot
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, value)| value.clone())
            })
            .collect()
    }

    /// Make subsequent searches fail
    pub(crate) fn fail_searches(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub(crate) fn accessors_snapshot(&self) -> Vec<Rc<QueryAccessor>> {
        self.registry.borrow().accessors()
    }
}

impl SearchManager for RecordingSearchManager {
    fn register_accessor(&self, accessor: Rc<QueryAccessor>) -> Result<(), SearchError> {
        self.registry.borrow_mut().register(accessor)
    }

    fn unregister_accessor(&self, key: &str) -> Option<Rc<QueryAccessor>> {
        self.registry.borrow_mut().unregister(key)
    }

    fn accessors(&self) -> Vec<Rc<QueryAccessor>> {
        self.registry.borrow().accessors()
    }

    fn perform_search(&self) -> Result<(), SearchError> {
        if self.fail.get() {
            return Err(SearchError::Request("simulated failure".to_string()));
        }

        let snapshot = self
            .registry
            .borrow()
            .accessors()
            .iter()
            .map(|a| (a.key().to_string(), a.value()))
            .collect();
        self.searches.borrow_mut().push(snapshot);
        Ok(())
    }
}
