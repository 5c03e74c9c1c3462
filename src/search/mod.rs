//! Search box core: the search manager seam, throttled dispatch and the input controller.

pub mod controller;
pub mod error;
pub mod memory;
pub mod throttle;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::rc::Rc;

use crate::models::QueryAccessor;

pub use controller::{
    PLACEHOLDER_KEY, SearchBoxEvent, SearchBoxProps, SearchBoxState, SearchInputController,
    SubmitEvent,
};
pub use error::SearchError;
pub use memory::{InMemorySearchManager, SearchHit};
pub use throttle::{Clock, DEFAULT_THROTTLE, ManualClock, SystemClock, ThrottledSearchTrigger};

/// Owner of the accessor registry and of the search request/response cycle
///
/// Implementations are used from a single event-loop thread, so methods take
/// `&self` and keep their mutable state in cells.
pub trait SearchManager {
    /// Add an accessor so later searches read its state
    fn register_accessor(&self, accessor: Rc<QueryAccessor>) -> Result<(), SearchError>;

    /// Remove an accessor by key
    fn unregister_accessor(&self, key: &str) -> Option<Rc<QueryAccessor>>;

    /// All registered accessors in registration order
    fn accessors(&self) -> Vec<Rc<QueryAccessor>>;

    /// Find an accessor by key
    fn accessor(&self, key: &str) -> Option<Rc<QueryAccessor>> {
        self.accessors().into_iter().find(|a| a.key() == key)
    }

    /// Read every registered accessor's current state and run a search
    fn perform_search(&self) -> Result<(), SearchError>;
}

/// Lookup of display strings by key
pub trait Translate {
    fn translate(&self, key: &str) -> Option<String>;
}

impl<F> Translate for F
where
    F: Fn(&str) -> Option<String>,
{
    fn translate(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Static translation table, usually loaded from the `[translations]` config section
#[derive(Debug, Clone, Default)]
pub struct Translations {
    strings: HashMap<String, String>,
}

impl Translations {
    pub fn new(strings: HashMap<String, String>) -> Self {
        Translations { strings }
    }
}

impl Translate for Translations {
    fn translate(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translations_table() {
        let mut strings = HashMap::new();
        strings.insert(PLACEHOLDER_KEY.to_string(), "search movies".to_string());
        let translations = Translations::new(strings);

        assert_eq!(
            translations.translate(PLACEHOLDER_KEY),
            Some("search movies".to_string())
        );
        assert_eq!(translations.translate("missing"), None);
    }

    #[test]
    fn test_closure_translator() {
        let translate = |key: &str| (key == "greeting").then(|| "hello".to_string());
        assert_eq!(translate.translate("greeting"), Some("hello".to_string()));
        assert_eq!(translate.translate("other"), None);
    }
}
