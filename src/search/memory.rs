use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{SearchError, SearchManager};
use crate::models::{AccessorRegistry, Document, QueryAccessor, SearchIndex, SearchMode};

/// Default cap on hits per search
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// One matching document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Position in the manager's document list
    pub index: usize,
    pub id: String,
    pub title: String,
    pub score: u32,
}

/// Search manager over an in-memory document set
///
/// Every registered accessor with a non-empty query must match a document for
/// it to be a hit; scores from each accessor are summed.
pub struct InMemorySearchManager {
    documents: Vec<Document>,
    registry: RefCell<AccessorRegistry>,
    index: RefCell<SearchIndex>,
    results: RefCell<Vec<SearchHit>>,
    search_count: Cell<usize>,
    max_results: usize,
}

impl InMemorySearchManager {
    pub fn new(documents: Vec<Document>) -> Self {
        InMemorySearchManager {
            documents,
            registry: RefCell::new(AccessorRegistry::new()),
            index: RefCell::new(SearchIndex::new()),
            results: RefCell::new(Vec::new()),
            search_count: Cell::new(0),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, hit: &SearchHit) -> Option<&Document> {
        self.documents.get(hit.index)
    }

    /// Hits of the last completed search
    pub fn results(&self) -> Vec<SearchHit> {
        self.results.borrow().clone()
    }

    pub fn result_count(&self) -> usize {
        self.results.borrow().len()
    }

    /// Number of searches performed so far
    pub fn search_count(&self) -> usize {
        self.search_count.get()
    }

    fn to_hits(&self, scored: Vec<(usize, u32)>) -> Vec<SearchHit> {
        scored
            .into_iter()
            .filter_map(|(index, score)| {
                self.documents.get(index).map(|doc| SearchHit {
                    index,
                    id: doc.id.clone(),
                    title: doc.title().to_string(),
                    score,
                })
            })
            .collect()
    }
}

/// Keep entries present in both lists, summing scores
fn intersect(previous: Vec<(usize, u32)>, next: Vec<(usize, u32)>) -> Vec<(usize, u32)> {
    let next: HashMap<usize, u32> = next.into_iter().collect();
    previous
        .into_iter()
        .filter_map(|(index, score)| next.get(&index).map(|s| (index, score.saturating_add(*s))))
        .collect()
}

impl SearchManager for InMemorySearchManager {
    fn register_accessor(&self, accessor: Rc<QueryAccessor>) -> Result<(), SearchError> {
        self.registry.borrow_mut().register(accessor)
    }

    fn unregister_accessor(&self, key: &str) -> Option<Rc<QueryAccessor>> {
        self.registry.borrow_mut().unregister(key)
    }

    fn accessors(&self) -> Vec<Rc<QueryAccessor>> {
        self.registry.borrow().accessors()
    }

    fn accessor(&self, key: &str) -> Option<Rc<QueryAccessor>> {
        self.registry.borrow().get(key)
    }

    fn perform_search(&self) -> Result<(), SearchError> {
        let accessors = self.registry.borrow().accessors();
        let mut index = self.index.borrow_mut();

        let mut limit = self.max_results;
        let mut combined: Option<Vec<(usize, u32)>> = None;

        for accessor in &accessors {
            let options = accessor.options();
            if let Some(size) = options
                .query_options
                .get("size")
                .and_then(toml::Value::as_integer)
                .and_then(|n| usize::try_from(n).ok())
            {
                limit = limit.min(size);
            }

            let query = accessor.value();
            let query = query.trim();
            if query.is_empty() {
                continue;
            }

            index.set_mode(SearchMode::from_options(options));
            let hits = index.search(&self.documents, query, options);
            combined = Some(match combined {
                None => hits,
                Some(previous) => intersect(previous, hits),
            });
        }

        let mut scored = match combined {
            Some(scored) => scored,
            // No query anywhere: everything, in load order
            None => (0..self.documents.len()).map(|i| (i, u32::MAX)).collect(),
        };
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(limit);

        let hits = self.to_hits(scored);
        let count = self.search_count.get() + 1;
        self.search_count.set(count);
        log::debug!(
            "Search #{} matched {} of {} documents",
            count,
            hits.len(),
            self.documents.len()
        );
        *self.results.borrow_mut() = hits;

        Ok(())
    }
}
