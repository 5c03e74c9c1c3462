use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};

use super::accessor::QueryAccessorOptions;
use super::document::Document;

/// Score added when a document also matches as a prefix
const PREFIX_BOOST: u32 = 1_000;

/// Search case sensitivity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Smart case: case-insensitive unless query contains uppercase letters
    /// This is the default mode
    #[default]
    SmartCase,
    /// Case-sensitive search (always)
    CaseSensitive,
}

impl SearchMode {
    /// Read the mode from accessor query options (`case_sensitive = true`)
    pub fn from_options(options: &QueryAccessorOptions) -> Self {
        match options.query_options.get("case_sensitive") {
            Some(toml::Value::Boolean(true)) => SearchMode::CaseSensitive,
            _ => SearchMode::SmartCase,
        }
    }
}

/// Fuzzy + prefix matcher over documents, driven by accessor options
pub struct SearchIndex {
    matcher: Matcher,
    mode: SearchMode,
}

impl SearchIndex {
    /// Create a new search index with default mode (SmartCase)
    pub fn new() -> Self {
        SearchIndex {
            matcher: Matcher::new(Config::DEFAULT),
            mode: SearchMode::default(),
        }
    }

    /// Set the search mode
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Get the current search mode
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Search documents by query string
    /// Returns vector of (document index, score) tuples, sorted by score descending
    pub fn search(
        &mut self,
        documents: &[Document],
        query: &str,
        options: &QueryAccessorOptions,
    ) -> Vec<(usize, u32)> {
        if query.is_empty() {
            // Return all documents with max score if query is empty
            return (0..documents.len()).map(|i| (i, u32::MAX)).collect();
        }

        let mode = self.mode;
        let case_matching = match mode {
            SearchMode::SmartCase => CaseMatching::Smart,
            SearchMode::CaseSensitive => CaseMatching::Respect,
        };
        let pattern = Pattern::parse(query, case_matching, Normalization::Smart);
        let prefix_fields = options.prefix_query_fields.fields();

        let mut results: Vec<(usize, u32)> = documents
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| {
                let search_text = doc.field_text(&options.query_fields);
                let utf32_text = Utf32String::from(search_text.as_str());
                let fuzzy = pattern.score(utf32_text.slice(..), &mut self.matcher);

                let prefix = prefix_fields.is_some_and(|fields| prefix_match(doc, fields, query, mode));

                match (fuzzy, prefix) {
                    (Some(score), true) => Some((i, score.saturating_add(PREFIX_BOOST))),
                    (Some(score), false) => Some((i, score)),
                    (None, true) => Some((i, PREFIX_BOOST)),
                    (None, false) => None,
                }
            })
            .collect();

        // Higher scores first, load order breaks ties
        results.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        results
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// True if any word of the given fields (or a whole field value) starts with the query
fn prefix_match(doc: &Document, fields: &[String], query: &str, mode: SearchMode) -> bool {
    let normalize = |s: &str| match mode {
        SearchMode::SmartCase => s.to_lowercase(),
        SearchMode::CaseSensitive => s.to_string(),
    };
    let query = normalize(query);

    doc.field_values(fields).any(|value| {
        let value = normalize(value);
        value.starts_with(&query) || value.split_whitespace().any(|word| word.starts_with(&query))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accessor::{PrefixFieldsConfig, QueryOptions};

    fn movies() -> Vec<Document> {
        vec![
            Document::new("1")
                .with_field("title", "The Matrix")
                .with_field("plot", "A hacker discovers reality is simulated"),
            Document::new("2")
                .with_field("title", "Mad Max")
                .with_field("plot", "A road warrior in the wasteland"),
            Document::new("3")
                .with_field("title", "Heat")
                .with_field("plot", "A master thief and a detective"),
        ]
    }

    fn options(query_fields: &[&str], prefix: PrefixFieldsConfig, on_change: bool) -> QueryAccessorOptions {
        let query_fields: Vec<String> = query_fields.iter().map(|s| s.to_string()).collect();
        QueryAccessorOptions::derive(Some(query_fields.as_slice()), &prefix, None, on_change)
    }

    #[test]
    fn test_search_empty_query() {
        let mut index = SearchIndex::new();
        let docs = movies();

        let results = index.search(&docs, "", &options(&["title"], PrefixFieldsConfig::Default, false));
        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().map(|r| r.0).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_restricted_to_query_fields() {
        let mut index = SearchIndex::new();
        let docs = movies();

        // "thief" only appears in a plot
        let title_only = options(&["title"], PrefixFieldsConfig::Disabled, false);
        assert!(index.search(&docs, "thief", &title_only).is_empty());

        let with_plot = options(&["title", "plot"], PrefixFieldsConfig::Disabled, false);
        let results = index.search(&docs, "thief", &with_plot);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 2);
    }

    #[test]
    fn test_empty_query_fields_search_everything() {
        let mut index = SearchIndex::new();
        let docs = movies();

        let results = index.search(&docs, "wasteland", &options(&[], PrefixFieldsConfig::Disabled, false));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn test_prefix_match_boosts_score() {
        let mut index = SearchIndex::new();
        let docs = movies();

        let plain = options(&["title"], PrefixFieldsConfig::Disabled, false);
        let prefixed = options(&["title"], PrefixFieldsConfig::Default, true);

        let plain_results = index.search(&docs, "ma", &plain);
        let prefix_results = index.search(&docs, "ma", &prefixed);

        let plain_score = plain_results.iter().find(|r| r.0 == 1).unwrap().1;
        let prefix_score = prefix_results.iter().find(|r| r.0 == 1).unwrap().1;
        assert!(prefix_score > plain_score);
    }

    #[test]
    fn test_prefix_fields_match_on_their_own() {
        let mut index = SearchIndex::new();
        let docs = movies();

        // Query fields never contain "road", prefix fields do
        let opts = options(
            &["title"],
            PrefixFieldsConfig::Explicit(vec!["plot".to_string()]),
            false,
        );
        let results = index.search(&docs, "roa", &opts);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], (1, PREFIX_BOOST));
    }

    #[test]
    fn test_case_sensitive_mode() {
        let mut index = SearchIndex::new();
        let docs = movies();
        let opts = options(&["title"], PrefixFieldsConfig::Disabled, false);

        assert!(!index.search(&docs, "mad", &opts).is_empty());

        index.set_mode(SearchMode::CaseSensitive);
        assert_eq!(index.mode(), SearchMode::CaseSensitive);
        assert!(index.search(&docs, "mad", &opts).is_empty());
        assert!(!index.search(&docs, "Mad", &opts).is_empty());
    }

    #[test]
    fn test_mode_from_query_options() {
        let mut query_options = QueryOptions::new();
        assert_eq!(
            SearchMode::from_options(&QueryAccessorOptions::derive(
                None,
                &PrefixFieldsConfig::Default,
                Some(&query_options),
                false
            )),
            SearchMode::SmartCase
        );

        query_options.insert("case_sensitive".to_string(), toml::Value::Boolean(true));
        assert_eq!(
            SearchMode::from_options(&QueryAccessorOptions::derive(
                None,
                &PrefixFieldsConfig::Default,
                Some(&query_options),
                false
            )),
            SearchMode::CaseSensitive
        );
    }
}
