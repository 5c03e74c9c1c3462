use serde::{Serialize, Serializer};
use std::cell::RefCell;

/// Key the search manager uses to find the query accessor
pub const DEFAULT_ACCESSOR_KEY: &str = "q";

/// Extra query-construction options, passed through to the search manager untouched
pub type QueryOptions = toml::Table;

/// Resolved prefix matching configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixQueryFields {
    /// Prefix matching is off
    Disabled,
    /// Fields used for prefix/autocomplete matching (empty means all fields)
    Fields(Vec<String>),
}

impl PrefixQueryFields {
    pub fn is_disabled(&self) -> bool {
        matches!(self, PrefixQueryFields::Disabled)
    }

    /// Get the field list, or None when disabled
    pub fn fields(&self) -> Option<&[String]> {
        match self {
            PrefixQueryFields::Disabled => None,
            PrefixQueryFields::Fields(fields) => Some(fields),
        }
    }
}

// Serialises as `false` or a list of field names
impl Serialize for PrefixQueryFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrefixQueryFields::Disabled => serializer.serialize_bool(false),
            PrefixQueryFields::Fields(fields) => fields.serialize(serializer),
        }
    }
}

/// Prefix field setting as given by the widget configuration, before resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PrefixFieldsConfig {
    /// Not provided: mirror the query fields when searching on change, otherwise disabled
    #[default]
    Default,
    /// Explicitly disabled
    Disabled,
    /// Explicit field list, used verbatim
    Explicit(Vec<String>),
}

impl PrefixFieldsConfig {
    /// Resolve into a concrete value. Explicit settings always win over the default rule.
    pub fn resolve(&self, query_fields: &[String], search_on_change: bool) -> PrefixQueryFields {
        match self {
            PrefixFieldsConfig::Explicit(fields) => PrefixQueryFields::Fields(fields.clone()),
            PrefixFieldsConfig::Disabled => PrefixQueryFields::Disabled,
            PrefixFieldsConfig::Default if search_on_change => {
                PrefixQueryFields::Fields(query_fields.to_vec())
            }
            PrefixFieldsConfig::Default => PrefixQueryFields::Disabled,
        }
    }
}

/// Static accessor configuration, computed once at construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAccessorOptions {
    pub query_fields: Vec<String>,
    pub prefix_query_fields: PrefixQueryFields,
    // Tables must come last for TOML output
    pub query_options: QueryOptions,
}

impl QueryAccessorOptions {
    /// Derive accessor options from widget configuration.
    /// Missing query fields are treated as an empty list.
    pub fn derive(
        query_fields: Option<&[String]>,
        prefix_query_fields: &PrefixFieldsConfig,
        query_options: Option<&QueryOptions>,
        search_on_change: bool,
    ) -> Self {
        let query_fields = query_fields.map(<[String]>::to_vec).unwrap_or_default();
        let prefix_query_fields = prefix_query_fields.resolve(&query_fields, search_on_change);

        QueryAccessorOptions {
            query_fields,
            prefix_query_fields,
            query_options: query_options.cloned().unwrap_or_default(),
        }
    }
}

/// Mutable query state. Only the value changes over the accessor's lifetime.
#[derive(Debug, Default)]
pub struct QueryState {
    value: RefCell<String>,
}

impl QueryState {
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Overwrite the current value
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }

    pub fn clear(&self) {
        self.value.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.borrow().is_empty()
    }
}

/// Free-text query accessor, registered with a search manager under its key
#[derive(Debug)]
pub struct QueryAccessor {
    key: String,
    options: QueryAccessorOptions,
    pub state: QueryState,
}

impl QueryAccessor {
    /// Create an accessor with the default key
    pub fn new(options: QueryAccessorOptions) -> Self {
        Self::with_key(DEFAULT_ACCESSOR_KEY, options)
    }

    pub fn with_key(key: impl Into<String>, options: QueryAccessorOptions) -> Self {
        QueryAccessor {
            key: key.into(),
            options,
            state: QueryState::default(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> &QueryAccessorOptions {
        &self.options
    }

    /// Current query string
    pub fn value(&self) -> String {
        self.state.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_prefix_disabled_on_submit() {
        let query_fields = fields(&["title"]);
        let options =
            QueryAccessorOptions::derive(Some(query_fields.as_slice()), &PrefixFieldsConfig::Default, None, false);

        assert_eq!(options.query_fields, query_fields);
        assert_eq!(options.prefix_query_fields, PrefixQueryFields::Disabled);
        assert!(options.query_options.is_empty());
    }

    #[test]
    fn test_default_prefix_mirrors_query_fields_on_change() {
        for names in [&[][..], &["title"][..], &["title", "plot", "actors"][..]] {
            let query_fields = fields(names);
            let options = QueryAccessorOptions::derive(
                Some(query_fields.as_slice()),
                &PrefixFieldsConfig::Default,
                None,
                true,
            );
            assert_eq!(
                options.prefix_query_fields,
                PrefixQueryFields::Fields(query_fields.clone())
            );
        }
    }

    #[test]
    fn test_explicit_prefix_wins() {
        let query_fields = fields(&["title"]);
        let explicit = PrefixFieldsConfig::Explicit(fields(&["prefix"]));

        for search_on_change in [true, false] {
            let options =
                QueryAccessorOptions::derive(Some(query_fields.as_slice()), &explicit, None, search_on_change);
            assert_eq!(
                options.prefix_query_fields,
                PrefixQueryFields::Fields(fields(&["prefix"]))
            );

            let options = QueryAccessorOptions::derive(
                Some(query_fields.as_slice()),
                &PrefixFieldsConfig::Disabled,
                None,
                search_on_change,
            );
            assert_eq!(options.prefix_query_fields, PrefixQueryFields::Disabled);
        }
    }

    #[test]
    fn test_missing_query_fields_is_empty() {
        let options = QueryAccessorOptions::derive(None, &PrefixFieldsConfig::Default, None, true);
        assert!(options.query_fields.is_empty());
        assert_eq!(options.prefix_query_fields, PrefixQueryFields::Fields(Vec::new()));
    }

    #[test]
    fn test_query_options_pass_through() {
        let mut query_options = QueryOptions::new();
        query_options.insert("size".to_string(), toml::Value::Integer(5));

        let options =
            QueryAccessorOptions::derive(None, &PrefixFieldsConfig::Default, Some(&query_options), false);
        assert_eq!(options.query_options, query_options);
    }

    #[test]
    fn test_state_overwrites_value() {
        let accessor = QueryAccessor::new(QueryAccessorOptions::derive(
            None,
            &PrefixFieldsConfig::Default,
            None,
            false,
        ));
        assert_eq!(accessor.key(), "q");
        assert!(accessor.state.is_empty());

        accessor.state.set_value("m");
        accessor.state.set_value("ma");
        assert_eq!(accessor.value(), "ma");

        accessor.state.clear();
        assert_eq!(accessor.value(), "");
    }

    #[test]
    fn test_options_serialize_as_toml() {
        let query_fields = fields(&["title"]);
        let options =
            QueryAccessorOptions::derive(Some(query_fields.as_slice()), &PrefixFieldsConfig::Default, None, false);
        let output = toml::to_string(&options).unwrap();
        assert!(output.contains("prefix_query_fields = false"));
        assert!(output.contains("query_fields = [\"title\"]"));
    }
}
