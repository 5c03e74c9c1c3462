pub mod accessor;
pub mod document;
pub mod registry;
pub mod search_index;

pub use accessor::{
    DEFAULT_ACCESSOR_KEY, PrefixFieldsConfig, PrefixQueryFields, QueryAccessor,
    QueryAccessorOptions, QueryOptions, QueryState,
};
pub use document::Document;
pub use registry::AccessorRegistry;
pub use search_index::{SearchIndex, SearchMode};
