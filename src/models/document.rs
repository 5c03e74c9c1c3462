use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A searchable document: an id plus named text fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Display title: `title`, then `name`, then the id
    pub fn title(&self) -> &str {
        self.field("title")
            .or_else(|| self.field("name"))
            .unwrap_or(&self.id)
    }

    /// Values of the given fields in order, or of every field when the list is empty
    pub fn field_values<'a>(&'a self, names: &'a [String]) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        if names.is_empty() {
            Box::new(self.fields.values().map(String::as_str))
        } else {
            Box::new(names.iter().filter_map(|name| self.field(name)))
        }
    }

    /// Searchable text for the given fields, space separated
    pub fn field_text(&self, names: &[String]) -> String {
        self.field_values(names).collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_text_selected_fields() {
        let doc = Document::new("1")
            .with_field("title", "The Matrix")
            .with_field("plot", "A hacker learns the truth")
            .with_field("year", "1999");

        let names = vec!["title".to_string(), "year".to_string()];
        assert_eq!(doc.field_text(&names), "The Matrix 1999");

        // Unknown fields are skipped
        let names = vec!["director".to_string(), "title".to_string()];
        assert_eq!(doc.field_text(&names), "The Matrix");
    }

    #[test]
    fn test_field_text_all_fields() {
        let doc = Document::new("1").with_field("b", "second").with_field("a", "first");
        assert_eq!(doc.field_text(&[]), "first second");
    }

    #[test]
    fn test_title_fallback() {
        assert_eq!(Document::new("7").with_field("title", "Heat").title(), "Heat");
        assert_eq!(Document::new("7").with_field("name", "Ronin").title(), "Ronin");
        assert_eq!(Document::new("7").title(), "7");
    }

    #[test]
    fn test_deserialize_flattened_fields() {
        let doc: Document = toml::from_str(
            r#"
            id = "tt0133093"
            title = "The Matrix"
            genre = "Sci-Fi"
            "#,
        )
        .unwrap();

        assert_eq!(doc.id, "tt0133093");
        assert_eq!(doc.field("title"), Some("The Matrix"));
        assert_eq!(doc.field("genre"), Some("Sci-Fi"));
        assert!(doc.field("id").is_none());
    }
}
