//! Identifier normalization for derived type and field names.

use std::sync::LazyLock;

use elastiql_store::DEFAULT_DOCUMENT_TYPE;

/// Any character that may not appear in a GraphQL name.
static INVALID_IDENTIFIER_CHAR: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[^a-zA-Z0-9_]").expect("Invalid identifier regex")
});

/// Replaces the first character outside `[A-Za-z0-9_]` with `_`.
///
/// Only the first offending character is replaced; later ones are kept as-is.
/// Names with more than one invalid character therefore stay invalid and are
/// rejected when the executable schema is constructed.
pub fn normalize_identifier(name: &str) -> String {
    INVALID_IDENTIFIER_CHAR.replace(name, "_").into_owned()
}

/// Derives the GraphQL type name for a document type of an index.
///
/// The default document type maps to the bare index name; any other type
/// maps to `<index>_<type>`. The result is normalized.
pub fn derive_type_name(index_name: &str, doc_type: &str) -> String {
    let raw = if doc_type == DEFAULT_DOCUMENT_TYPE {
        index_name.to_string()
    } else {
        format!("{index_name}_{doc_type}")
    };
    normalize_identifier(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_unchanged() {
        assert_eq!(normalize_identifier("articles"), "articles");
        assert_eq!(normalize_identifier("Index_1"), "Index_1");
    }

    #[test]
    fn test_only_first_invalid_char_replaced() {
        assert_eq!(normalize_identifier("my-index"), "my_index");
        assert_eq!(normalize_identifier("my-index-2"), "my_index-2");
        assert_eq!(normalize_identifier(".kibana.v1"), "_kibana.v1");
        assert_eq!(normalize_identifier("a b c"), "a_b c");
    }

    #[test]
    fn test_non_ascii_replaced_once() {
        assert_eq!(normalize_identifier("café-au-lait"), "caf_-au-lait");
    }

    #[test]
    fn test_derive_type_name() {
        assert_eq!(derive_type_name("articles", "logs"), "articles");
        assert_eq!(derive_type_name("articles", "news"), "articles_news");
        assert_eq!(derive_type_name("web-logs", "logs"), "web_logs");
        assert_eq!(derive_type_name("web-logs", "doc"), "web_logs_doc");
        assert_eq!(derive_type_name("a.b", "c-d"), "a_b_c-d");
    }
}
