//! Store field type mapping.
//!
//! Maps the field types declared in index mappings to GraphQL type names.

use elastiql_store::PropertyMapping;

use crate::types::JSON_SCALAR;

/// Maps a store field type to a GraphQL type name.
///
/// Only a fixed set of store types is translated. Anything else is passed
/// through unchanged and becomes a bare type reference in the schema, which
/// fails at schema construction if no such type exists.
pub fn store_type_to_graphql(store_type: &str) -> &str {
    match store_type {
        "text" | "string" => "String",
        "float" | "double" => "Float",
        "long" => "Int",
        "boolean" => "Boolean",
        "date" => "Date",
        other => other,
    }
}

/// Returns the GraphQL type name for a mapped property.
///
/// Properties without a declared type (objects, nested documents) are
/// exposed as `JSON`.
pub fn property_graphql_type(property: &PropertyMapping) -> String {
    match property.field_type.as_deref() {
        Some(store_type) => store_type_to_graphql(store_type).to_string(),
        None => JSON_SCALAR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_to_graphql_table() {
        assert_eq!(store_type_to_graphql("text"), "String");
        assert_eq!(store_type_to_graphql("string"), "String");
        assert_eq!(store_type_to_graphql("float"), "Float");
        assert_eq!(store_type_to_graphql("double"), "Float");
        assert_eq!(store_type_to_graphql("long"), "Int");
        assert_eq!(store_type_to_graphql("boolean"), "Boolean");
        assert_eq!(store_type_to_graphql("date"), "Date");
    }

    #[test]
    fn test_unlisted_types_pass_through() {
        assert_eq!(store_type_to_graphql("keyword"), "keyword");
        assert_eq!(store_type_to_graphql("integer"), "integer");
        assert_eq!(store_type_to_graphql("geo_point"), "geo_point");
    }

    #[test]
    fn test_property_graphql_type() {
        assert_eq!(property_graphql_type(&PropertyMapping::typed("long")), "Int");
        assert_eq!(property_graphql_type(&PropertyMapping::default()), "JSON");
    }
}
