//! Custom scalar types for GraphQL.
//!
//! Every derived schema starts with two scalars:
//!
//! - `Date`: store `date` fields
//! - `JSON`: query arguments (`search`, `id`) and untyped properties
//!
//! Additional scalars implement [`CustomScalar`] and are registered through
//! the schema builder.

mod scalars;

pub use scalars::{
    CustomScalar, DATE_SCALAR, DateScalar, JSON_SCALAR, JsonScalar, ScalarResolver, default_scalars,
};
