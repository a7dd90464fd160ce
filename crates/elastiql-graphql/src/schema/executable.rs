//! Executable schema construction.
//!
//! Turns rendered SDL plus a [`ResolverMap`] into an async-graphql dynamic
//! schema. Query-root fields dispatch to their [`DocumentResolver`]; every
//! other field reads the property of the same name (or its pre-normalization
//! source key) from the parent document.
//!
//! [`DocumentResolver`]: crate::resolvers::DocumentResolver

use async_graphql::Value;
use async_graphql::dynamic::{
    Field, FieldFuture, InputValue, Object, ResolverContext, Scalar, Schema, TypeRef,
};
use async_graphql_parser::parse_schema;
use async_graphql_parser::types::{
    BaseType, FieldDefinition, ServiceDocument, Type, TypeKind, TypeSystemDefinition,
};
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::SchemaBuilderConfig;
use super::tree::{QUERY_TYPE, ResolverMap};
use crate::error::GraphQLError;
use crate::resolvers::{DocumentResolver, graphql_to_json_value, json_to_graphql_value};
use crate::types::ScalarResolver;

/// Builds an executable schema from SDL and resolvers.
///
/// # Errors
///
/// Returns `GraphQLError::SchemaBuildFailed` if the SDL does not parse, a
/// declared scalar has no resolver, or the resulting schema is invalid (for
/// example an object type without fields or a reference to an unknown type).
pub fn make_executable_schema(
    type_defs: &str,
    resolvers: &ResolverMap,
    config: &SchemaBuilderConfig,
) -> Result<Schema, GraphQLError> {
    let document =
        parse_schema(type_defs).map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;
    let definitions = collect_definitions(document);

    let mut builder = Schema::build(definitions.query.as_str(), None, None);

    for name in &definitions.scalars {
        let resolver = resolvers.scalars.get(name).cloned().ok_or_else(|| {
            GraphQLError::SchemaBuildFailed(format!("Scalar '{name}' has no resolver"))
        })?;
        builder = builder.register(build_scalar(name, resolver));
        trace!(scalar = %name, "Registered scalar");
    }

    for (type_name, fields) in &definitions.objects {
        let is_query = *type_name == definitions.query;
        let mut object = Object::new(type_name.as_str());

        for field in fields {
            object = object.field(build_field(type_name, field, is_query, resolvers));
        }

        builder = builder.register(object);
        trace!(type_name = %type_name, fields = fields.len(), "Registered object type");
    }

    let mut builder = builder
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity);

    if !config.introspection_enabled {
        builder = builder.disable_introspection();
    }

    let schema = builder
        .finish()
        .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

    debug!(
        query = %definitions.query,
        types = definitions.objects.len(),
        scalars = definitions.scalars.len(),
        "Executable schema ready"
    );
    Ok(schema)
}

/// Type system definitions extracted from a parsed document.
struct Definitions {
    query: String,
    scalars: Vec<String>,
    objects: IndexMap<String, Vec<FieldDefinition>>,
}

fn collect_definitions(document: ServiceDocument) -> Definitions {
    let mut definitions = Definitions {
        query: QUERY_TYPE.to_string(),
        scalars: Vec::new(),
        objects: IndexMap::new(),
    };

    for definition in document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => {
                if let Some(query) = schema.node.query {
                    definitions.query = query.node.to_string();
                }
            }
            TypeSystemDefinition::Type(ty) => {
                let ty = ty.node;
                let name = ty.name.node.to_string();
                match ty.kind {
                    TypeKind::Scalar => definitions.scalars.push(name),
                    TypeKind::Object(object) => {
                        let fields = object.fields.into_iter().map(|f| f.node).collect();
                        definitions.objects.insert(name, fields);
                    }
                    _ => {}
                }
            }
            TypeSystemDefinition::Directive(_) => {}
        }
    }

    definitions
}

fn build_scalar(name: &str, resolver: ScalarResolver) -> Scalar {
    let mut scalar = Scalar::new(name);
    if let Some(description) = resolver.description() {
        scalar = scalar.description(description);
    }
    scalar.validator(move |value| resolver.parse_literal(value).is_ok())
}

/// Converts a parsed type reference to a dynamic schema type reference.
fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string().into()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

/// Name of the innermost named type of `ty`.
fn base_type_name(ty: &Type) -> &str {
    match &ty.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => base_type_name(inner),
    }
}

fn build_field(
    type_name: &str,
    field: &FieldDefinition,
    is_query: bool,
    resolvers: &ResolverMap,
) -> Field {
    let field_name = field.name.node.as_str();
    let ty = type_ref(&field.ty.node);

    match resolvers.query.get(field_name).filter(|_| is_query) {
        Some(resolver) => {
            let mut arg_scalars = IndexMap::new();
            let mut arguments = Vec::with_capacity(field.arguments.len());
            for argument in &field.arguments {
                let argument = &argument.node;
                let arg_type = base_type_name(&argument.ty.node);
                if let Some(scalar) = resolvers.scalars.get(arg_type) {
                    arg_scalars.insert(argument.name.node.to_string(), scalar.clone());
                }
                arguments.push(InputValue::new(
                    argument.name.node.as_str(),
                    type_ref(&argument.ty.node),
                ));
            }

            arguments.into_iter().fold(
                Field::new(field_name, ty, query_resolver(resolver.clone(), arg_scalars)),
                Field::argument,
            )
        }
        None => {
            let source_key = resolvers.source_key(type_name, field_name).to_string();
            let scalar = resolvers.scalars.get(base_type_name(&field.ty.node)).cloned();
            Field::new(field_name, ty, move |ctx| {
                let source_key = source_key.clone();
                let scalar = scalar.clone();
                FieldFuture::new(async move {
                    let Some(Value::Object(parent)) = ctx.parent_value.as_value() else {
                        return Ok(None);
                    };
                    let value = match parent.get(source_key.as_str()) {
                        Some(Value::Null) | None => return Ok(None),
                        Some(value) => value,
                    };
                    match scalar {
                        Some(scalar) => serialize_output(&scalar, value)
                            .map(Some)
                            .map_err(async_graphql::Error::new),
                        None => Ok(Some(value.clone())),
                    }
                })
            })
        }
    }
}

fn query_resolver(
    resolver: DocumentResolver,
    arg_scalars: IndexMap<String, ScalarResolver>,
) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
    move |ctx| {
        let resolver = resolver.clone();
        let arg_scalars = arg_scalars.clone();
        FieldFuture::new(async move {
            let mut args = serde_json::Map::new();
            for (name, value) in ctx.args.iter() {
                let mut value = value.as_value().clone();
                if let Some(scalar) = arg_scalars.get(name.as_str()) {
                    if !matches!(value, Value::Null) {
                        value = scalar
                            .parse_value(&value)
                            .map_err(async_graphql::Error::new)?;
                    }
                }
                args.insert(name.to_string(), graphql_to_json_value(value));
            }

            let result = resolver
                .resolve(&args)
                .await
                .map_err(GraphQLError::into_graphql_error)?;
            Ok(Some(json_to_graphql_value(result)))
        })
    }
}

/// Applies a scalar's serializer to a value, element-wise for lists.
fn serialize_output(scalar: &ScalarResolver, value: &Value) -> Result<Value, String> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| serialize_output(scalar, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        other => scalar.serialize(other),
    }
}
