//! SDL rendering of a schema tree.

use super::tree::SchemaTree;

/// Renders the tree as schema definition language.
///
/// Output order is scalars, then object types in insertion order, then the
/// `schema` block. Argument lists are only rendered on fields of the query
/// root type; an object field sharing a name with a query field gets none.
///
/// Callers outside the crate go through [`SchemaParser::to_sdl`], which
/// refuses to render until every scalar has a resolver.
///
/// [`SchemaParser::to_sdl`]: super::parser::SchemaParser::to_sdl
#[must_use]
pub(crate) fn render_sdl(tree: &SchemaTree) -> String {
    let mut lines: Vec<String> = tree
        .scalar_names()
        .map(|name| format!("scalar {name}"))
        .collect();

    for (type_name, fields) in &tree.types {
        let is_query = *type_name == tree.query;
        lines.push(format!("type {type_name} {{"));

        for (field_name, field_type) in fields {
            match tree.args.get(field_name).filter(|_| is_query) {
                Some(args) => {
                    let args = args
                        .iter()
                        .map(|arg| format!("{}:{}", arg.name, arg.ty))
                        .collect::<Vec<_>>()
                        .join(",");
                    lines.push(format!("{field_name}({args}) : {field_type}"));
                }
                None => lines.push(format!("\t {field_name} : {field_type}")),
            }
        }

        lines.push("}".to_string());
    }

    lines.push(format!("schema {{ query: {} }}", tree.query));
    lines.join("\n")
}
