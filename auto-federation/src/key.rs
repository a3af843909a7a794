use apollo_compiler::collections::IndexSet;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::ObjectType;
use apollo_compiler::Name;
use apollo_compiler::Schema;

const ID_SCALAR_NAME: &str = "ID";

/// Infers the `@key(fields:)` selection of an entity type.
///
/// Looks, in order, for:
/// - the first field of type `ID`,
/// - the first non-list field of scalar type, or of object type in which case the key of that
///   object is inferred recursively and nested as `field { key }`,
/// - the first declared field, whatever its type.
///
/// Object types already being walked are not entered again, so self-referencing and mutually
/// referencing types always produce a key.
pub(crate) fn infer_key(object: &ObjectType, schema: &Schema) -> Option<String> {
    let mut path = IndexSet::default();
    key_of(object, schema, &mut path)
}

fn key_of(object: &ObjectType, schema: &Schema, path: &mut IndexSet<Name>) -> Option<String> {
    let (first_field, _) = object.fields.first()?;

    if let Some((name, _)) = object
        .fields
        .iter()
        .find(|(_, field)| field.ty.inner_named_type().as_str() == ID_SCALAR_NAME)
    {
        return Some(name.to_string());
    }

    path.insert(object.name.clone());
    for (name, field) in object.fields.iter().filter(|(_, field)| !field.ty.is_list()) {
        let field_type_name = field.ty.inner_named_type();
        match schema.types.get(field_type_name) {
            Some(ExtendedType::Scalar(_)) => {
                path.shift_remove(&object.name);
                return Some(name.to_string());
            }
            Some(ExtendedType::Object(nested)) if !path.contains(field_type_name) => {
                if let Some(nested_key) = key_of(nested, schema, path) {
                    path.shift_remove(&object.name);
                    return Some(format!("{name} {{ {nested_key} }}"));
                }
            }
            _ => {}
        }
    }
    path.shift_remove(&object.name);

    Some(first_field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(sdl: &str, type_name: &str) -> Option<String> {
        let schema = Schema::parse(sdl, "schema.graphql").unwrap();
        let object = schema.get_object(type_name).unwrap();
        infer_key(object, &schema)
    }

    #[test]
    fn prefers_first_id_field() {
        let sdl = r#"
            type User { name: String! email: String id: ID! uuid: ID! }
        "#;
        assert_eq!(key(sdl, "User").as_deref(), Some("id"));
    }

    #[test]
    fn falls_back_to_first_scalar_field() {
        let sdl = r#"
            type Post { tags: [String] title: String! body: String }
        "#;
        assert_eq!(key(sdl, "Post").as_deref(), Some("title"));
    }

    #[test]
    fn nests_the_key_of_an_object_field() {
        let sdl = r#"
            type Review { author: User rating: Int }
            type User { id: ID! name: String }
        "#;
        assert_eq!(key(sdl, "Review").as_deref(), Some("author { id }"));
    }

    #[test]
    fn nests_keys_recursively() {
        let sdl = r#"
            type A { b: B }
            type B { c: C }
            type C { code: String }
        "#;
        assert_eq!(key(sdl, "A").as_deref(), Some("b { c { code } }"));
    }

    #[test]
    fn skips_list_and_enum_fields() {
        let sdl = r#"
            type Order { lines: [Line] status: Status total: Float }
            type Line { sku: String }
            enum Status { OPEN CLOSED }
        "#;
        assert_eq!(key(sdl, "Order").as_deref(), Some("total"));
    }

    #[test]
    fn falls_back_to_first_field_when_nothing_matches() {
        let sdl = r#"
            type Bag { items: [Item] kind: Kind }
            type Item { id: ID! }
            enum Kind { SMALL }
        "#;
        assert_eq!(key(sdl, "Bag").as_deref(), Some("items"));
    }

    #[test]
    fn terminates_on_self_referencing_types() {
        let sdl = r#"
            type Node { parent: Node children: [Node] }
        "#;
        assert_eq!(key(sdl, "Node").as_deref(), Some("parent"));
    }

    #[test]
    fn terminates_on_mutually_referencing_types() {
        let sdl = r#"
            type Left { right: Right }
            type Right { left: Left label: String }
        "#;
        assert_eq!(key(sdl, "Left").as_deref(), Some("right { label }"));

        let sdl = r#"
            type Left { right: Right }
            type Right { left: Left }
        "#;
        assert_eq!(key(sdl, "Left").as_deref(), Some("right { left }"));
    }
}
