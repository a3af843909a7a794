use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::ObjectType;
use apollo_compiler::Schema;

use super::merge_options;
use super::FederationOptions;
use crate::key::infer_key;
use crate::resolver::ReferenceStub;
use crate::resolver::Resolvers;
use crate::resolver::REFERENCE_RESOLVER;
use crate::schema::is_root_operation_type_name;

const EXTENDS_DIRECTIVE: &str = "@extends";
const KEY_DIRECTIVE: &str = "@key";
const EXTENDS_DIRECTIVE_NAME: &str = "extends";
const KEY_DIRECTIVE_NAME: &str = "key";

/// Computes the options that federate a non-federated schema, merged with the caller's.
///
/// - root operation types are marked `extend`, unless the caller already said whether they
///   extend (`@extend` or an `@extends` directive);
/// - entity types get an inferred `@key` directive unless one is declared, and a placeholder
///   `__resolveReference` unless the caller provides one, either in `options` or in `resolvers`.
///
/// Only gaps are filled: whatever the caller set is kept as is.
pub(crate) fn auto_options(
    schema: &Schema,
    options: &FederationOptions,
    resolvers: &Resolvers,
) -> FederationOptions {
    let mut defaults = FederationOptions::auto();

    for (type_name, ty) in &schema.types {
        if ty.is_built_in() {
            continue;
        }
        if is_root_operation_type_name(type_name) {
            if !is_extend_defined(type_name, ty, options) {
                defaults.type_mut(type_name).extend = Some(true);
            }
        } else if let Some(object) = as_entity_type(ty) {
            if !is_key_defined(type_name, ty, options) {
                if let Some(key) = infer_key(object, schema) {
                    defaults.type_mut(type_name).directives =
                        Some(format!(r#"@key(fields: "{key}")"#));
                }
            }
            if !options.resolvers.has_reference_resolver(type_name)
                && !resolvers.has_reference_resolver(type_name)
            {
                defaults.resolvers.insert(
                    type_name.as_str(),
                    REFERENCE_RESOLVER,
                    ReferenceStub::new(type_name.as_str()),
                );
            }
        }
    }

    tracing::debug!(
        types = defaults.types.len(),
        reference_stubs = defaults.resolvers.type_names().count(),
        "synthesized federation options"
    );
    merge_options(defaults, options)
}

/// An object type that is neither a root operation type nor an introspection type, with fields.
fn as_entity_type(ty: &ExtendedType) -> Option<&ObjectType> {
    match ty {
        ExtendedType::Object(object)
            if !object.name.starts_with("__")
                && !is_root_operation_type_name(&object.name)
                && !object.fields.is_empty() =>
        {
            Some(object)
        }
        _ => None,
    }
}

fn is_extend_defined(type_name: &str, ty: &ExtendedType, options: &FederationOptions) -> bool {
    ty.directives().has(EXTENDS_DIRECTIVE_NAME)
        || options.types.get(type_name).is_some_and(|type_options| {
            type_options.extend.is_some() || type_options.has_directive(EXTENDS_DIRECTIVE)
        })
}

fn is_key_defined(type_name: &str, ty: &ExtendedType, options: &FederationOptions) -> bool {
    ty.directives().has(KEY_DIRECTIVE_NAME)
        || options
            .types
            .get(type_name)
            .is_some_and(|type_options| type_options.has_directive(KEY_DIRECTIVE))
}
