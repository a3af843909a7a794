use indexmap::IndexMap;

use super::FederationOptions;
use super::TypeOptions;

/// Merges caller `overrides` on top of computed `defaults`.
///
/// Precedence, leaf by leaf:
/// - `@extend`: the override when present, else the default.
/// - `@directives` of a type: both are kept, override fragments first, then the default
///   fragments. This is how a computed `@key(...)` gets appended to caller directives.
/// - field entries: the override field wins as a whole.
/// - resolvers: the override resolver wins per (type, field).
///
/// `overrides` is only read; the result owns copies of everything it needs.
pub(crate) fn merge_options(
    defaults: FederationOptions,
    overrides: &FederationOptions,
) -> FederationOptions {
    let FederationOptions {
        auto,
        types: mut default_types,
        resolvers,
    } = defaults;

    // caller order first, then the types only the defaults know about
    let mut types = IndexMap::with_capacity(default_types.len() + overrides.types.len());
    for (type_name, type_overrides) in &overrides.types {
        let merged = match default_types.shift_remove(type_name) {
            Some(type_defaults) => merge_type_options(type_defaults, type_overrides),
            None => type_overrides.clone(),
        };
        types.insert(type_name.clone(), merged);
    }
    types.extend(default_types);

    FederationOptions {
        auto: auto || overrides.auto,
        types,
        resolvers: resolvers.merge(&overrides.resolvers),
    }
}

fn merge_type_options(defaults: TypeOptions, overrides: &TypeOptions) -> TypeOptions {
    let mut fields = defaults.fields;
    for (field, field_overrides) in &overrides.fields {
        fields.insert(field.clone(), field_overrides.clone());
    }
    TypeOptions {
        extend: overrides.extend.or(defaults.extend),
        directives: concat_directives(overrides.directives.as_deref(), defaults.directives),
        fields,
    }
}

fn concat_directives(first: Option<&str>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(first), Some(second)) => Some(format!("{first} {second}")),
        (Some(first), None) => Some(first.to_owned()),
        (None, second) => second,
    }
}
