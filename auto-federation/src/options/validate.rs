use serde_json::Map;
use serde_json::Value;
use url::Url;

use super::FederationOptions;
use super::FieldOptions;
use super::TypeOptions;
use crate::error::ConfigurationError;
use crate::resolver::Resolvers;
use crate::schema::is_root_operation_type_name;

const EXTEND_KEY: &str = "@extend";
const DIRECTIVES_KEY: &str = "@directives";

pub(crate) fn validate_url(url: &str) -> Result<Url, ConfigurationError> {
    if url.is_empty() {
        return Err(ConfigurationError::MissingUrl);
    }
    let invalid = || ConfigurationError::InvalidUrl {
        url: url.to_owned(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Every field resolver of a type other than a root operation type overrides an entity, and
/// must therefore say how to materialize it. Meta resolvers such as `__resolveType` do not.
pub(super) fn validate_resolvers(resolvers: &Resolvers) -> Result<(), ConfigurationError> {
    match resolvers.type_names().find(|type_name| {
        !is_root_operation_type_name(type_name)
            && resolvers
                .field_names(type_name)
                .any(|field| !field.starts_with("__"))
            && !resolvers.has_reference_resolver(type_name)
    }) {
        Some(type_name) => Err(ConfigurationError::MissingReferenceResolver {
            type_name: type_name.to_owned(),
        }),
        None => Ok(()),
    }
}

pub(super) fn parse_options(value: &Value) -> Result<FederationOptions, ConfigurationError> {
    let object = value.as_object().ok_or(ConfigurationError::InvalidOptions)?;

    if let Some(key) = object
        .keys()
        .find(|key| !matches!(key.as_str(), "auto" | "type" | "resolvers"))
    {
        return Err(ConfigurationError::UnknownOption { key: key.clone() });
    }

    let auto = match object.get("auto") {
        None => false,
        Some(Value::Bool(auto)) => *auto,
        Some(_) => return Err(ConfigurationError::InvalidAuto),
    };

    let mut options = FederationOptions {
        auto,
        ..Default::default()
    };

    match object.get("type") {
        None | Some(Value::Null) => {}
        Some(Value::Object(types)) => {
            for (type_name, type_value) in types {
                let type_options = parse_type_options(type_name, type_value)?;
                options.types.insert(type_name.clone(), type_options);
            }
        }
        Some(_) => return Err(ConfigurationError::InvalidTypes),
    }

    match object.get("resolvers") {
        None | Some(Value::Null) => {}
        Some(Value::Object(resolvers)) => validate_resolver_entries(resolvers)?,
        Some(_) => return Err(ConfigurationError::InvalidResolvers),
    }

    Ok(options)
}

fn parse_type_options(type_name: &str, value: &Value) -> Result<TypeOptions, ConfigurationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ConfigurationError::InvalidTypeValue {
            type_name: type_name.to_owned(),
        })?;

    let mut options = TypeOptions::default();
    for (key, value) in object {
        match key.as_str() {
            EXTEND_KEY => {
                let extend = value
                    .as_bool()
                    .ok_or_else(|| ConfigurationError::InvalidTypeKeyValue {
                        type_name: type_name.to_owned(),
                        key: key.clone(),
                        expected: "boolean",
                    })?;
                options.extend = Some(extend);
            }
            DIRECTIVES_KEY => {
                let directives =
                    value
                        .as_str()
                        .ok_or_else(|| ConfigurationError::InvalidTypeKeyValue {
                            type_name: type_name.to_owned(),
                            key: key.clone(),
                            expected: "string",
                        })?;
                options.directives = Some(directives.to_owned());
            }
            _ if key.starts_with('@') => {
                return Err(ConfigurationError::UnknownTypeKey {
                    type_name: type_name.to_owned(),
                    key: key.clone(),
                });
            }
            field => {
                let field_options = parse_field_options(type_name, field, value)?;
                options.fields.insert(field.to_owned(), field_options);
            }
        }
    }
    Ok(options)
}

fn parse_field_options(
    type_name: &str,
    field: &str,
    value: &Value,
) -> Result<FieldOptions, ConfigurationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ConfigurationError::InvalidFieldValue {
            type_name: type_name.to_owned(),
            field: field.to_owned(),
        })?;

    let mut options = FieldOptions::default();
    for (key, value) in object {
        if key != DIRECTIVES_KEY {
            return Err(ConfigurationError::UnknownFieldKey {
                type_name: type_name.to_owned(),
                field: field.to_owned(),
                key: key.clone(),
            });
        }
        let directives =
            value
                .as_str()
                .ok_or_else(|| ConfigurationError::InvalidFieldDirectives {
                    type_name: type_name.to_owned(),
                    field: field.to_owned(),
                })?;
        options.directives = Some(directives.to_owned());
    }
    Ok(options)
}

fn validate_resolver_entries(resolvers: &Map<String, Value>) -> Result<(), ConfigurationError> {
    for (type_name, value) in resolvers {
        let fields = value
            .as_object()
            .ok_or_else(|| ConfigurationError::InvalidResolverValue {
                type_name: type_name.clone(),
            })?;
        if let Some(field) = fields.keys().next() {
            return Err(ConfigurationError::ResolverInConfiguration {
                type_name: type_name.clone(),
                field: field.clone(),
            });
        }
    }
    Ok(())
}
