//! Federation options: which types are extended, which directives are added, and which
//! resolvers are provided by the caller.
//!
//! The same shape is used for caller overrides and for the defaults computed by auto synthesis.
//! In JSON form it reads:
//!
//! ```json
//! {
//!   "auto": true,
//!   "type": {
//!     "Query": { "@extend": true },
//!     "User": { "@directives": "@key(fields: \"id\")", "name": { "@directives": "@external" } }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigurationError;
use crate::resolver::Resolvers;

mod auto;
mod merge;
mod validate;

pub(crate) use auto::auto_options;
pub(crate) use merge::merge_options;
pub(crate) use validate::validate_url;

#[derive(Clone, Debug, Default)]
pub struct FederationOptions {
    /// Infer `@extend`, `@key` and reference resolvers for the types the caller left alone.
    pub auto: bool,
    /// Per type overrides, keyed by type name.
    pub types: IndexMap<String, TypeOptions>,
    /// Caller resolvers, merged over the synthesized ones.
    pub resolvers: Resolvers,
}

impl FederationOptions {
    /// Options with auto synthesis enabled and no overrides.
    pub fn auto() -> Self {
        Self {
            auto: true,
            ..Default::default()
        }
    }

    /// Validates untyped configuration and turns it into options.
    ///
    /// Resolvers cannot be expressed as data; attach them with [`FederationOptions::with_resolvers`].
    pub fn from_json(value: &Value) -> Result<Self, ConfigurationError> {
        validate::parse_options(value)
    }

    pub fn with_resolvers(mut self, resolvers: Resolvers) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>, options: TypeOptions) -> Self {
        self.types.insert(type_name.into(), options);
        self
    }

    /// Options of `type_name`, created empty if needed.
    pub(crate) fn type_mut(&mut self, type_name: &str) -> &mut TypeOptions {
        self.types.entry(type_name.to_owned()).or_default()
    }

    /// Checks the parts of the options that the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate::validate_resolvers(&self.resolvers)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TypeOptions {
    /// Declare the type with `extend`.
    #[serde(rename = "@extend", skip_serializing_if = "Option::is_none")]
    pub extend: Option<bool>,
    /// Directives appended to the type declaration, as SDL text.
    #[serde(rename = "@directives", skip_serializing_if = "Option::is_none")]
    pub directives: Option<String>,
    /// Per field overrides, keyed by field name.
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldOptions>,
}

impl TypeOptions {
    pub fn extended() -> Self {
        Self {
            extend: Some(true),
            ..Default::default()
        }
    }

    pub fn with_directives(directives: impl Into<String>) -> Self {
        Self {
            directives: Some(directives.into()),
            ..Default::default()
        }
    }

    pub fn field(mut self, field: impl Into<String>, directives: impl Into<String>) -> Self {
        self.fields.insert(
            field.into(),
            FieldOptions {
                directives: Some(directives.into()),
            },
        );
        self
    }

    pub(crate) fn has_directive(&self, directive: &str) -> bool {
        self.directives
            .as_deref()
            .is_some_and(|directives| directives.contains(directive))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    /// Directives appended to the field, as SDL text.
    #[serde(rename = "@directives", skip_serializing_if = "Option::is_none")]
    pub directives: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_options_serialize_to_the_configuration_shape() {
        let options = TypeOptions::with_directives(r#"@key(fields: "id") @extends"#)
            .field("id", "@external")
            .field("numberOfPosts", r#"@requires(fields: "id name")"#);
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "@directives": "@key(fields: \"id\") @extends",
                "id": { "@directives": "@external" },
                "numberOfPosts": { "@directives": "@requires(fields: \"id name\")" }
            })
        );
        assert_eq!(
            serde_json::to_value(TypeOptions::extended()).unwrap(),
            json!({ "@extend": true })
        );
    }

    #[test]
    fn has_directive_looks_into_the_directive_text() {
        let options = TypeOptions::with_directives("@extends @key(fields: \"id\")");
        assert!(options.has_directive("@key"));
        assert!(options.has_directive("@extends"));
        assert!(!TypeOptions::extended().has_directive("@key"));
    }
}
