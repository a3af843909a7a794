//! Federation errors.
use apollo_compiler::validation::WithErrors;
use apollo_compiler::Schema;
use displaydoc::Display;
use itertools::Itertools;
use thiserror::Error;

use crate::graphql;

/// Malformed caller configuration.
///
/// Raised before any network call is attempted; every variant names the offending path.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// url is required
    MissingUrl,

    /// url must be valid: '{url}'
    InvalidUrl { url: String },

    /// options must be an object
    InvalidOptions,

    /// options '{key}' is not a recognized key, one of 'auto', 'type', 'resolvers'
    UnknownOption { key: String },

    /// options auto must be a boolean
    InvalidAuto,

    /// options type must be an object
    InvalidTypes,

    /// options type '{type_name}' value must be an object
    InvalidTypeValue { type_name: String },

    /// options type '{type_name}' key '{key}' is not valid, one of '@extend', '@directives'
    UnknownTypeKey { type_name: String, key: String },

    /// options type '{type_name}' value '{key}' must be a {expected}
    InvalidTypeKeyValue {
        type_name: String,
        key: String,
        expected: &'static str,
    },

    /// options type '{type_name}' field '{field}' value must be an object
    InvalidFieldValue { type_name: String, field: String },

    /// options type '{type_name}' field '{field}' value must contain only '@directives', found '{key}'
    UnknownFieldKey {
        type_name: String,
        field: String,
        key: String,
    },

    /// options type '{type_name}' field '{field}' value '@directives' must be a string
    InvalidFieldDirectives { type_name: String, field: String },

    /// options resolvers must be an object
    InvalidResolvers,

    /// options resolvers '{type_name}' value must be an object
    InvalidResolverValue { type_name: String },

    /// options resolvers '{type_name}' field '{field}' must be registered programmatically
    ResolverInConfiguration { type_name: String, field: String },

    /// options resolvers '{type_name}' must define __resolveReference
    MissingReferenceResolver { type_name: String },
}

/// Error returned while synthesizing a federated service.
#[derive(Error, Display, Debug, Clone)]
#[non_exhaustive]
pub enum FederationError {
    /// buildFederatedService: {0}
    Configuration(#[from] ConfigurationError),

    /// invalid schema: {message}
    InvalidSchema { message: String },

    /// introspection of '{url}' failed: {message}
    Introspection {
        url: String,
        message: String,
        /// The GraphQL error envelope returned by the request.
        errors: Vec<graphql::Error>,
    },
}

impl FederationError {
    pub(crate) fn introspection(url: &str, errors: Vec<graphql::Error>) -> Self {
        let message = if errors.is_empty() {
            "response has no data".to_owned()
        } else {
            errors.iter().map(|error| &error.message).join(", ")
        };
        FederationError::Introspection {
            url: url.to_owned(),
            message,
            errors,
        }
    }
}

impl From<WithErrors<Schema>> for FederationError {
    fn from(value: WithErrors<Schema>) -> Self {
        FederationError::InvalidSchema {
            message: value.errors.to_string(),
        }
    }
}

/// Error produced by a [`Resolver`](crate::Resolver) while a field is being executed.
#[derive(Error, Display, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ResolverError {
    /// Error on query
    Remote {
        /// The errors returned by the origin service, unchanged.
        errors: Vec<graphql::Error>,
    },

    /// {message}
    Custom { message: String },
}

impl ResolverError {
    pub fn custom(message: impl Into<String>) -> Self {
        ResolverError::Custom {
            message: message.into(),
        }
    }

    /// The errors reported by the origin service, if any.
    pub fn errors(&self) -> &[graphql::Error] {
        match self {
            ResolverError::Remote { errors } => errors,
            ResolverError::Custom { .. } => &[],
        }
    }

    /// Convert the resolver error to a GraphQL error.
    ///
    /// Remote errors keep the origin's error list under `extensions.errors` so the hosting
    /// engine reports them next to the failed field.
    pub fn to_graphql_error(&self) -> graphql::Error {
        let mut error = graphql::Error::new(self.to_string());
        if let ResolverError::Remote { errors } = self {
            error.extensions.insert(
                "errors".to_owned(),
                serde_json::to_value(errors).unwrap_or_default(),
            );
        }
        error
    }
}
