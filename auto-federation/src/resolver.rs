//! Field resolvers handed to the hosting GraphQL engine.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use apollo_compiler::Schema;
use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

use crate::error::ResolverError;
use crate::graphql::Object;
use crate::graphql::Request;
use crate::network::Forwarder;

/// Field key under which a type's reference resolver is registered.
pub const REFERENCE_RESOLVER: &str = "__resolveReference";

/// Everything the hosting engine knows about one field execution.
#[derive(Clone, Debug, Default)]
pub struct ResolverContext {
    /// The parent value, or the entity representation for a reference resolver.
    pub parent: Value,
    /// The field arguments.
    pub arguments: Object,
    /// The text of the client operation being executed.
    pub query: String,
    /// The variable values of the client operation.
    pub variables: Object,
    /// The headers of the client request.
    pub headers: HeaderMap,
}

impl ResolverContext {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, variables: Object) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_parent(mut self, parent: Value) -> Self {
        self.parent = parent;
        self
    }
}

/// Resolves one field, or materializes an entity for a reference resolver.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    async fn resolve(&self, context: ResolverContext) -> Result<Value, ResolverError>;
}

#[async_trait]
impl<F, Fut> Resolver for F
where
    F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
{
    async fn resolve(&self, context: ResolverContext) -> Result<Value, ResolverError> {
        (self)(context).await
    }
}

/// Resolver table: type name, then field name (or [`REFERENCE_RESOLVER`]), to resolver.
///
/// Cloning copies the table structure. Resolvers themselves are immutable and shared.
#[derive(Clone, Default)]
pub struct Resolvers {
    types: IndexMap<String, IndexMap<String, Arc<dyn Resolver>>>,
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resolver` for `type_name.field`, replacing any previous one.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        resolver: impl Resolver,
    ) -> &mut Self {
        self.insert_shared(type_name, field, Arc::new(resolver))
    }

    pub fn insert_shared(
        &mut self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        resolver: Arc<dyn Resolver>,
    ) -> &mut Self {
        self.types
            .entry(type_name.into())
            .or_default()
            .insert(field.into(), resolver);
        self
    }

    /// Builder flavour of [`Resolvers::insert`].
    pub fn with(
        mut self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        resolver: impl Resolver,
    ) -> Self {
        self.insert(type_name, field, resolver);
        self
    }

    pub fn get(&self, type_name: &str, field: &str) -> Option<&Arc<dyn Resolver>> {
        self.types.get(type_name)?.get(field)
    }

    pub fn contains(&self, type_name: &str, field: &str) -> bool {
        self.get(type_name, field).is_some()
    }

    pub fn has_reference_resolver(&self, type_name: &str) -> bool {
        self.contains(type_name, REFERENCE_RESOLVER)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type names with at least one resolver, in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Field names registered for `type_name`, in registration order.
    pub fn field_names<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a str> {
        self.types
            .get(type_name)
            .into_iter()
            .flat_map(|fields| fields.keys().map(String::as_str))
    }

    /// Returns a table where the resolvers of `overrides` replace those of `self` field by field.
    pub fn merge(mut self, overrides: &Resolvers) -> Self {
        for (type_name, fields) in &overrides.types {
            let target = self.types.entry(type_name.clone()).or_default();
            for (field, resolver) in fields {
                target.insert(field.clone(), resolver.clone());
            }
        }
        self
    }

    /// Runs the resolver registered for `type_name.field`, if there is one.
    pub async fn resolve(
        &self,
        type_name: &str,
        field: &str,
        context: ResolverContext,
    ) -> Option<Result<Value, ResolverError>> {
        let resolver = self.get(type_name, field)?.clone();
        Some(resolver.resolve(context).await)
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.types
                    .iter()
                    .map(|(type_name, fields)| (type_name, fields.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

/// Placeholder reference resolver, registered so the federated schema loads.
///
/// It cannot materialize anything: callers are expected to provide their own
/// `__resolveReference`, typically built on [`forward`](crate::forward).
pub(crate) struct ReferenceStub {
    type_name: String,
}

impl ReferenceStub {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

#[async_trait]
impl Resolver for ReferenceStub {
    async fn resolve(&self, context: ResolverContext) -> Result<Value, ResolverError> {
        tracing::warn!(
            type_name = %self.type_name,
            representation = %context.parent,
            "__resolveReference called"
        );
        Ok(Value::Null)
    }
}

/// Forwards a root field to the origin service.
///
/// The client operation text and its variables are sent unchanged; the field's own entry is
/// picked out of the response data.
pub(crate) struct ProxyResolver {
    forwarder: Forwarder,
    url: Arc<Url>,
    field: String,
}

#[async_trait]
impl Resolver for ProxyResolver {
    async fn resolve(&self, context: ResolverContext) -> Result<Value, ResolverError> {
        let request = Request::new(context.query).with_variables(context.variables);
        let response = self
            .forwarder
            .graphql_request(&self.url, &HeaderMap::new(), &request)
            .await;

        if response.has_errors() {
            return Err(ResolverError::Remote {
                errors: response.errors,
            });
        }

        Ok(response
            .data
            .and_then(|mut data| data.get_mut(&self.field).map(Value::take))
            .unwrap_or(Value::Null))
    }
}

/// Adds a [`ProxyResolver`] for every query and mutation root field that `resolvers` does not
/// already cover.
pub(crate) fn build_proxy_resolvers(
    forwarder: &Forwarder,
    url: &Url,
    schema: &Schema,
    mut resolvers: Resolvers,
) -> Resolvers {
    let url = Arc::new(url.clone());
    let roots = [
        schema.schema_definition.query.as_ref(),
        schema.schema_definition.mutation.as_ref(),
    ];
    for root in roots.into_iter().flatten() {
        let Some(object) = schema.get_object(&root.name) else {
            continue;
        };
        for field in object.fields.keys() {
            if resolvers.contains(root.name.as_str(), field.as_str()) {
                continue;
            }
            tracing::debug!(type_name = %root.name, field = %field, "proxying root field");
            resolvers.insert(
                root.name.as_str(),
                field.as_str(),
                ProxyResolver {
                    forwarder: forwarder.clone(),
                    url: url.clone(),
                    field: field.to_string(),
                },
            );
        }
    }
    resolvers
}
