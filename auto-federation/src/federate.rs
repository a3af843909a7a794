use apollo_compiler::Schema;
use reqwest::header::HeaderMap;

use crate::error::FederationError;
use crate::graphql;
use crate::introspection;
use crate::introspection::INTROSPECTION_QUERY;
use crate::network::Forwarder;
use crate::options::auto_options;
use crate::options::validate_url;
use crate::options::FederationOptions;
use crate::resolver::build_proxy_resolvers;
use crate::resolver::Resolvers;
use crate::schema::extract_types;
use crate::sdl::render_sdl;

/// A schema to federate: SDL text, or a schema that is already parsed.
#[derive(Debug, Clone)]
pub enum ServiceSchema {
    Sdl(String),
    Parsed(Schema),
}

impl From<String> for ServiceSchema {
    fn from(sdl: String) -> Self {
        ServiceSchema::Sdl(sdl)
    }
}

impl From<&str> for ServiceSchema {
    fn from(sdl: &str) -> Self {
        ServiceSchema::Sdl(sdl.to_owned())
    }
}

impl From<Schema> for ServiceSchema {
    fn from(schema: Schema) -> Self {
        ServiceSchema::Parsed(schema)
    }
}

/// The result of federating a service.
#[derive(Debug, Clone)]
pub struct FederatedService {
    /// The federated SDL, to be served by the hosting subgraph.
    pub schema: String,
    /// The resolvers to register next to [`FederatedService::schema`].
    pub resolvers: Resolvers,
    /// The options the SDL was rendered with, defaults and caller overrides merged.
    pub options: FederationOptions,
}

/// Federates a schema that is already at hand. No network access happens here.
///
/// With `options.auto`, missing `extend` markers, `@key` directives and reference resolvers are
/// synthesized; otherwise `options` are used as given. The returned resolvers are `resolvers`
/// overridden by the resolvers of the effective options.
pub fn build_federated_info(
    schema: impl Into<ServiceSchema>,
    resolvers: Resolvers,
    options: &FederationOptions,
) -> Result<FederatedService, FederationError> {
    let schema = match schema.into() {
        ServiceSchema::Sdl(sdl) => Schema::parse(sdl, "schema.graphql")?,
        ServiceSchema::Parsed(schema) => schema,
    };
    federate(&schema, resolvers, options)
}

fn federate(
    schema: &Schema,
    resolvers: Resolvers,
    options: &FederationOptions,
) -> Result<FederatedService, FederationError> {
    options.validate()?;

    let types = extract_types(schema);
    let options = if options.auto {
        auto_options(schema, options, &resolvers)
    } else {
        options.clone()
    };
    let sdl = render_sdl(&types, &options);
    let resolvers = resolvers.merge(&options.resolvers);

    tracing::debug!(
        types = types.len(),
        fields = types.iter().map(|ty| ty.body.fields().len()).sum::<usize>(),
        resolver_types = resolvers.type_names().count(),
        auto = options.auto,
        "federated schema rendered"
    );
    Ok(FederatedService {
        schema: sdl,
        resolvers,
        options,
    })
}

/// Federates the service running at `url`.
///
/// The schema is read through introspection, then federated as [`build_federated_info`] does.
/// Every query and mutation field without a caller resolver is proxied to `url`. Without
/// `options`, auto synthesis is enabled.
pub async fn build_federated_service(
    url: &str,
    options: Option<FederationOptions>,
) -> Result<FederatedService, FederationError> {
    build_federated_service_with(&Forwarder::new(), url, options).await
}

/// [`build_federated_service`] with a caller provided [`Forwarder`], used both for introspection
/// and by the proxy resolvers.
pub async fn build_federated_service_with(
    forwarder: &Forwarder,
    url: &str,
    options: Option<FederationOptions>,
) -> Result<FederatedService, FederationError> {
    let url = validate_url(url)?;
    let options = options.unwrap_or_else(FederationOptions::auto);
    options.validate()?;

    tracing::debug!(%url, "introspecting origin service");
    let response = forwarder
        .graphql_request(
            &url,
            &HeaderMap::new(),
            &graphql::Request::new(INTROSPECTION_QUERY),
        )
        .await;
    let data = match response {
        graphql::Response {
            data: Some(data),
            errors,
        } if errors.is_empty() => data,
        response => {
            return Err(FederationError::introspection(
                url.as_str(),
                response.errors,
            ))
        }
    };

    let schema = introspection::build_schema(&data)?;
    let federated = federate(&schema, Resolvers::new(), &options)?;
    let resolvers = build_proxy_resolvers(forwarder, &url, &schema, federated.resolvers);
    Ok(FederatedService {
        resolvers,
        ..federated
    })
}
