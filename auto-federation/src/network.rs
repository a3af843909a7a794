//! Requests to the origin service.
//!
//! Transport failures never escape [`Forwarder::graphql_request`]: they are turned into a GraphQL
//! error envelope so callers handle them like any other error response. [`forward`] and
//! [`ForwardClient::forward`] raise [`ResolverError::Remote`] for both.

use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use crate::error::ResolverError;
use crate::graphql;
use crate::graphql::Object;

const SUBREQUEST_HTTP_ERROR: &str = "SUBREQUEST_HTTP_ERROR";
const SUBREQUEST_MALFORMED_RESPONSE: &str = "SUBREQUEST_MALFORMED_RESPONSE";

/// Sends GraphQL requests over HTTP.
///
/// Cloning is cheap and shares the underlying connection pool. Timeouts, TLS and pooling are
/// configured on the [`reqwest::Client`] given to [`Forwarder::with_client`].
#[derive(Clone, Debug, Default)]
pub struct Forwarder {
    http_client: reqwest::Client,
}

impl Forwarder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// POSTs `request` to `url` and returns the GraphQL response, or an error envelope when the
    /// request could not be completed.
    pub async fn graphql_request(
        &self,
        url: &Url,
        headers: &HeaderMap,
        request: &graphql::Request,
    ) -> graphql::Response {
        tracing::debug!(%url, "making request to origin service");
        let mut headers = headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = match self
            .http_client
            .post(url.clone())
            .headers(headers)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%url, error = %err, "request to origin service failed");
                return graphql::Response::from_error(
                    graphql::Error::new(format!("HTTP fetch failed from '{url}': {err}"))
                        .with_extension_code(SUBREQUEST_HTTP_ERROR),
                );
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                return graphql::Response::from_error(
                    graphql::Error::new(format!("HTTP fetch failed from '{url}': {err}"))
                        .with_extension_code(SUBREQUEST_HTTP_ERROR),
                );
            }
        };
        tracing::trace!(%url, %status, body = %String::from_utf8_lossy(&body), "response from origin service");

        match serde_json::from_slice::<graphql::Response>(&body) {
            Ok(response) => response,
            Err(err) => {
                let message = if status.is_success() {
                    format!("response from '{url}' was malformed: {err}")
                } else {
                    format!("HTTP fetch failed from '{url}': {status}")
                };
                let code = if status.is_success() {
                    SUBREQUEST_MALFORMED_RESPONSE
                } else {
                    SUBREQUEST_HTTP_ERROR
                };
                graphql::Response::from_error(graphql::Error::new(message).with_extension_code(code))
            }
        }
    }

    /// Sends `request` and returns its `data`, failing with the response errors if there are any.
    pub async fn forward(&self, request: ForwardRequest) -> Result<Value, ResolverError> {
        let ForwardRequest {
            url,
            headers,
            query,
            variables,
        } = request;
        let request = graphql::Request { query, variables };
        let response = self.graphql_request(&url, &headers, &request).await;
        if response.has_errors() {
            return Err(ResolverError::Remote {
                errors: response.errors,
            });
        }
        Ok(response.data.unwrap_or(Value::Null))
    }

    /// Binds this forwarder to the origin at `url`.
    pub fn bind(&self, url: Url) -> ForwardClient {
        ForwardClient {
            forwarder: self.clone(),
            url,
        }
    }
}

/// An arbitrary query against the origin service, see [`forward`].
#[derive(Clone, Debug)]
pub struct ForwardRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub query: String,
    pub variables: Option<Object>,
}

impl ForwardRequest {
    pub fn new(url: Url, query: impl Into<String>) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_variables(mut self, variables: Object) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// Sends an arbitrary query to the origin service and returns the response `data`.
///
/// Meant for hand-written resolvers, typically `__resolveReference`, that need more from the
/// origin than the forwarded client query.
pub async fn forward(request: ForwardRequest) -> Result<Value, ResolverError> {
    Forwarder::new().forward(request).await
}

/// A [`Forwarder`] bound to one origin URL.
#[derive(Clone, Debug)]
pub struct ForwardClient {
    forwarder: Forwarder,
    url: Url,
}

impl ForwardClient {
    pub fn new(url: Url) -> Self {
        Forwarder::new().bind(url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn forward(
        &self,
        headers: HeaderMap,
        query: impl Into<String>,
        variables: Option<Object>,
    ) -> Result<Value, ResolverError> {
        self.forwarder
            .forward(ForwardRequest {
                url: self.url.clone(),
                headers,
                query: query.into(),
                variables,
            })
            .await
    }
}
