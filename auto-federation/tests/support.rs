//! A mocked origin service and builders for its introspection result.

use auto_federation::graphql::Object;
use auto_federation::introspection::INTROSPECTION_QUERY;
use serde_json::json;
use serde_json::Value;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

pub(crate) const GRAPHQL_PATH: &str = "/graphql";

pub(crate) fn url(server: &MockServer) -> String {
    format!("{}{GRAPHQL_PATH}", server.uri())
}

/// Starts an origin service answering the introspection query with `types`.
pub(crate) async fn origin(types: Vec<Value>) -> MockServer {
    let server = MockServer::start().await;
    mock_introspection(&server, introspection(types)).await;
    server
}

pub(crate) async fn mock_introspection(server: &MockServer, data: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "query": INTROSPECTION_QUERY })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Answers requests carrying `query` with `response`.
pub(crate) async fn mock_query(server: &MockServer, query: &str, response: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "query": query })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

pub(crate) fn object(value: Value) -> Object {
    match value {
        Value::Object(object) => object,
        other => panic!("expected an object, got {other}"),
    }
}

pub(crate) fn introspection(types: Vec<Value>) -> Value {
    let has_mutation = types.iter().any(|ty| ty["name"] == "Mutation");
    let mut all_types = types;
    all_types.extend(
        ["String", "ID", "Int", "Boolean"]
            .into_iter()
            .map(|name| json!({ "kind": "SCALAR", "name": name, "description": null })),
    );
    json!({
        "__schema": {
            "queryType": { "name": "Query" },
            "mutationType": if has_mutation { json!({ "name": "Mutation" }) } else { Value::Null },
            "subscriptionType": null,
            "types": all_types,
            "directives": []
        }
    })
}

pub(crate) fn object_type(name: &str, fields: Vec<Value>) -> Value {
    json!({
        "kind": "OBJECT",
        "name": name,
        "description": null,
        "fields": fields,
        "inputFields": null,
        "interfaces": [],
        "enumValues": null,
        "possibleTypes": null
    })
}

pub(crate) fn field(name: &str, ty: Value) -> Value {
    field_with_args(name, ty, vec![])
}

pub(crate) fn field_with_args(name: &str, ty: Value, args: Vec<Value>) -> Value {
    json!({
        "name": name,
        "description": null,
        "args": args,
        "type": ty,
        "isDeprecated": false,
        "deprecationReason": null
    })
}

pub(crate) fn argument(name: &str, ty: Value) -> Value {
    json!({ "name": name, "description": null, "type": ty, "defaultValue": null })
}

pub(crate) fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

pub(crate) fn scalar(name: &str) -> Value {
    named("SCALAR", name)
}

pub(crate) fn non_null(of_type: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": of_type })
}

pub(crate) fn list(of_type: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": of_type })
}
