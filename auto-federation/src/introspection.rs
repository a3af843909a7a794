//! Rebuilding a schema from the result of an introspection query.
//!
//! The origin service is only reachable over GraphQL, so its schema is read through the standard
//! introspection query and turned back into apollo-compiler AST definitions.

use std::fmt::Display;

use apollo_compiler::ast;
use apollo_compiler::ast::DirectiveLocation;
use apollo_compiler::ast::OperationType;
use apollo_compiler::name;
use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FederationError;

/// The introspection query sent to the origin service.
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      isRepeatable
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}"#;

const BUILT_IN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];
const BUILT_IN_DIRECTIVES: [&str; 5] = ["skip", "include", "deprecated", "specifiedBy", "oneOf"];
const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// The `data` of an introspection response.
#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionResult {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<NamedTypeRef>,
    pub mutation_type: Option<NamedTypeRef>,
    pub subscription_type: Option<NamedTypeRef>,
    pub types: Vec<FullType>,
    #[serde(default)]
    pub directives: Vec<DirectiveDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    pub description: Option<String>,
    pub fields: Option<Vec<Field>>,
    pub input_fields: Option<Vec<InputValue>>,
    pub interfaces: Option<Vec<TypeRef>>,
    pub enum_values: Option<Vec<EnumValue>>,
    pub possible_types: Option<Vec<TypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Already a GraphQL literal.
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(default)]
    pub is_repeatable: bool,
}

fn malformed(message: impl Display) -> FederationError {
    FederationError::InvalidSchema {
        message: format!("malformed introspection result: {message}"),
    }
}

fn to_name(name: &str) -> Result<Name, FederationError> {
    Name::new(name).map_err(malformed)
}

fn to_names(types: Option<&[TypeRef]>) -> Result<Vec<Name>, FederationError> {
    types
        .unwrap_or_default()
        .iter()
        .map(|ty| match &ty.name {
            Some(name) => to_name(name),
            None => Err(malformed(format!("{:?} type reference has no name", ty.kind))),
        })
        .collect()
}

fn to_description(description: &Option<String>) -> Option<Node<str>> {
    description.as_deref().map(Node::from)
}

/// `@deprecated`, with its reason unless it is the default one.
fn deprecated(is_deprecated: bool, reason: Option<&str>) -> ast::DirectiveList {
    if !is_deprecated {
        return ast::DirectiveList::default();
    }
    let arguments = match reason {
        Some(reason) if reason != DEFAULT_DEPRECATION_REASON => vec![Node::new(ast::Argument {
            name: name!("reason"),
            value: Node::new(ast::Value::String(reason.to_owned())),
        })],
        _ => Vec::new(),
    };
    ast::DirectiveList(vec![Node::new(ast::Directive {
        name: name!("deprecated"),
        arguments,
    })])
}

/// Default values come back as GraphQL literal text.
fn parse_value(literal: &str) -> Result<Node<ast::Value>, FederationError> {
    let invalid = || malformed(format!("invalid default value `{literal}`"));
    let document = ast::Document::parse(
        format!("{{ default(value: {literal}) }}"),
        "default_value.graphql",
    )
    .map_err(|_| invalid())?;
    let [ast::Definition::OperationDefinition(operation)] = document.definitions.as_slice() else {
        return Err(invalid());
    };
    let [ast::Selection::Field(field)] = operation.selection_set.as_slice() else {
        return Err(invalid());
    };
    match field.arguments.as_slice() {
        [argument] => Ok(argument.value.clone()),
        _ => Err(invalid()),
    }
}

fn directive_location(location: &str) -> Result<DirectiveLocation, FederationError> {
    Ok(match location {
        "QUERY" => DirectiveLocation::Query,
        "MUTATION" => DirectiveLocation::Mutation,
        "SUBSCRIPTION" => DirectiveLocation::Subscription,
        "FIELD" => DirectiveLocation::Field,
        "FRAGMENT_DEFINITION" => DirectiveLocation::FragmentDefinition,
        "FRAGMENT_SPREAD" => DirectiveLocation::FragmentSpread,
        "INLINE_FRAGMENT" => DirectiveLocation::InlineFragment,
        "VARIABLE_DEFINITION" => DirectiveLocation::VariableDefinition,
        "SCHEMA" => DirectiveLocation::Schema,
        "SCALAR" => DirectiveLocation::Scalar,
        "OBJECT" => DirectiveLocation::Object,
        "FIELD_DEFINITION" => DirectiveLocation::FieldDefinition,
        "ARGUMENT_DEFINITION" => DirectiveLocation::ArgumentDefinition,
        "INTERFACE" => DirectiveLocation::Interface,
        "UNION" => DirectiveLocation::Union,
        "ENUM" => DirectiveLocation::Enum,
        "ENUM_VALUE" => DirectiveLocation::EnumValue,
        "INPUT_OBJECT" => DirectiveLocation::InputObject,
        "INPUT_FIELD_DEFINITION" => DirectiveLocation::InputFieldDefinition,
        _ => return Err(malformed(format!("unknown directive location {location}"))),
    })
}

impl TypeRef {
    fn to_type(&self) -> Result<ast::Type, FederationError> {
        match (self.kind, &self.of_type) {
            (TypeKind::NonNull, Some(of_type)) => Ok(of_type.to_type()?.non_null()),
            (TypeKind::List, Some(of_type)) => Ok(of_type.to_type()?.list()),
            (TypeKind::NonNull | TypeKind::List, None) => Err(malformed(format!(
                "{:?} type reference has no ofType",
                self.kind
            ))),
            (kind, _) => match &self.name {
                Some(name) => Ok(ast::Type::Named(to_name(name)?)),
                None => Err(malformed(format!("{kind:?} type reference has no name"))),
            },
        }
    }
}

impl InputValue {
    fn to_definition(&self) -> Result<Node<ast::InputValueDefinition>, FederationError> {
        Ok(Node::new(ast::InputValueDefinition {
            description: to_description(&self.description),
            name: to_name(&self.name)?,
            ty: Node::new(self.ty.to_type()?),
            default_value: self.default_value.as_deref().map(parse_value).transpose()?,
            directives: Default::default(),
        }))
    }
}

fn to_input_values(
    values: &[InputValue],
) -> Result<Vec<Node<ast::InputValueDefinition>>, FederationError> {
    values.iter().map(InputValue::to_definition).collect()
}

impl Field {
    fn to_definition(&self) -> Result<Node<ast::FieldDefinition>, FederationError> {
        Ok(Node::new(ast::FieldDefinition {
            description: to_description(&self.description),
            name: to_name(&self.name)?,
            arguments: to_input_values(&self.args)?,
            ty: self.ty.to_type()?,
            directives: deprecated(self.is_deprecated, self.deprecation_reason.as_deref()),
        }))
    }
}

impl EnumValue {
    fn to_definition(&self) -> Result<Node<ast::EnumValueDefinition>, FederationError> {
        Ok(Node::new(ast::EnumValueDefinition {
            description: to_description(&self.description),
            value: to_name(&self.name)?,
            directives: deprecated(self.is_deprecated, self.deprecation_reason.as_deref()),
        }))
    }
}

impl FullType {
    fn fields(&self) -> Result<Vec<Node<ast::FieldDefinition>>, FederationError> {
        self.fields
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Field::to_definition)
            .collect()
    }

    /// `None` for the wrapper kinds, which never name a type of their own.
    fn to_definition(&self) -> Result<Option<ast::Definition>, FederationError> {
        let description = to_description(&self.description);
        let name = to_name(&self.name)?;
        let directives = ast::DirectiveList::default();
        let definition: ast::Definition = match self.kind {
            TypeKind::Scalar => ast::ScalarTypeDefinition {
                description,
                name,
                directives,
            }
            .into(),
            TypeKind::Object => ast::ObjectTypeDefinition {
                description,
                name,
                implements_interfaces: to_names(self.interfaces.as_deref())?,
                directives,
                fields: self.fields()?,
            }
            .into(),
            TypeKind::Interface => ast::InterfaceTypeDefinition {
                description,
                name,
                implements_interfaces: to_names(self.interfaces.as_deref())?,
                directives,
                fields: self.fields()?,
            }
            .into(),
            TypeKind::Union => ast::UnionTypeDefinition {
                description,
                name,
                directives,
                members: to_names(self.possible_types.as_deref())?,
            }
            .into(),
            TypeKind::Enum => ast::EnumTypeDefinition {
                description,
                name,
                directives,
                values: self
                    .enum_values
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(EnumValue::to_definition)
                    .collect::<Result<_, _>>()?,
            }
            .into(),
            TypeKind::InputObject => ast::InputObjectTypeDefinition {
                description,
                name,
                directives,
                fields: to_input_values(self.input_fields.as_deref().unwrap_or_default())?,
            }
            .into(),
            TypeKind::List | TypeKind::NonNull => return Ok(None),
        };
        Ok(Some(definition))
    }
}

impl DirectiveDefinition {
    fn to_definition(&self) -> Result<ast::Definition, FederationError> {
        Ok(ast::DirectiveDefinition {
            description: to_description(&self.description),
            name: to_name(&self.name)?,
            arguments: to_input_values(&self.args)?,
            repeatable: self.is_repeatable,
            locations: self
                .locations
                .iter()
                .map(|location| directive_location(location))
                .collect::<Result<_, _>>()?,
        }
        .into())
    }
}

impl IntrospectionSchema {
    /// The schema as an AST document, leaving out introspection types, built-in scalars and
    /// built-in directives. Declaration order is kept.
    pub fn to_document(&self) -> Result<ast::Document, FederationError> {
        let mut document = ast::Document::new();
        for directive in self
            .directives
            .iter()
            .filter(|directive| !BUILT_IN_DIRECTIVES.contains(&directive.name.as_str()))
        {
            document.definitions.push(directive.to_definition()?);
        }
        document.definitions.extend(self.schema_definition()?);
        for ty in self.types.iter().filter(|ty| {
            !ty.name.starts_with("__") && !BUILT_IN_SCALARS.contains(&ty.name.as_str())
        }) {
            document.definitions.extend(ty.to_definition()?);
        }
        Ok(document)
    }

    /// A `schema` block, only needed when a root operation type has a non-default name.
    fn schema_definition(&self) -> Result<Option<ast::Definition>, FederationError> {
        let roots = [
            (OperationType::Query, "Query", &self.query_type),
            (OperationType::Mutation, "Mutation", &self.mutation_type),
            (OperationType::Subscription, "Subscription", &self.subscription_type),
        ];
        if roots
            .iter()
            .all(|(_, default_name, root)| !matches!(root, Some(root) if root.name != *default_name))
        {
            return Ok(None);
        }
        let root_operations = roots
            .into_iter()
            .filter_map(|(operation_type, _, root)| Some((operation_type, root.as_ref()?)))
            .map(|(operation_type, root)| -> Result<_, FederationError> {
                Ok(Node::new((operation_type, to_name(&root.name)?)))
            })
            .collect::<Result<_, _>>()?;
        Ok(Some(
            ast::SchemaDefinition {
                description: None,
                directives: Default::default(),
                root_operations,
            }
            .into(),
        ))
    }
}

/// Rebuilds a schema from the `data` of an introspection response.
pub fn build_schema(data: &Value) -> Result<Schema, FederationError> {
    let result = IntrospectionResult::deserialize(data).map_err(malformed)?;
    let document = result.schema.to_document()?;
    tracing::trace!(sdl = %document, "schema rebuilt from introspection");
    document.to_schema().map_err(FederationError::from)
}
