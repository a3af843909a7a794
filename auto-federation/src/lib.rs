//! ## Usage
//!
//! Turns an existing, non-federated GraphQL service into a subgraph that a federation gateway
//! can compose, without touching the service itself.
//!
//! [`build_federated_service`] introspects the origin service, renders a federation-ready SDL
//! (root operation types marked `extend`, entities annotated with an inferred `@key`) and builds
//! a [`Resolvers`] table whose root fields forward execution back to the origin.
//!
//! [`build_federated_info`] runs the same synthesis on a schema that is already at hand, without
//! any network access. [`forward`] lets hand-written reference resolvers query the origin.
//!
//! ```no_run
//! # async fn run() -> Result<(), auto_federation::error::FederationError> {
//! let federated = auto_federation::build_federated_service("http://localhost:4001/graphql", None).await?;
//! println!("{}", federated.schema);
//! # Ok(())
//! # }
//! ```

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

mod display_helpers;
pub mod error;
mod federate;
pub mod graphql;
pub mod introspection;
mod key;
pub mod network;
pub mod options;
pub mod resolver;
mod schema;
mod sdl;

pub use crate::federate::build_federated_info;
pub use crate::federate::build_federated_service;
pub use crate::federate::build_federated_service_with;
pub use crate::federate::FederatedService;
pub use crate::federate::ServiceSchema;
pub use crate::network::forward;
pub use crate::network::ForwardClient;
pub use crate::network::ForwardRequest;
pub use crate::network::Forwarder;
pub use crate::options::FederationOptions;
pub use crate::options::FieldOptions;
pub use crate::options::TypeOptions;
pub use crate::resolver::Resolver;
pub use crate::resolver::ResolverContext;
pub use crate::resolver::Resolvers;
pub use crate::resolver::REFERENCE_RESOLVER;
