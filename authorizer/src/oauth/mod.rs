//! Bearer token authorization for API requests

pub mod authorizer;
pub mod introspection;

pub use authorizer::Authorizer;
pub use introspection::{IntrospectionError, IntrospectionValidator, TokenValidator};
