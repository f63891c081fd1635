//! Public types for the Muninn API.

mod endpoint;

pub use endpoint::{DEFAULT_TOKEN_EXPIRY, EndpointInfo, SecurityContext};
