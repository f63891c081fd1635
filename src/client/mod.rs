//! Filtered HTTP access to application web services.
//!
//! Provides [`ServiceClient`], a `reqwest` wrapper whose requests pass
//! through an idempotent middleware chain, and [`AppResource`], a cheap
//! handle on one node of a resolved application's web service tree.

mod filter;
mod service_client;

pub use filter::{RequestFilter, SECURITY_FILTER_ID, SecurityHeaderFilter};
pub use service_client::{AppResource, ServiceClient};
