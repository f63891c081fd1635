//! Request filters applied to outgoing service requests.
//!
//! Filters are the client-side middleware of the web-service protocol:
//! the version-conversion filter rewrites native paths for older
//! servers, and [`SecurityHeaderFilter`] attaches the security token on
//! secure clusters. Each filter carries a stable [`id`](RequestFilter::id)
//! so a client chain holds at most one filter per concern.

use reqwest::header::{self, HeaderValue};

use crate::ws::TOKEN_COOKIE;
use crate::{MuninnError, Result};

/// Chain identity of the security header filter.
pub const SECURITY_FILTER_ID: &str = "security-header";

/// A mutation applied to every outgoing request of a
/// [`ServiceClient`](crate::ServiceClient).
///
/// Filters must be cheap and infallible at apply time; anything that
/// can fail (parsing tokens, negotiating versions) happens when the
/// filter is constructed.
pub trait RequestFilter: Send + Sync {
    /// Stable identity. [`ensure_filter`](crate::ServiceClient::ensure_filter)
    /// keeps at most one filter per id, replacing on re-attach.
    fn id(&self) -> &str;

    /// Rewrite the request before it is sent.
    fn apply(&self, request: &mut reqwest::Request);
}

/// Attaches the security token cookie to every request.
///
/// Secure clusters gate the application web service behind a token
/// issued via the [`TOKEN_COOKIE`] response cookie; this filter sends
/// it back on each call.
pub struct SecurityHeaderFilter {
    cookie: HeaderValue,
}

impl SecurityHeaderFilter {
    /// Create a filter for a captured token.
    ///
    /// Fails if the token cannot be carried in a header value.
    pub fn new(token: &str) -> Result<Self> {
        let cookie = HeaderValue::from_str(&format!("{TOKEN_COOKIE}={token}")).map_err(|e| {
            MuninnError::Configuration(format!("security token is not a valid header value: {e}"))
        })?;
        Ok(Self { cookie })
    }
}

impl RequestFilter for SecurityHeaderFilter {
    fn id(&self) -> &str {
        SECURITY_FILTER_ID
    }

    fn apply(&self, request: &mut reqwest::Request) {
        request
            .headers_mut()
            .insert(header::COOKIE, self.cookie.clone());
    }
}
