//! Tracking-URL probe.
//!
//! A cluster-reported tracking URL rarely points straight at the
//! application's web service: while the master is registering, the
//! cluster proxy answers with a `Refresh` header pointing one hop
//! further. The probe follows that chain, hard-bounded by
//! [`MAX_REDIRECTS`], and captures the security token cookie from the
//! final response on secure clusters.

use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::{debug, warn};

use crate::client::ServiceClient;
use crate::telemetry;
use crate::ws::{MAX_REDIRECTS, TOKEN_COOKIE, WS_PATH};
use crate::{MuninnError, Result};

/// What a completed probe observed.
pub(crate) struct ProbeOutcome {
    /// URL of the service root after all redirects.
    pub final_url: String,
    /// Security token captured from the final response, if any.
    pub token: Option<String>,
    /// Body of the service root response.
    pub body: String,
}

/// Normalize a tracking URL into an HTTP base.
///
/// Tracking URLs arrive host:port shaped, sometimes with a scheme,
/// sometimes with a trailing slash.
pub(crate) fn http_base(tracking_url: &str) -> String {
    let trimmed = tracking_url.strip_suffix('/').unwrap_or(tracking_url);
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Probe URL for a tracking URL: its HTTP base plus [`WS_PATH`].
pub(crate) fn probe_url(tracking_url: &str) -> String {
    format!("{}{WS_PATH}", http_base(tracking_url))
}

/// Extract the next probe URL from a `Refresh` header, if any.
///
/// The proxy's header looks like `Refresh: 0; url=<target>`. A missing
/// header, or one without a `url=` part, ends the chain.
pub(crate) fn refresh_target(headers: &HeaderMap) -> Option<String> {
    let refresh = headers.get("refresh")?.to_str().ok()?;
    let index = refresh.find("url=")?;
    let target = refresh[index + "url=".len()..].trim();
    if target.is_empty() {
        return None;
    }
    Some(target.to_string())
}

/// Capture the security token from `Set-Cookie` headers, if present.
pub(crate) fn token_cookie(headers: &HeaderMap) -> Option<String> {
    for cookie in headers.get_all(SET_COOKIE) {
        let Ok(cookie) = cookie.to_str() else { continue };
        // First attribute is NAME=VALUE; Path, Expires and friends follow.
        let first = cookie.split(';').next()?;
        if let Some((name, value)) = first.split_once('=')
            && name.trim() == TOKEN_COOKIE
        {
            return Some(value.trim().to_string());
        }
    }
    None
}

/// Follow the refresh chain from `start_url` to the service root.
///
/// Each hop GETs the current URL; a `Refresh` header pointing at a new
/// URL continues the chain, anything else ends it. The final response
/// must be 2xx. More than [`MAX_REDIRECTS`] hops abandons the attempt
/// with [`MuninnError::RedirectLimitExceeded`].
pub(crate) async fn follow_refresh_chain(
    client: &ServiceClient,
    start_url: &str,
    capture_token: bool,
) -> Result<ProbeOutcome> {
    let mut url = start_url.to_string();
    let mut hops = 0usize;

    loop {
        let response = client.get(&url).await?;

        if let Some(target) = refresh_target(response.headers()) {
            hops += 1;
            if hops > MAX_REDIRECTS {
                warn!(url = %start_url, hops, "redirect limit exceeded while probing");
                return Err(MuninnError::RedirectLimitExceeded {
                    url: target,
                    max: MAX_REDIRECTS,
                });
            }
            metrics::counter!(telemetry::REDIRECTS_TOTAL).increment(1);
            debug!(from = %url, to = %target, hop = hops, "following refresh redirect");
            url = target;
            continue;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(MuninnError::Http(format!(
                "service root {url} returned HTTP {status}"
            )));
        }

        let token = if capture_token {
            token_cookie(response.headers())
        } else {
            None
        };
        let body = response.text().await.map_err(|e| {
            MuninnError::Http(format!("failed to read service root body from {url}: {e}"))
        })?;

        return Ok(ProbeOutcome {
            final_url: url,
            token,
            body,
        });
    }
}
