//! Version negotiation for the application web service.
//!
//! Callers and resource handles always speak the native
//! [`WS_VERSION`](crate::ws::WS_VERSION) dialect. When a server reports
//! an older supported version, a [`VersionConversionFilter`] rewrites
//! outgoing request paths into the served dialect; unknown versions are
//! rejected before any resource handle is built.

use crate::client::RequestFilter;
use crate::ws::{WS_PATH, WS_VERSION};
use crate::{MuninnError, Result};

/// Chain identity of the version conversion filter.
pub const VERSION_FILTER_ID: &str = "version-conversion";

/// API versions this crate can talk to, oldest first.
pub const SUPPORTED_VERSIONS: &[&str] = &["v1", "v2"];

/// Path translation from the native dialect to one served version.
#[derive(Debug, Clone)]
pub struct VersionConverter {
    serves: String,
}

impl VersionConverter {
    fn new(serves: impl Into<String>) -> Self {
        Self {
            serves: serves.into(),
        }
    }

    /// Version the server speaks.
    pub fn serves(&self) -> &str {
        &self.serves
    }

    /// Rewrite a native web-service path into the served dialect.
    ///
    /// Paths outside the native tree pass through untouched.
    pub fn convert_path(&self, path: &str) -> String {
        let native_root = format!("{WS_PATH}/{WS_VERSION}");
        match path.strip_prefix(&native_root) {
            // Guard against matching a partial segment like /ws/v2x.
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                format!("{WS_PATH}/{}{rest}", self.serves)
            }
            _ => path.to_string(),
        }
    }
}

/// Pick the converter for a server-reported version.
///
/// `Ok(None)` means the server speaks the native dialect and no
/// conversion is needed.
pub fn converter_for(version: &str) -> Result<Option<VersionConverter>> {
    if version == WS_VERSION {
        return Ok(None);
    }
    if SUPPORTED_VERSIONS.contains(&version) {
        return Ok(Some(VersionConverter::new(version)));
    }
    Err(MuninnError::IncompatibleVersion(version.to_string()))
}

/// Rewrites outgoing request paths into the server's dialect.
///
/// Pass-through when the server is native; the filter is still attached
/// so a client's chain always carries exactly one version concern.
pub struct VersionConversionFilter {
    converter: Option<VersionConverter>,
}

impl VersionConversionFilter {
    /// Build the filter for a server-reported version.
    pub fn for_version(version: &str) -> Result<Self> {
        Ok(Self {
            converter: converter_for(version)?,
        })
    }
}

impl RequestFilter for VersionConversionFilter {
    fn id(&self) -> &str {
        VERSION_FILTER_ID
    }

    fn apply(&self, request: &mut reqwest::Request) {
        if let Some(converter) = &self.converter {
            let path = request.url().path().to_string();
            let converted = converter.convert_path(&path);
            if converted != path {
                request.url_mut().set_path(&converted);
            }
        }
    }
}
