//! Endpoint URLs.

use std::fmt;
use std::sync::Arc;

/// Base URL of the public placeholder API used by the default endpoint set.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Resource paths fetched by default, in sequential-mode order.
pub const DEFAULT_RESOURCES: [&str; 5] = ["posts", "albums", "users", "photos", "comments"];

/// An immutable endpoint URL.
///
/// Cloning is cheap, so every spawned task can own its endpoint.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint(Arc<str>);

impl Endpoint {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(Arc::from(url.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({:?})", &*self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Self(Arc::from(url))
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The default endpoint set under `base_url`.
///
/// A trailing slash on `base_url` is ignored.
pub fn default_endpoints(base_url: &str) -> Vec<Endpoint> {
    let base = base_url.trim_end_matches('/');
    DEFAULT_RESOURCES
        .iter()
        .map(|resource| Endpoint::from(format!("{base}/{resource}")))
        .collect()
}
