use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::foundation::error::{KeyplayError, KeyplayResult};

/// One-shot retrieval of bytes by location (path or URL).
pub trait Fetch {
    fn fetch(&self, location: &str) -> KeyplayResult<Vec<u8>>;
}

/// Fetch `location` and parse it as JSON.
///
/// Malformed JSON is a fetch failure; well-formed JSON of the wrong shape is a serde error.
pub fn fetch_json<T: DeserializeOwned>(fetch: &dyn Fetch, location: &str) -> KeyplayResult<T> {
    let bytes = fetch.fetch(location)?;
    serde_json::from_slice(&bytes).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => KeyplayError::serde(format!("{location}: {e}")),
        _ => KeyplayError::fetch_failed(location, format!("malformed JSON: {e}")),
    })
}

/// Reads from the filesystem; relative locations resolve under `root`.
#[derive(Clone, Debug)]
pub struct FsFetch {
    root: PathBuf,
}

impl FsFetch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let location = location.strip_prefix("file://").unwrap_or(location);
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Fetch for FsFetch {
    fn fetch(&self, location: &str) -> KeyplayResult<Vec<u8>> {
        let path = self.resolve(location);
        tracing::debug!(path = %path.display(), "reading");
        std::fs::read(&path).map_err(|e| KeyplayError::fetch_failed(location, e.to_string()))
    }
}

/// Blocking HTTP(S) fetcher with an optional base URL for relative locations.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpFetch {
    client: reqwest::blocking::Client,
    base: Option<String>,
}

#[cfg(feature = "http")]
impl HttpFetch {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base: None,
        }
    }

    /// Resolve non-URL locations against `base` (joined with a single `/`).
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::new()
        }
    }

    fn url_for(&self, location: &str) -> String {
        match &self.base {
            Some(base) if !is_http_url(location) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                location.trim_start_matches('/')
            ),
            _ => location.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl Fetch for HttpFetch {
    fn fetch(&self, location: &str) -> KeyplayResult<Vec<u8>> {
        let url = self.url_for(location);
        tracing::debug!(%url, "requesting");
        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| KeyplayError::fetch_failed(&url, e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(KeyplayError::fetch_failed(&url, format!("status {status}")));
        }

        let bytes = res
            .bytes()
            .map_err(|e| KeyplayError::fetch_failed(&url, e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Whether `location` is an `http://` or `https://` URL.
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/fetch.rs"]
mod tests;
