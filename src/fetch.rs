//! Dataset fetching with disk caching.
//!
//! One-time blocking GETs with an imposed timeout, cached under the user
//! cache directory so repeat launches work offline. Fetch failures surface
//! to the host; the affected visualization degrades to an empty dataset
//! rather than crashing, and nothing here retries.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("read error: {0}")]
    Read(String),
    #[error("timed out: {0}")]
    Timeout(String),
}

/// ureq reports an expired deadline as a transport error wrapping an io
/// timeout, so walk the source chain to tell the two apart.
fn is_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = cause {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        cause = e.source();
    }
    false
}

pub fn fetch_text(url: &str, timeout: Duration) -> Result<String, FetchError> {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent.get(url).call().map_err(|e| {
        if is_timeout(&e) {
            FetchError::Timeout(e.to_string())
        } else {
            FetchError::Http(e.to_string())
        }
    })?;
    response
        .into_string()
        .map_err(|e| FetchError::Read(e.to_string()))
}

pub fn cache_dir() -> PathBuf {
    let base = std::env::var_os("HOME")
        .map(|h| PathBuf::from(h).join(".cache"))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("globe-sim")
}

/// Returns the cached copy if present, otherwise fetches and caches. Cache
/// write failures are ignored; the fetched text is still returned.
pub fn fetch_or_cache(filename: &str, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let dir = cache_dir();
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join(filename);
    if path.exists() {
        if let Ok(data) = std::fs::read_to_string(&path) {
            return Ok(data);
        }
    }
    let data = fetch_text(url, timeout)?;
    let _ = std::fs::write(&path, &data);
    log::info!("fetched {} ({} bytes)", url, data.len());
    Ok(data)
}

/// Load state for an asynchronously fetched dataset. Per-tick sampling over
/// NotLoaded/Loading is a defined no-op, not an error.
#[derive(Clone, Debug)]
pub enum DatasetState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> DatasetState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            DatasetState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DatasetState::NotLoaded | DatasetState::Loading)
    }

    pub fn from_fetch(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => DatasetState::Loaded(data),
            Err(e) => DatasetState::Failed(e.to_string()),
        }
    }
}
