use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use super::error::LoadError;

/// Knobs for the retrieval step.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Largest body accepted, in bytes.
    pub max_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Where the artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http(String),
    File(PathBuf),
}

impl Location {
    pub fn parse(location: &str) -> Self {
        let s = location.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Location::Http(s.to_string())
        } else if let Some(path) = s.strip_prefix("file://") {
            Location::File(PathBuf::from(path))
        } else {
            Location::File(PathBuf::from(s))
        }
    }
}

/// Retrieve the raw (still compressed) bytes of the artifact.
pub fn fetch_bytes(location: &str, options: &FetchOptions) -> Result<Vec<u8>, LoadError> {
    let retrieval = |reason: String| LoadError::Retrieval {
        location: location.to_string(),
        reason,
    };

    let bytes = match Location::parse(location) {
        Location::Http(url) => fetch_http(&url, options).map_err(retrieval)?,
        Location::File(path) => {
            let len = std::fs::metadata(&path)
                .map_err(|e| retrieval(e.to_string()))?
                .len();
            if len > options.max_bytes {
                return Err(retrieval(too_large(options.max_bytes)));
            }
            std::fs::read(&path).map_err(|e| retrieval(e.to_string()))?
        }
    };

    log::info!("Retrieved {} bytes from {location}", bytes.len());
    Ok(bytes)
}

fn fetch_http(url: &str, options: &FetchOptions) -> Result<Vec<u8>, String> {
    let response = match ureq::get(url).timeout(options.timeout).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, r)) => {
            return Err(format!("server returned {code} {}", r.status_text()));
        }
        Err(ureq::Error::Transport(t)) => return Err(t.to_string()),
    };

    if let Some(len) = response
        .header("Content-Length")
        .and_then(|s| s.parse::<u64>().ok())
    {
        if len > options.max_bytes {
            return Err(too_large(options.max_bytes));
        }
    }

    // Read one byte past the cap so an oversized body without a
    // Content-Length is still detected.
    let mut body = Vec::new();
    response
        .into_reader()
        .take(options.max_bytes.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| format!("connection dropped while reading body: {e}"))?;
    if body.len() as u64 > options.max_bytes {
        return Err(too_large(options.max_bytes));
    }
    Ok(body)
}

fn too_large(limit: u64) -> String {
    format!("response body exceeds the {limit} byte limit")
}
