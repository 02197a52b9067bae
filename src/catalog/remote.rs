//! HTTP fetch seam.
//!
//! Catalog loaders and the audio thread fetch everything through [`Remote`]
//! so tests can drive them with a fake instead of a live server.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

pub trait Remote {
    fn fetch_text(&self, url: &str) -> Result<String, RemoteError>;
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Blocking reqwest-backed [`Remote`]. Cloning shares the underlying client.
#[derive(Clone)]
pub struct HttpRemote {
    client: reqwest::blocking::Client,
}

impl HttpRemote {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl Remote for HttpRemote {
    fn fetch_text(&self, url: &str) -> Result<String, RemoteError> {
        let res = self.client.get(url).send()?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(url.to_string()));
        }
        Ok(res.error_for_status()?.text()?)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let res = self.client.get(url).send()?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(url.to_string()));
        }
        Ok(res.error_for_status()?.bytes()?.to_vec())
    }
}
