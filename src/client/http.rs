//! Blocking HTTP detector
//!
//! Sends `POST <server>/api/detect` with a multipart body holding one part,
//! `image`, that carries the bytes, file name and declared type. The status
//! code is not inspected: error responses from the service still carry the
//! `{success: false, error}` body, so the body alone decides the outcome.

use super::{Detector, DETECT_PATH, IMAGE_FIELD};
use crate::detection::{parse_response, DetectionResult};
use crate::error::DetectError;
use crate::selection::SelectedImage;
use log::debug;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Request timeout used by [`HttpDetector::new`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct HttpDetector {
    endpoint: Url,
    client: Client,
}

impl HttpDetector {
    pub fn new(server: &str) -> Result<Self, ClientError> {
        Self::with_timeout(server, Some(DEFAULT_TIMEOUT))
    }

    /// `None` waits for as long as the server takes
    pub fn with_timeout(server: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let endpoint = endpoint_for(server)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Resolve the detect endpoint against a server URL. A trailing path on the
/// server (`http://host/app/`) is kept as a prefix.
pub fn endpoint_for(server: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: server.to_string(),
        reason,
    };

    let base = Url::parse(server).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    base.join(DETECT_PATH).map_err(|e| invalid(e.to_string()))
}

/// reqwest's own message stops at "error sending request"; the cause
/// ("Connection refused", a timeout) lives in the source chain.
fn transport(err: reqwest::Error) -> DetectError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    DetectError::Transport(message)
}

impl Detector for HttpDetector {
    fn detect(&self, image: &SelectedImage) -> Result<DetectionResult, DetectError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime())
            .map_err(transport)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        debug!(
            "POST {} ({}, {} bytes, {})",
            self.endpoint,
            image.file_name(),
            image.bytes().len(),
            image.mime()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().map_err(transport)?;

        debug!("{} answered {} ({} bytes)", self.endpoint, status, body.len());
        parse_response(&body)
    }
}
