//! Processing backend seam.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use mochi_common::config::ServerConfig;
use mochi_common::error::{MochiError, MochiResult};

use crate::payload::{FormPayload, FormValue};

/// The two server operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Voiceover,
    TextOverlay,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Voiceover => write!(f, "voiceover"),
            Endpoint::TextOverlay => write!(f, "text-overlay"),
        }
    }
}

/// Raw backend reply. Status interpretation is left to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can carry a payload to a processing endpoint.
#[async_trait]
pub trait ProcessingBackend: Send + Sync {
    /// POST `payload` to `endpoint`. Errors mean no response was obtained;
    /// non-success statuses come back as `Ok`.
    async fn submit(&self, endpoint: Endpoint, payload: FormPayload)
        -> MochiResult<BackendResponse>;
}

/// `reqwest` backend posting multipart forms to the configured server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    server: ServerConfig,
}

impl HttpBackend {
    pub fn new(server: ServerConfig) -> MochiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = server.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| MochiError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, server })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::Voiceover => self.server.voiceover_url(),
            Endpoint::TextOverlay => self.server.text_overlay_url(),
        }
    }
}

/// Convert a payload to a `reqwest` multipart form.
pub fn multipart_form(payload: &FormPayload) -> MochiResult<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for field in payload.fields() {
        form = match &field.value {
            FormValue::Text(value) => form.text(field.name.clone(), value.clone()),
            FormValue::File(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes().to_vec())
                    .file_name(file.name().to_string())
                    .mime_str(file.mime())
                    .map_err(|e| {
                        MochiError::media(format!("Invalid MIME type for {}: {e}", file.name()))
                    })?;
                form.part(field.name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl ProcessingBackend for HttpBackend {
    async fn submit(
        &self,
        endpoint: Endpoint,
        payload: FormPayload,
    ) -> MochiResult<BackendResponse> {
        let url = self.url(endpoint);
        tracing::info!(
            %endpoint,
            %url,
            fields = payload.fields().len(),
            bytes = payload.file_bytes(),
            "Posting payload"
        );

        let form = multipart_form(&payload)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MochiError::transport(format!("Request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| MochiError::transport(format!("Failed to read response from {url}: {e}")))?
            .to_vec();

        tracing::debug!(%endpoint, status, bytes = body.len(), "Backend responded");
        Ok(BackendResponse { status, body })
    }
}
