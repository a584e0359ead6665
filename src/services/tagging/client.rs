//! HTTP client for the OpenSextant extraction service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Certificate, Client, Identity};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::error::TaggingError;
use super::response::ExtractResult;
use crate::config::{TaggerConfig, VerifySsl};

/// Something that turns plain text into annotations.
#[async_trait]
pub trait ExtractClient: Send + Sync {
    /// Where requests go, for log and error messages.
    fn endpoint(&self) -> &str;

    async fn extract(&self, text: &str) -> Result<ExtractResult, TaggingError>;

    async fn is_available(&self) -> bool {
        true
    }
}

/// Client for a running OpenSextant REST service.
///
/// The underlying `reqwest::Client` is built once and shared by every
/// request, so connections are pooled across documents.
pub struct OpenSextantClient {
    client: Client,
    rest_url: Url,
    probe_url: Url,
    auth: Option<(String, String)>,
}

impl OpenSextantClient {
    pub fn new(config: &TaggerConfig) -> Result<Self, TaggingError> {
        let rest_url = parse_url(&config.rest_url())?;
        let probe_url = parse_url(&config.probe_url())?;

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        builder = match &config.verify_ssl {
            VerifySsl::Enabled(true) => builder,
            VerifySsl::Enabled(false) => builder.danger_accept_invalid_certs(true),
            VerifySsl::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    TaggingError::Config(format!("cannot read CA bundle {}: {}", path, e))
                })?;
                let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
                    TaggingError::Config(format!("invalid CA bundle {}: {}", path, e))
                })?;
                certs
                    .into_iter()
                    .fold(builder.tls_built_in_root_certs(false), |b, cert| {
                        b.add_root_certificate(cert)
                    })
            }
        };

        if let Some(cert) = &config.cert {
            // rustls wants the certificate chain and the private key in one PEM
            let mut pem = Vec::new();
            for path in cert.paths() {
                let bytes = std::fs::read(path).map_err(|e| {
                    TaggingError::Config(format!("cannot read client cert {}: {}", path, e))
                })?;
                pem.extend_from_slice(&bytes);
                pem.push(b'\n');
            }
            let identity = Identity::from_pem(&pem)
                .map_err(|e| TaggingError::Config(format!("invalid client cert: {}", e)))?;
            builder = builder.identity(identity);
        }

        let client = builder
            .build()
            .map_err(|e| TaggingError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rest_url,
            probe_url,
            auth: config
                .basic_auth()
                .map(|(u, p)| (u.to_string(), p.to_string())),
        })
    }

    fn post(&self, url: &Url, body: String) -> reqwest::RequestBuilder {
        let request = self.client.post(url.clone()).body(body);
        match &self.auth {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, TaggingError> {
    Url::parse(raw).map_err(|e| TaggingError::Config(format!("invalid service URL {}: {}", raw, e)))
}

#[async_trait]
impl ExtractClient for OpenSextantClient {
    fn endpoint(&self) -> &str {
        self.rest_url.as_str()
    }

    async fn extract(&self, text: &str) -> Result<ExtractResult, TaggingError> {
        debug!("POST {} bytes to {}", text.len(), self.rest_url);

        let url = self.rest_url.to_string();
        let response = self
            .post(&self.rest_url, text.to_string())
            .send()
            .await
            .map_err(|source| TaggingError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaggingError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TaggingError::Http { url, source })?;

        Ok(ExtractResult::from_slice(&body)?)
    }

    /// The extractor listing must include the `general` extractor.
    async fn is_available(&self) -> bool {
        let response = match self.post(&self.probe_url, String::new()).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                debug!("{} returned HTTP {}", self.probe_url, resp.status());
                return false;
            }
            Err(e) => {
                debug!("{} unreachable: {}", self.probe_url, e);
                return false;
            }
        };

        match response.json::<Value>().await {
            Ok(Value::Array(names)) => names.iter().any(|n| n.as_str() == Some("general")),
            _ => false,
        }
    }
}
