//! Transport adapter: signed HTTP exchange for Query-protocol requests.
//!
//! The operation layer only sees [`QueryTransport`]; it hands over a flat
//! parameter map and gets back the raw status and body. Signing,
//! connection pooling and retries of transient failures live here.

use crate::config::{ClientConfig, Credentials, RetryConfig, SERVICE_NAME};
use crate::error::TransportError;
use crate::params::QueryParams;
use crate::response;
use crate::signing::SigV4Signer;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Raw outcome of one exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
    /// From the `x-amzn-requestid` header, when present.
    pub request_id: Option<String>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a Query-protocol request and returns the undecoded response.
///
/// Implementations must be `Send + Sync`; one instance serves concurrent
/// callers.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn send(
        &self,
        method: &str,
        path: &str,
        params: &QueryParams,
    ) -> Result<TransportResponse, TransportError>;
}

/// SigV4-signed reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    signer: SigV4Signer,
    endpoint: String,
    host: String,
    /// Path prefix of the endpoint, without a trailing slash.
    base_path: String,
    retry: RetryConfig,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let endpoint = config.endpoint();
        let (host, base_path) = split_endpoint(&endpoint)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http,
            signer: SigV4Signer::new(&config.credentials, &config.region.name, SERVICE_NAME),
            endpoint,
            host,
            base_path,
            retry: config.retry.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Transport for `endpoint` with explicit credentials, mostly for emulators.
    pub fn with_endpoint(
        endpoint: &str,
        credentials: Credentials,
        region: &str,
    ) -> Result<Self, TransportError> {
        let config = ClientConfig::new(crate::config::Region::new(region), credentials)
            .with_endpoint_url(endpoint);
        Self::new(&config)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Path as it appears on the wire, endpoint prefix included.
    fn signed_path(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    async fn execute_signed(
        &self,
        method: &Method,
        url: &str,
        path: &str,
        body: &str,
    ) -> Result<TransportResponse, TransportError> {
        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), self.host.clone());
        headers.insert("content-type".to_string(), FORM_CONTENT_TYPE.to_string());
        let signed = self
            .signer
            .sign(method.as_str(), &self.signed_path(path), &headers, body, Utc::now());

        let mut req = self.http.request(method.clone(), url);
        for (key, value) in &signed {
            // reqwest derives Host from the URL.
            if key != "host" {
                req = req.header(key.as_str(), value.as_str());
            }
        }
        req = req
            .header("user-agent", &self.user_agent)
            .header("amz-sdk-invocation-id", Uuid::new_v4().to_string())
            .body(body.to_string());

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let request_id = resp
            .headers()
            .get("x-amzn-requestid")
            .or_else(|| resp.headers().get("x-amz-request-id"))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?;

        Ok(TransportResponse {
            status,
            body,
            request_id,
        })
    }

    /// Exponential backoff with full jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        use rand::Rng;
        let exponential = self
            .retry
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let capped = exponential.min(self.retry.max_backoff_ms);
        Duration::from_millis(rand::thread_rng().gen_range(0..=capped))
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    /// Retries throttling and transient faults, classified from the fault
    /// document, and connect or timeout failures. Once attempts run out the
    /// last response is returned as received.
    async fn send(
        &self,
        method: &str,
        path: &str,
        params: &QueryParams,
    ) -> Result<TransportResponse, TransportError> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(method.to_string()))?;
        let url = format!("{}{}", self.endpoint, path);
        let body = params.to_form_body();
        let max_attempts = self.retry.max_attempts.max(1);

        let mut attempt = 0;
        loop {
            let last = attempt + 1 >= max_attempts;
            match self.execute_signed(&method, &url, path, &body).await {
                Ok(response) if !last && !response.is_success() => {
                    let fault = response::parse_fault(
                        response.status,
                        &response.body,
                        response.request_id.as_deref(),
                    );
                    if !fault.is_retryable() {
                        return Ok(response);
                    }
                    let delay = self.backoff(attempt);
                    log::warn!(
                        "CloudWatch Logs {} retryable error (attempt {}/{}): {} HTTP {} - retrying in {}ms",
                        params.action(),
                        attempt + 1,
                        max_attempts,
                        fault.code,
                        response.status,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if !last && e.is_retryable() => {
                    let delay = self.backoff(attempt);
                    log::warn!(
                        "CloudWatch Logs {} HTTP error (attempt {}/{}): {} - retrying in {}ms",
                        params.action(),
                        attempt + 1,
                        max_attempts,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
            attempt += 1;
        }
    }
}

/// Host header value (with any non-default port) and path prefix of `endpoint`.
fn split_endpoint(endpoint: &str) -> Result<(String, String), TransportError> {
    let url = url::Url::parse(endpoint)?;
    let host = url
        .host_str()
        .ok_or_else(|| TransportError::Other(format!("endpoint '{}' has no host", endpoint)))?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Ok((host, url.path().trim_end_matches('/').to_string()))
}
