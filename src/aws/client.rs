//! CloudWatch Logs Client
//!
//! Main client for the CloudWatch Logs JSON API, combining credentials,
//! request signing and the HTTP transport.

use super::auth::Credentials;
use super::http::AwsHttpClient;
use super::sigv4::{sign_request, SigningParams};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use url::Url;

const SERVICE: &str = "logs";
const TARGET_PREFIX: &str = "Logs_20140328";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Main CloudWatch Logs client
#[derive(Clone)]
pub struct LogsClient {
    pub credentials: Credentials,
    pub http: AwsHttpClient,
    pub region: String,
    endpoint: Url,
}

impl LogsClient {
    /// Create a client for the regional public endpoint
    pub fn new(region: &str, credentials: Credentials) -> Result<Self> {
        let endpoint = Self::regional_endpoint(region)?;
        Self::with_endpoint(region, credentials, endpoint.as_str())
    }

    /// Create a client for a custom endpoint (local emulators, tests)
    pub fn with_endpoint(region: &str, credentials: Credentials, endpoint: &str) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;
        let http = AwsHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            region: region.to_string(),
            endpoint,
        })
    }

    /// Build the public endpoint URL for a region
    pub fn regional_endpoint(region: &str) -> Result<Url> {
        let url = format!("https://logs.{}.amazonaws.com/", region);
        Url::parse(&url).with_context(|| format!("Invalid region: {}", region))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Invoke a CloudWatch Logs operation, e.g. `PutMetricFilter`
    pub async fn call<T: Serialize>(&self, operation: &str, input: &T) -> Result<Value> {
        tracing::debug!("invoke: service={}, operation={}", SERVICE, operation);

        let body = serde_json::to_vec(input).context("Failed to serialize request")?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);

        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
            time: chrono::Utc::now(),
        };
        let extra = [("content-type", CONTENT_TYPE), ("x-amz-target", target.as_str())];

        let mut headers: Vec<(String, String)> = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        headers.extend(sign_request(&params, "POST", &self.endpoint, &extra, &body));

        self.http
            .post(self.endpoint.as_str(), &headers, body)
            .await
            .with_context(|| format!("{} failed", operation))
    }
}
