//! HTTP utilities for AWS JSON protocol calls

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip control characters for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Extract the service error code (`__type`) from an error body
///
/// The code may carry a namespace prefix, e.g.
/// `com.amazonaws.logs#ResourceNotFoundException`.
fn error_code(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let code = value.get("__type")?.as_str()?;
    Some(code.rsplit('#').next().unwrap_or(code).to_string())
}

/// HTTP client wrapper for AWS API calls
#[derive(Clone)]
pub struct AwsHttpClient {
    client: Client,
}

impl AwsHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cwfilter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// POST a signed request body and parse the JSON response
    ///
    /// An empty success body is returned as `Value::Null`.
    pub async fn post(&self, url: &str, headers: &[(String, String)], body: Vec<u8>) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(match error_code(&response_body) {
                Some(code) => anyhow::anyhow!("API request failed: {} ({})", status, code),
                None => anyhow::anyhow!("API request failed: {}", status),
            });
        }

        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }
}

/// Format an API error for display
pub fn format_api_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut error_str = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        error_str.push_str(": ");
        error_str.push_str(&inner.to_string());
        source = inner.source();
    }

    if error_str.contains("ResourceNotFoundException") {
        return "Log group or metric filter not found.".to_string();
    }
    if error_str.contains("LimitExceededException") {
        return "Metric filter limit reached for this log group.".to_string();
    }
    if error_str.contains("InvalidParameterException") {
        return "Invalid request. Check the filter definition.".to_string();
    }
    if error_str.contains("403") {
        return "Permission denied. Check your IAM permissions.".to_string();
    }
    if error_str.contains("401") {
        return "Authentication failed. Check your AWS credentials.".to_string();
    }
    if error_str.contains("429") || error_str.contains("ThrottlingException") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("400") {
        return "Invalid request. Check your parameters.".to_string();
    }
    if error_str.contains("500") || error_str.contains("503") {
        return "CloudWatch Logs temporarily unavailable. Please try again.".to_string();
    }
    if error_str.contains("API request failed") {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
