//! AWS API interaction module
//!
//! This module provides the transport for the CloudWatch Logs JSON API:
//! credentials, SigV4 signing, the HTTP client, and the metric filter
//! operations built on top of them.
//!
//! # Module Structure
//!
//! - [`auth`] - Credential and region resolution
//! - [`sigv4`] - AWS Signature Version 4 request signing
//! - [`http`] - HTTP utilities for JSON protocol calls
//! - [`client`] - CloudWatch Logs client
//! - [`logs`] - Metric filter operations implementing the reconciler's API port
//!
//! # Example
//!
//! ```ignore
//! use cwfilter::aws::{auth::Credentials, LogsClient};
//!
//! fn example() -> anyhow::Result<()> {
//!     let credentials = Credentials::load("default")?;
//!     let client = LogsClient::new("us-east-1", credentials)?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod logs;
pub mod sigv4;

pub use client::LogsClient;
pub use http::format_api_error;
