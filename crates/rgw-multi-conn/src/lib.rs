//! # RGW multisite connections
//!
//! Lazily created client handles for the gateways of a multisite test run.
//!
//! A [`Gateway`] describes one endpoint (host, plaintext port, optional TLS
//! port) and owns one cache slot per API surface. The `get_gateway_*`
//! accessors fill a slot on first use and return the same `Arc` handle
//! afterwards, so a test run reuses a single client per gateway and surface.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rgw_multi_conn::{get_gateway_iam_connection, get_gateway_s3_client, Credentials, Gateway};
//!
//! let mut gw = Gateway::new("localhost", 8000);
//! let creds = Credentials::new("AK", "SK");
//!
//! let s3 = get_gateway_s3_client(&mut gw, &creds, "us-east-1")?;
//! let again = get_gateway_s3_client(&mut gw, &creds, "us-east-1")?;
//! assert!(std::sync::Arc::ptr_eq(&s3, &again));
//!
//! // Legacy connections sign their requests with SigV4
//! let iam = get_gateway_iam_connection(&mut gw, &creds)?;
//! let users = iam.action("ListUsers", &[]).await?;
//! ```
//!
//! Accessors take `&mut Gateway`; callers sharing a gateway across threads
//! must put it behind their own lock.

mod config;
mod conn;
mod connection;
mod error;
mod gateway;
mod rest;
mod signer;
mod types;

pub use config::ConnectionOptions;
pub use connection::{ConnectParams, Connection};
pub use error::{ConnError, Result};
pub use gateway::Gateway;
pub use rest::{RestClient, RestParams, S3RestClient, SnsRestClient};
pub use types::*;

pub use conn::{
    get_gateway_connection, get_gateway_iam_connection, get_gateway_s3_client,
    get_gateway_secure_connection, get_gateway_sns_client, get_gateway_sts_connection,
    get_gateway_temp_s3_client,
};
