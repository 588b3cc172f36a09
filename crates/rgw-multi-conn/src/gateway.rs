//! Gateway descriptor

use crate::{Connection, ConnectionOptions, S3RestClient, SnsRestClient};
use std::sync::Arc;

/// One storage gateway endpoint under test, plus the client handles
/// created for it so far
///
/// Each slot starts empty and is filled by the `get_gateway_*` accessors.
/// Filled slots are never reset; they live as long as the gateway.
#[derive(Debug)]
pub struct Gateway {
    host: String,
    port: u16,
    ssl_port: u16,
    options: ConnectionOptions,
    pub(crate) connection: Option<Arc<Connection>>,
    pub(crate) secure_connection: Option<Arc<Connection>>,
    pub(crate) iam_connection: Option<Arc<Connection>>,
    pub(crate) sts_connection: Option<Arc<Connection>>,
    pub(crate) s3_client: Option<Arc<S3RestClient>>,
    pub(crate) sns_client: Option<Arc<SnsRestClient>>,
    pub(crate) temp_s3_client: Option<Arc<S3RestClient>>,
}

impl Gateway {
    /// Create a gateway listening on `host:port` with TLS disabled
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ssl_port: 0,
            options: ConnectionOptions::default(),
            connection: None,
            secure_connection: None,
            iam_connection: None,
            sts_connection: None,
            s3_client: None,
            sns_client: None,
            temp_s3_client: None,
        }
    }

    /// Enable TLS on the given port (0 disables it)
    pub fn with_ssl_port(mut self, ssl_port: u16) -> Self {
        self.ssl_port = ssl_port;
        self
    }

    /// Set the options used for every client built for this gateway
    pub fn with_options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn ssl_port(&self) -> u16 {
        self.ssl_port
    }

    pub fn has_ssl(&self) -> bool {
        self.ssl_port != 0
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Plaintext endpoint URL used by the REST clients
    pub fn endpoint_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Most recent temporary-credential client, if one was built
    pub fn temp_s3_client(&self) -> Option<&Arc<S3RestClient>> {
        self.temp_s3_client.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_gateway_is_empty() {
        let gw = Gateway::new("localhost", 8000);

        assert_eq!(gw.host(), "localhost");
        assert_eq!(gw.port(), 8000);
        assert_eq!(gw.ssl_port(), 0);
        assert!(!gw.has_ssl());
        assert!(gw.connection.is_none());
        assert!(gw.secure_connection.is_none());
        assert!(gw.iam_connection.is_none());
        assert!(gw.sts_connection.is_none());
        assert!(gw.s3_client.is_none());
        assert!(gw.sns_client.is_none());
        assert!(gw.temp_s3_client().is_none());
    }

    #[test]
    fn test_builder() {
        let gw = Gateway::new("10.0.0.2", 8001)
            .with_ssl_port(8443)
            .with_options(ConnectionOptions::default().with_timeout(Duration::from_secs(2)));

        assert!(gw.has_ssl());
        assert_eq!(gw.ssl_port(), 8443);
        assert_eq!(gw.options().timeout, Duration::from_secs(2));
        assert_eq!(gw.endpoint_url(), "http://10.0.0.2:8001");
    }
}
