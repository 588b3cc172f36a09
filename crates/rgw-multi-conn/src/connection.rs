//! Legacy connection handle

use crate::signer::{self, SigningParams, UNSIGNED_PAYLOAD};
use crate::{ConnError, ConnectionOptions, Credentials, Result, Service};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response};
use time::OffsetDateTime;
use tracing::{debug, trace};
use url::Url;

/// Parameters for opening a connection to one API surface of a gateway
#[derive(Clone, Debug)]
pub struct ConnectParams<'a> {
    /// API surface
    pub service: Service,
    /// Credentials to authenticate with
    pub credentials: &'a Credentials,
    /// Gateway host
    pub host: &'a str,
    /// Gateway port
    pub port: u16,
    /// Use TLS
    pub is_secure: bool,
    /// Verify the server certificate (only meaningful with TLS)
    pub validate_certs: bool,
}

/// HTTP connection bound to a single gateway API surface
///
/// Requests sent through [`Connection::send`] are signed with AWS Signature
/// Version 4 using the connection's credentials. Object storage connections
/// use path-style addressing (`{endpoint}/{bucket}/{key}`). Opening a
/// connection sends no request.
#[derive(Debug)]
pub struct Connection {
    service: Service,
    credentials: Credentials,
    host: String,
    port: u16,
    is_secure: bool,
    validate_certs: bool,
    accept_invalid_certs: bool,
    signing_region: String,
    base_url: Url,
    http: Client,
}

impl Connection {
    /// Open a connection with the given parameters
    pub fn connect(params: ConnectParams<'_>, options: &ConnectionOptions) -> Result<Self> {
        let scheme = if params.is_secure { "https" } else { "http" };
        let endpoint = format!("{}://{}:{}/", scheme, params.host, params.port);
        let base_url =
            Url::parse(&endpoint).map_err(|e| ConnError::invalid_endpoint(&endpoint, e))?;

        let accept_invalid_certs = params.is_secure && !params.validate_certs;
        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(ConnError::Http)?;

        debug!(
            service = %params.service,
            endpoint = %base_url,
            validate_certs = params.validate_certs,
            "opened gateway connection"
        );

        Ok(Self {
            service: params.service,
            credentials: params.credentials.clone(),
            host: params.host.to_string(),
            port: params.port,
            is_secure: params.is_secure,
            validate_certs: params.validate_certs,
            accept_invalid_certs,
            signing_region: options.signing_region.clone(),
            base_url,
            http,
        })
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.is_secure
    }

    pub fn validate_certs(&self) -> bool {
        self.validate_certs
    }

    /// Whether the HTTP client was built to accept any server certificate
    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn signing_region(&self) -> &str {
        &self.signing_region
    }

    /// Access key this connection authenticates with
    pub fn access_key(&self) -> &str {
        &self.credentials.access_key
    }

    /// Endpoint root, e.g. `http://localhost:8000/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Resolve a path against the endpoint root
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConnError::invalid_endpoint(path, e))
    }

    /// Path-style URL of an object
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url> {
        self.url_for(&format!("{}/{}", bucket, key.trim_start_matches('/')))
    }

    /// Start a request for `path` on this connection's HTTP client
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.url_for(path)?))
    }

    /// Sign and send a request built from [`Connection::request`]
    ///
    /// Object storage requests carry `x-amz-content-sha256`; streaming bodies
    /// are sent as `UNSIGNED-PAYLOAD`. IAM and STS requests need a buffered
    /// body.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut request = request.build()?;
        let payload_hash = match request.body().map(|body| body.as_bytes()) {
            None => signer::hex_sha256(b""),
            Some(Some(bytes)) => signer::hex_sha256(bytes),
            Some(None) if self.service == Service::S3 => UNSIGNED_PAYLOAD.to_string(),
            Some(None) => {
                return Err(ConnError::Signing(format!(
                    "{} requests need a buffered body",
                    self.service
                )))
            }
        };

        signer::sign(
            &mut request,
            &SigningParams {
                credentials: &self.credentials,
                region: &self.signing_region,
                service: self.service.as_str(),
                time: OffsetDateTime::now_utc(),
                payload_hash: &payload_hash,
                content_sha256_header: self.service == Service::S3,
            },
        )?;

        trace!(method = %request.method(), url = %request.url(), "sending signed request");
        Ok(self.http.execute(request).await?)
    }

    /// Call a query-protocol action (IAM, STS), e.g. `ListUsers`
    pub async fn action(&self, action: &str, params: &[(&str, &str)]) -> Result<Response> {
        let version = match self.service {
            Service::Iam => "2010-05-08",
            Service::Sts => "2011-06-15",
            Service::S3 => {
                return Err(ConnError::Config(format!(
                    "{} connections have no query actions",
                    self.service
                )))
            }
        };
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", action)
            .append_pair("Version", version)
            .extend_pairs(params)
            .finish();

        let request = self
            .request(Method::POST, "/")?
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body(body);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params<'a>(creds: &'a Credentials, host: &'a str) -> ConnectParams<'a> {
        ConnectParams {
            service: Service::S3,
            credentials: creds,
            host,
            port: 8000,
            is_secure: false,
            validate_certs: true,
        }
    }

    #[test]
    fn test_connect_plain() {
        let creds = Credentials::new("AK", "SK");
        let conn = Connection::connect(params(&creds, "localhost"), &ConnectionOptions::default())
            .unwrap();

        assert_eq!(conn.service(), Service::S3);
        assert_eq!(conn.host(), "localhost");
        assert_eq!(conn.port(), 8000);
        assert!(!conn.is_secure());
        assert_eq!(conn.access_key(), "AK");
        assert_eq!(conn.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_connect_secure_uses_https() {
        let creds = Credentials::new("AK", "SK");
        let conn = Connection::connect(
            ConnectParams {
                port: 8443,
                is_secure: true,
                validate_certs: false,
                ..params(&creds, "gw1.example.com")
            },
            &ConnectionOptions::default(),
        )
        .unwrap();

        assert!(conn.is_secure());
        assert!(!conn.validate_certs());
        assert!(conn.accepts_invalid_certs());
        assert_eq!(conn.base_url().as_str(), "https://gw1.example.com:8443/");
    }

    #[test]
    fn test_plain_connection_keeps_cert_checks() {
        let creds = Credentials::new("AK", "SK");
        let conn = Connection::connect(
            ConnectParams {
                validate_certs: false,
                ..params(&creds, "localhost")
            },
            &ConnectionOptions::default(),
        )
        .unwrap();

        assert!(!conn.accepts_invalid_certs());
        assert_eq!(conn.signing_region(), "us-east-1");
    }

    #[tokio::test]
    async fn test_s3_connection_has_no_actions() {
        let creds = Credentials::new("AK", "SK");
        let conn = Connection::connect(params(&creds, "localhost"), &ConnectionOptions::default())
            .unwrap();

        let err = conn.action("ListUsers", &[]).await.unwrap_err();
        assert!(matches!(err, ConnError::Config(_)));
    }

    #[test]
    fn test_malformed_host() {
        let creds = Credentials::new("AK", "SK");
        let err = Connection::connect(params(&creds, "bad host"), &ConnectionOptions::default())
            .unwrap_err();
        assert!(err.is_invalid_endpoint());
    }

    #[test]
    fn test_object_url_is_path_style() {
        let creds = Credentials::new("AK", "SK");
        let conn = Connection::connect(params(&creds, "localhost"), &ConnectionOptions::default())
            .unwrap();

        assert_eq!(
            conn.object_url("bucket", "dir/obj.txt").unwrap().as_str(),
            "http://localhost:8000/bucket/dir/obj.txt"
        );
        assert_eq!(
            conn.url_for("/bucket?versioning").unwrap().as_str(),
            "http://localhost:8000/bucket?versioning"
        );
    }
}
