//! REST (AWS SDK) client handles

use crate::{ConnError, ConnectionOptions, Credentials, Result};
use tracing::debug;
use url::Url;

/// Object storage REST client
pub type S3RestClient = RestClient<aws_sdk_s3::Client>;

/// Notification REST client
pub type SnsRestClient = RestClient<aws_sdk_sns::Client>;

/// Parameters for building a REST client
#[derive(Clone, Debug)]
pub struct RestParams<'a> {
    /// Full endpoint URL, e.g. `http://localhost:8000`
    pub endpoint_url: &'a str,
    /// Credentials to sign requests with
    pub credentials: &'a Credentials,
    /// Session token for temporary credentials
    pub session_token: Option<&'a str>,
    /// Signing region
    pub region: &'a str,
}

impl RestParams<'_> {
    fn validate(&self) -> Result<()> {
        Url::parse(self.endpoint_url)
            .map_err(|e| ConnError::invalid_endpoint(self.endpoint_url, e))?;
        if self.region.is_empty() {
            return Err(ConnError::Config("region must not be empty".to_string()));
        }
        Ok(())
    }
}

/// An SDK client together with the parameters it was built from
#[derive(Debug)]
pub struct RestClient<C> {
    service: &'static str,
    endpoint_url: String,
    region: String,
    has_session_token: bool,
    client: C,
}

impl<C> RestClient<C> {
    /// Service name the client was built for (`s3`, `sns`)
    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Whether the client signs with temporary credentials
    pub fn has_session_token(&self) -> bool {
        self.has_session_token
    }

    /// Underlying SDK client
    pub fn client(&self) -> &C {
        &self.client
    }

    fn wrap(service: &'static str, params: &RestParams<'_>, client: C) -> Self {
        debug!(
            service,
            endpoint = params.endpoint_url,
            region = params.region,
            temporary = params.session_token.is_some(),
            "built REST client"
        );
        Self {
            service,
            endpoint_url: params.endpoint_url.to_string(),
            region: params.region.to_string(),
            has_session_token: params.session_token.is_some(),
            client,
        }
    }
}

impl RestClient<aws_sdk_s3::Client> {
    /// Build an object storage client (path-style addressing)
    pub fn s3(params: RestParams<'_>, options: &ConnectionOptions) -> Result<Self> {
        use aws_sdk_s3::config::{
            retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Builder, Credentials,
            Region,
        };

        params.validate()?;
        let credentials = Credentials::new(
            &params.credentials.access_key,
            &params.credentials.secret,
            params.session_token.map(str::to_string),
            None,
            "rgw-multi",
        );
        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(params.region.to_string()))
            .endpoint_url(params.endpoint_url)
            .force_path_style(true)
            .retry_config(RetryConfig::standard().with_max_attempts(options.max_attempts()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(options.timeout)
                    .build(),
            )
            .build();

        Ok(Self::wrap("s3", &params, aws_sdk_s3::Client::from_conf(config)))
    }
}

impl RestClient<aws_sdk_sns::Client> {
    /// Build a notification client
    pub fn sns(params: RestParams<'_>, options: &ConnectionOptions) -> Result<Self> {
        use aws_sdk_sns::config::{
            retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Builder, Credentials,
            Region,
        };

        params.validate()?;
        let credentials = Credentials::new(
            &params.credentials.access_key,
            &params.credentials.secret,
            params.session_token.map(str::to_string),
            None,
            "rgw-multi",
        );
        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(params.region.to_string()))
            .endpoint_url(params.endpoint_url)
            .retry_config(RetryConfig::standard().with_max_attempts(options.max_attempts()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(options.timeout)
                    .build(),
            )
            .build();

        Ok(Self::wrap("sns", &params, aws_sdk_sns::Client::from_conf(config)))
    }
}
