//! Cached accessors for gateway clients
//!
//! Every accessor except [`get_gateway_temp_s3_client`] builds its client on
//! first use and hands out the same `Arc` on every later call for that
//! gateway. Construction errors are returned as-is and leave the slot empty.

use crate::{
    ConnectParams, Connection, Credentials, Gateway, RestParams, Result, S3RestClient, Service,
    SnsRestClient,
};
use std::sync::Arc;
use tracing::{instrument, trace};

fn connect(
    gateway: &Gateway,
    credentials: &Credentials,
    service: Service,
    port: u16,
    is_secure: bool,
) -> Result<Arc<Connection>> {
    let params = ConnectParams {
        service,
        credentials,
        host: gateway.host(),
        port,
        is_secure,
        validate_certs: !is_secure,
    };
    Connection::connect(params, gateway.options()).map(Arc::new)
}

/// Plain object storage connection on the gateway's plaintext port
#[instrument(skip_all, fields(host = %gateway.host(), port = gateway.port()))]
pub fn get_gateway_connection(
    gateway: &mut Gateway,
    credentials: &Credentials,
) -> Result<Arc<Connection>> {
    if let Some(conn) = &gateway.connection {
        trace!("reusing s3 connection");
        return Ok(Arc::clone(conn));
    }
    let conn = connect(gateway, credentials, Service::S3, gateway.port(), false)?;
    Ok(Arc::clone(gateway.connection.insert(conn)))
}

/// TLS object storage connection, without certificate validation
///
/// Returns `Ok(None)` when the gateway has no TLS port configured.
#[instrument(skip_all, fields(host = %gateway.host(), ssl_port = gateway.ssl_port()))]
pub fn get_gateway_secure_connection(
    gateway: &mut Gateway,
    credentials: &Credentials,
) -> Result<Option<Arc<Connection>>> {
    if !gateway.has_ssl() {
        return Ok(None);
    }
    if let Some(conn) = &gateway.secure_connection {
        trace!("reusing secure s3 connection");
        return Ok(Some(Arc::clone(conn)));
    }
    let conn = connect(gateway, credentials, Service::S3, gateway.ssl_port(), true)?;
    Ok(Some(Arc::clone(gateway.secure_connection.insert(conn))))
}

/// Connection to the gateway's IAM API
#[instrument(skip_all, fields(host = %gateway.host(), port = gateway.port()))]
pub fn get_gateway_iam_connection(
    gateway: &mut Gateway,
    credentials: &Credentials,
) -> Result<Arc<Connection>> {
    if let Some(conn) = &gateway.iam_connection {
        trace!("reusing iam connection");
        return Ok(Arc::clone(conn));
    }
    let conn = connect(gateway, credentials, Service::Iam, gateway.port(), false)?;
    Ok(Arc::clone(gateway.iam_connection.insert(conn)))
}

/// Connection to the gateway's STS API
#[instrument(skip_all, fields(host = %gateway.host(), port = gateway.port()))]
pub fn get_gateway_sts_connection(
    gateway: &mut Gateway,
    credentials: &Credentials,
) -> Result<Arc<Connection>> {
    if let Some(conn) = &gateway.sts_connection {
        trace!("reusing sts connection");
        return Ok(Arc::clone(conn));
    }
    let conn = connect(gateway, credentials, Service::Sts, gateway.port(), false)?;
    Ok(Arc::clone(gateway.sts_connection.insert(conn)))
}

/// S3 REST client for `http://{host}:{port}`
#[instrument(skip(gateway, credentials), fields(host = %gateway.host(), port = gateway.port()))]
pub fn get_gateway_s3_client(
    gateway: &mut Gateway,
    credentials: &Credentials,
    region: &str,
) -> Result<Arc<S3RestClient>> {
    if let Some(client) = &gateway.s3_client {
        trace!("reusing s3 client");
        return Ok(Arc::clone(client));
    }
    let endpoint_url = gateway.endpoint_url();
    let params = RestParams {
        endpoint_url: &endpoint_url,
        credentials,
        session_token: None,
        region,
    };
    let client = Arc::new(S3RestClient::s3(params, gateway.options())?);
    Ok(Arc::clone(gateway.s3_client.insert(client)))
}

/// SNS REST client for `http://{host}:{port}`
#[instrument(skip(gateway, credentials), fields(host = %gateway.host(), port = gateway.port()))]
pub fn get_gateway_sns_client(
    gateway: &mut Gateway,
    credentials: &Credentials,
    region: &str,
) -> Result<Arc<SnsRestClient>> {
    if let Some(client) = &gateway.sns_client {
        trace!("reusing sns client");
        return Ok(Arc::clone(client));
    }
    let endpoint_url = gateway.endpoint_url();
    let params = RestParams {
        endpoint_url: &endpoint_url,
        credentials,
        session_token: None,
        region,
    };
    let client = Arc::new(SnsRestClient::sns(params, gateway.options())?);
    Ok(Arc::clone(gateway.sns_client.insert(client)))
}

/// S3 REST client signing with temporary credentials
///
/// Always builds a fresh client; the previous one in the gateway's slot is
/// replaced.
#[instrument(skip(gateway, credentials, session_token), fields(host = %gateway.host(), port = gateway.port()))]
pub fn get_gateway_temp_s3_client(
    gateway: &mut Gateway,
    credentials: &Credentials,
    session_token: &str,
    region: &str,
) -> Result<Arc<S3RestClient>> {
    let endpoint_url = gateway.endpoint_url();
    let params = RestParams {
        endpoint_url: &endpoint_url,
        credentials,
        session_token: Some(session_token),
        region,
    };
    let client = Arc::new(S3RestClient::s3(params, gateway.options())?);
    Ok(Arc::clone(gateway.temp_s3_client.insert(client)))
}
