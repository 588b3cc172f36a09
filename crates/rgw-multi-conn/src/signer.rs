//! AWS Signature Version 4 request signing for legacy connections

use crate::{ConnError, Credentials, Result};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use sha2::{Digest, Sha256};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

pub(crate) const SIGN_V4_ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub(crate) const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

const AMZ_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]Z");
const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day]");

// Never part of the signature; reqwest may add or rewrite them after signing.
const IGNORED_HEADERS: &[&str] = &["authorization", "user-agent", "accept-encoding"];

type HmacSha256 = Hmac<Sha256>;

/// Everything needed to sign one request
pub(crate) struct SigningParams<'a> {
    pub credentials: &'a Credentials,
    pub region: &'a str,
    pub service: &'a str,
    pub time: OffsetDateTime,
    /// Hex SHA-256 of the body, or `UNSIGNED-PAYLOAD`
    pub payload_hash: &'a str,
    /// Send the payload hash as `x-amz-content-sha256` (object storage only)
    pub content_sha256_header: bool,
}

pub(crate) fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ConnError::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn format_time(t: OffsetDateTime, format: &[FormatItem<'static>]) -> Result<String> {
    t.format(format).map_err(|e| ConnError::Signing(e.to_string()))
}

pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date)?;
    let k_region = hmac_sha256(&k_date, region)?;
    let k_service = hmac_sha256(&k_region, service)?;
    hmac_sha256(&k_service, "aws4_request")
}

/// Percent-encode everything except the unreserved set
fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn canonical_query(request: &Request) -> String {
    let mut pairs: Vec<(String, String)> = request
        .url()
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn host_header(request: &Request) -> Result<String> {
    let url = request.url();
    let host = url
        .host_str()
        .ok_or_else(|| ConnError::Signing(format!("no host in {}", url)))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn trim_all(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn insert_header(request: &mut Request, name: &'static str, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value).map_err(|e| ConnError::Signing(e.to_string()))?;
    request.headers_mut().insert(name, value);
    Ok(())
}

/// Sign `request` in place, adding `x-amz-date`, optionally
/// `x-amz-content-sha256`, and `Authorization`
pub(crate) fn sign(request: &mut Request, params: &SigningParams<'_>) -> Result<()> {
    let amz_date = format_time(params.time, AMZ_DATE_FORMAT)?;
    let date = format_time(params.time, DATE_FORMAT)?;

    insert_header(request, "x-amz-date", &amz_date)?;
    if params.content_sha256_header {
        insert_header(request, "x-amz-content-sha256", params.payload_hash)?;
    }

    let mut headers: Vec<(String, String)> = vec![("host".to_string(), host_header(request)?)];
    for name in request.headers().keys() {
        let name = name.as_str();
        if name == "host" || IGNORED_HEADERS.contains(&name) {
            continue;
        }
        let values = request
            .headers()
            .get_all(name)
            .iter()
            .map(|v| v.to_str().map(trim_all))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ConnError::Signing(e.to_string()))?;
        headers.push((name.to_string(), values.join(",")));
    }
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let query = canonical_query(request);
    let canonical_request = [
        request.method().as_str(),
        request.url().path(),
        query.as_str(),
        canonical_headers.as_str(),
        signed_headers.as_str(),
        params.payload_hash,
    ]
    .join("\n");

    let scope = format!("{}/{}/{}/aws4_request", date, params.region, params.service);
    let request_hash = hex_sha256(canonical_request.as_bytes());
    let string_to_sign = [
        SIGN_V4_ALGORITHM,
        amz_date.as_str(),
        scope.as_str(),
        request_hash.as_str(),
    ]
    .join("\n");

    let key = signing_key(&params.credentials.secret, &date, params.region, params.service)?;
    let signature = hex::encode(hmac_sha256(&key, &string_to_sign)?);

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        SIGN_V4_ALGORITHM, params.credentials.access_key, scope, signed_headers, signature
    );
    let value =
        HeaderValue::from_str(&authorization).map_err(|e| ConnError::Signing(e.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}
