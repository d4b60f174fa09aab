// API client module: a small blocking HTTP client for the MeisterTask REST
// API. Requests are plain authenticated GETs; the body comes back as raw
// bytes and the caller decides how to decode it.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use tracing::debug;

/// Fixed client identifier sent with every request.
pub const CLIENT_ID: &str = concat!("meistertask-cli/", env!("CARGO_PKG_VERSION"));

/// Anything that can perform an authenticated GET and hand back the body.
///
/// Implementations map non-success HTTP statuses to errors so callers only
/// ever decode successful bodies.
pub trait Transport {
    fn get(&self, url: &str, token: &str) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, token: &str) -> Result<Vec<u8>> {
        (**self).get(url, token)
    }
}

/// `reqwest`-backed transport used by the binary.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Build a client whose requests are bounded by the configured timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(ApiClient { client })
    }

    fn headers(token: &str) -> Result<HeaderMap> {
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::Request(format!("invalid token header: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_ID));
        Ok(headers)
    }
}

impl Transport for ApiClient {
    fn get(&self, url: &str, token: &str) -> Result<Vec<u8>> {
        debug!(%url, "GET");
        let res = self.client.get(url).headers(Self::headers(token)?).send()?;

        let status = res.status();
        let body = res.bytes()?.to_vec();
        debug!(%url, status = status.as_u16(), bytes = body.len(), "response");

        check_status(status, url, &body)?;
        Ok(body)
    }
}

/// Turn a non-success status into the matching error kind.
fn check_status(status: StatusCode, url: &str, body: &[u8]) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized {
            status: status.as_u16(),
        }),
        StatusCode::NOT_FOUND => Err(Error::NotFound {
            url: url.to_string(),
        }),
        _ => Err(Error::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).trim().to_string(),
        }),
    }
}
