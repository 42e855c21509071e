// Tracking backend HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining and `{ success, ... }`
// envelope checking. Endpoint groups (locations, devices, settings) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::StatusEnvelope;
use crate::transport::TransportConfig;

/// Raw HTTP client for the tracking backend.
///
/// Every call is a single request: no retries, no caching. Non-2xx
/// responses and `success: false` envelopes become errors before the
/// caller sees any payload.
#[derive(Debug, Clone)]
pub struct TrackingClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TrackingClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `http://backend:3000/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// `endpoint(&["devices", imei, "config"])` on `http://host/api`
    /// yields `http://host/api/devices/{imei}/config`.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        parse_response(resp).await
    }

    /// Send a GET request with query parameters and decode the body.
    pub(crate) async fn get_with_query<T, Q>(&self, url: Url, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }

    /// Send a PUT request with a JSON body and decode the body.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }
}

/// Check HTTP status and the `success` flag, then decode the full body.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StatusEnvelope>(&body)
            .ok()
            .and_then(|env| env.message)
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(Error::Http {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(len = body.len(), "response body received");

    let envelope: StatusEnvelope =
        serde_json::from_str(&body).map_err(|e| deserialization_error(&e, &body))?;
    if !envelope.success {
        return Err(Error::Rejected {
            message: envelope
                .message
                .unwrap_or_else(|| "server reported success: false".into()),
        });
    }

    serde_json::from_str(&body).map_err(|e| deserialization_error(&e, &body))
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> TrackingClient {
        TrackingClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_appends_segments() {
        let c = client("http://backend:3000/api");
        let url = c.endpoint(&["location"]).unwrap();
        assert_eq!(url.as_str(), "http://backend:3000/api/location");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let c = client("http://backend:3000/api/");
        let url = c.endpoint(&["devices", "A123", "config"]).unwrap();
        assert_eq!(url.as_str(), "http://backend:3000/api/devices/A123/config");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let c = client("http://backend:3000/api");
        let url = c.endpoint(&["devices", "a/b", "config"]).unwrap();
        assert_eq!(url.as_str(), "http://backend:3000/api/devices/a%2Fb/config");
    }

    #[test]
    fn endpoint_rejects_cannot_be_a_base() {
        let c = client("mailto:ops@example.com");
        assert!(matches!(
            c.endpoint(&["location"]),
            Err(Error::InvalidBaseUrl(_))
        ));
    }
}
