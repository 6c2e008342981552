//! JSON-over-HTTP plumbing shared by the car and auth calls.
//!
//! This is the boundary where transport failures become typed: a request that
//! never reached the server comes back as [`AppError::NetworkUnreachable`], a
//! non-2xx answer as [`AppError::Api`] carrying the best message the body
//! offers.

use std::time::Duration;

use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::app_error::AppError;

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        if base_url.trim().is_empty() {
            return Err(AppError::Configuration("Backend URL not configured".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| AppError::Configuration(format!("Invalid backend URL {trimmed}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Configuration(format!(
                "Backend URL {trimmed} cannot hold a path"
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Configuration("Backend URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder, AppError> {
        let url = self.url(segments)?;
        debug!("{method} {url}");
        let builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        Ok(match token.filter(|token| !token.is_empty()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn get_json<T>(&self, segments: &[&str], token: Option<&str>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::GET, segments, token)?)
            .await?;
        decode_body(response).await
    }

    pub async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let response = self
            .execute(self.request(method, segments, token)?.body(payload))
            .await?;
        decode_body(response).await
    }

    /// Sends a body-less request and discards whatever the server answers.
    pub async fn send_empty(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<(), AppError> {
        self.execute(self.request(method, segments, token)?).await?;
        Ok(())
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Backend answered {status}: {body}");
        Err(AppError::Api {
            status: status.as_u16(),
            message: parse_error_message(status, &body),
        })
    }
}

/// Reads the whole body, then decodes it with `serde_json` so a failure keeps
/// the decoder's own message (field, position) instead of a generic one.
async fn decode_body<T>(response: Response) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let bytes = response.bytes().await?;
    serde_json::from_slice::<T>(&bytes)
        .map_err(|e| AppError::Serialization(format!("Invalid response body: {e}")))
}

/// Picks `message`, then `error`, from a JSON error body; otherwise
/// `"Error <status>: <reason>"`.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|data| {
            ["message", "error"].iter().find_map(|key| {
                data.get(key)
                    .and_then(JsonValue::as_str)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| {
            format!(
                "Error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
        })
}
