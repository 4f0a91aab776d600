use reqwest::Client as HttpClient;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::BackendError;

/// How a provider expects its API key.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    Bearer(&'a str),
    GoogApiKey(&'a str),
}

/// Thin JSON-over-HTTP client shared by the provider backends.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub http: HttpClient,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self { http: HttpClient::new() }
    }

    fn with_auth(req: reqwest::RequestBuilder, auth: Auth<'_>) -> reqwest::RequestBuilder {
        match auth {
            Auth::Bearer(key) => req.bearer_auth(key),
            Auth::GoogApiKey(key) => req.header("x-goog-api-key", key),
        }
    }

    /// POST `body` as JSON and decode the JSON reply.
    /// Non-2xx answers become `BackendError::Status` with the response body.
    pub async fn post_json<B, R>(&self, endpoint: &str, auth: Auth<'_>, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = Self::with_auth(self.http.post(endpoint), auth).json(body);
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status: status.as_u16(), body });
        }
        resp.json::<R>().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// GET raw bytes, used for images.
    pub async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>, BackendError> {
        let resp = self.http.get(endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status { status: status.as_u16(), body: String::new() });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
