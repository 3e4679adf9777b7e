//! Minimal GraphQL-over-HTTP transport shared by the stash-box and Stash
//! clients.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::error::{Result, SyncError};

const API_KEY_HEADER: &str = "ApiKey";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize + ?Sized> {
    query: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl fmt::Debug for GraphQlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.api_key.is_some())
            .finish()
    }
}

impl GraphQlClient {
    pub fn new(endpoint: Url, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tagsync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    /// Execute one operation and decode its `data` member into `T`.
    pub async fn execute<V, T>(&self, query: &str, variables: &V) -> Result<T>
    where
        V: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .json(&GraphQlRequest { query, variables });
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => SyncError::InvalidApiKey,
                429 => SyncError::RateLimited,
                code => SyncError::Http {
                    status: code,
                    message: summarize_body(&body),
                },
            });
        }

        let envelope: GraphQlResponse<T> = response.json().await?;
        decode_envelope(envelope)
    }
}

fn decode_envelope<T>(envelope: GraphQlResponse<T>) -> Result<T> {
    if !envelope.errors.is_empty() {
        return Err(SyncError::GraphQl(
            envelope.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    envelope.data.ok_or_else(|| {
        SyncError::InvalidResponse("response carried neither data nor errors".into())
    })
}

fn summarize_body(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
