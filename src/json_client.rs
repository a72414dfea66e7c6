use std::time::Duration;

use crate::errors::AppError;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

/// A JSON-over-HTTP client bound to one endpoint.
#[derive(Clone, Debug)]
pub struct JsonClient {
    endpoint: Url,
    client: Client,
}

/// Raw reply of a POST: status plus the body, kept both as text and, when
/// it parses, as JSON.
#[derive(Debug, Clone)]
pub struct JsonReply {
    pub status: StatusCode,
    pub text: String,
    pub json: Option<Value>,
}

impl JsonReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// String field at the top level of the body, if present.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.json.as_ref()?.get(field)?.as_str()
    }

    pub fn parse<T>(&self, endpoint: &Url) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.text).map_err(|e| {
            error!(
                url = %endpoint,
                status = %self.status,
                response_body = %self.text,
                error = %e,
                "JsonClient failed to parse response"
            );
            e
        })
    }
}

impl JsonClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Client(format!("failed to build client: {e}")))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POSTs `body` as JSON. Non-success statuses are returned, not raised;
    /// only transport failures are errors.
    pub async fn post<B>(&self, body: &B) -> Result<JsonReply, reqwest::Error>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let json = serde_json::from_str::<Value>(&text).ok();

        debug!(url = %self.endpoint, %status, "JsonClient POST");

        Ok(JsonReply { status, text, json })
    }
}
