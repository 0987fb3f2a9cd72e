use crate::domain::model::{HttpMethod, ResolvedCall};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{ConnectorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// [`HttpTransport`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, call: &ResolvedCall) -> Result<Value> {
        let mut request = match call.method {
            HttpMethod::Get => self.client.get(&call.url),
            HttpMethod::Patch => self.client.patch(&call.url),
        };

        for (key, value) in &call.headers {
            request = request.header(key, value);
        }

        if let Some((username, password)) = &call.basic_auth {
            request = request.basic_auth(username, Some(password));
        }

        // 用 body() 而不是 json()，保留自訂的 Content-Type
        if let Some(body) = &call.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let text = response.text().await?;
        if !status.is_success() {
            return Err(ConnectorError::HttpStatusError {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(decode_body(&text))
    }
}

/// 空 body 回傳 null，非 JSON 內容原樣包成字串
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
