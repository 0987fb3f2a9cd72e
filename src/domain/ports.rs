use crate::config::credentials::Credentials;
use crate::domain::model::ResolvedCall;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;
}

/// Sends one resolved call and returns the decoded response body.
/// Non-2xx responses must surface as errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, call: &ResolvedCall) -> Result<Value>;
}
