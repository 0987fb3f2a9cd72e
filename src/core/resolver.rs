use crate::config::credentials::{AuthProfile, Credentials};
use crate::domain::model::{HttpMethod, Operation, OperationRequest, ResolvedCall};
use crate::utils::error::{ConnectorError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::BTreeMap;

pub const API_KEY_HEADER: &str = "WOLT-API-KEY";

/// Fixed operation table: method and path template with a `{venueId}` slot.
pub fn route(operation: Operation) -> (HttpMethod, &'static str) {
    match operation {
        Operation::GetMenu => (HttpMethod::Get, "/v2/venues/{venueId}/menu"),
        Operation::UpdateItems => (HttpMethod::Patch, "/venues/{venueId}/items"),
        Operation::UpdateInventory => (HttpMethod::Patch, "/venues/{venueId}/items/inventory"),
    }
}

/// Turns records into calls for one credential bundle.
#[derive(Debug, Clone)]
pub struct RequestResolver {
    credentials: Credentials,
    base_url: String,
}

impl RequestResolver {
    pub fn new(credentials: Credentials) -> Self {
        let base_url = credentials.environment.base_url().to_string();
        Self {
            credentials,
            base_url,
        }
    }

    /// 取代環境對應的 host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolve(&self, request: &OperationRequest) -> Result<ResolvedCall> {
        let operation: Operation = request.operation.parse()?;

        if request.venue_id.trim().is_empty() {
            return Err(ConnectorError::ValidationError {
                message: "venueId cannot be empty".to_string(),
            });
        }

        let (method, template) = route(operation);
        let url = format!(
            "{}{}",
            self.base_url,
            template.replace("{venueId}", &request.venue_id)
        );

        // GET 一律不帶 body
        let body = match method {
            HttpMethod::Get => None,
            HttpMethod::Patch => Some(request.data.to_body()?),
        };

        let (headers, basic_auth) = self.authentication();

        Ok(ResolvedCall {
            method,
            url,
            headers,
            basic_auth,
            body,
        })
    }

    fn authentication(&self) -> (BTreeMap<String, String>, Option<(String, String)>) {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let creds = &self.credentials;
        match creds.auth_profile {
            AuthProfile::ApiKey => {
                let token = STANDARD.encode(format!("{}:{}", creds.username, creds.password));
                headers.insert("Authorization".to_string(), format!("Basic {}", token));
                headers.insert(
                    API_KEY_HEADER.to_string(),
                    creds.api_key.clone().unwrap_or_default(),
                );
                (headers, None)
            }
            AuthProfile::Basic => (
                headers,
                Some((creds.username.clone(), creds.password.clone())),
            ),
        }
    }
}
