use crate::domain::ports::CredentialProvider;
use crate::utils::error::{ConnectorError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const PRODUCTION_BASE_URL: &str = "https://pos-integration-service.wolt.com";
pub const SANDBOX_BASE_URL: &str = "https://pos-integration-service.development.dev.woltapi.com";

/// Which of the two fixed API hosts receives requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Production,
    #[default]
    Test,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Test => SANDBOX_BASE_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

// 只有完全等於 "production" 才打正式環境，其餘一律走 sandbox
impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        if value == "production" {
            Environment::Production
        } else {
            Environment::Test
        }
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        Environment::from(value.as_str())
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Environment::from(s))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How credentials are attached to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProfile {
    /// `Authorization: Basic ...` header built locally plus a `WOLT-API-KEY` header.
    #[default]
    ApiKey,
    /// Basic auth passed to the HTTP client, no API key header.
    Basic,
}

impl FromStr for AuthProfile {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "api_key" | "apikey" => Ok(AuthProfile::ApiKey),
            "basic" => Ok(AuthProfile::Basic),
            other => Err(ConnectorError::InvalidConfigValueError {
                field: "auth_profile".to_string(),
                value: other.to_string(),
                reason: "Expected one of: api_key, basic".to_string(),
            }),
        }
    }
}

/// The `woltApi` credential bundle.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub auth_profile: AuthProfile,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            api_key: None,
            environment: Environment::default(),
            auth_profile: AuthProfile::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_auth_profile(mut self, auth_profile: AuthProfile) -> Self {
        self.auth_profile = auth_profile;
        self
    }

    /// 從 WOLT_* 環境變數讀取
    pub fn from_env() -> Result<Self> {
        let username = env::var("WOLT_USERNAME").map_err(|_| ConnectorError::MissingConfigError {
            field: "WOLT_USERNAME".to_string(),
        })?;
        let password = env::var("WOLT_PASSWORD").map_err(|_| ConnectorError::MissingConfigError {
            field: "WOLT_PASSWORD".to_string(),
        })?;

        let auth_profile = match env::var("WOLT_AUTH_PROFILE") {
            Ok(value) => value.parse()?,
            Err(_) => AuthProfile::default(),
        };

        Ok(Self {
            username,
            password,
            api_key: env::var("WOLT_API_KEY").ok().filter(|key| !key.is_empty()),
            environment: env::var("WOLT_ENVIRONMENT")
                .map(Environment::from)
                .unwrap_or_default(),
            auth_profile,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("environment", &self.environment)
            .field("auth_profile", &self.auth_profile)
            .finish()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("credentials.username", &self.username)?;
        validate_non_empty_string("credentials.password", &self.password)?;

        if self.auth_profile == AuthProfile::ApiKey {
            let api_key = validate_required_field("credentials.api_key", &self.api_key)?;
            validate_non_empty_string("credentials.api_key", api_key)?;
        }

        Ok(())
    }
}

/// Credentials resolved from `WOLT_*` environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials> {
        Credentials::from_env()
    }
}
