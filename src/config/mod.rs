#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod toml_config;

use crate::config::credentials::Credentials;
#[cfg(feature = "cli")]
use crate::config::credentials::{AuthProfile, EnvCredentials, Environment};
use crate::domain::ports::CredentialProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "wolt-connector")]
#[command(about = "Dispatch menu and inventory operations to the Wolt POS integration API")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file; WOLT_* environment variables are used when omitted")]
    pub config: Option<String>,

    #[arg(long, default_value = "-", help = "JSON array of input records, '-' for stdin")]
    pub input: String,

    #[arg(long, help = "Write results to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Record failures as error results instead of aborting")]
    pub continue_on_fail: bool,

    #[arg(long, help = "production or test")]
    pub environment: Option<Environment>,

    #[arg(long, help = "api_key or basic")]
    pub auth_profile: Option<AuthProfile>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// Effective settings for one dispatch run.
#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    pub credentials: Credentials,
    pub continue_on_fail: bool,
    pub timeout: Option<Duration>,
    pub base_url: Option<String>,
}

impl ConnectorSettings {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            continue_on_fail: false,
            timeout: None,
            base_url: None,
        }
    }

    pub fn from_toml(config: toml_config::TomlConfig) -> Self {
        Self {
            continue_on_fail: config.continue_on_fail(),
            timeout: config.timeout(),
            base_url: config.dispatch.base_url.clone(),
            credentials: config.credentials,
        }
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔 / 環境變數與命令列覆蓋值
    pub fn resolve(&self) -> Result<ConnectorSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let config = toml_config::TomlConfig::from_file(path)?;
                // 未展開的 ${VAR} 在這裡擋下，不會被當成帳密送出
                config.validate()?;
                ConnectorSettings::from_toml(config)
            }
            None => {
                tracing::debug!("No config file given, reading WOLT_* environment variables");
                ConnectorSettings::new(EnvCredentials.credentials()?)
            }
        };

        if let Some(environment) = self.environment {
            settings.credentials.environment = environment;
        }
        if let Some(auth_profile) = self.auth_profile {
            settings.credentials.auth_profile = auth_profile;
        }
        if self.continue_on_fail {
            settings.continue_on_fail = true;
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout = Some(Duration::from_secs(timeout));
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }

        Ok(settings)
    }
}

impl CredentialProvider for ConnectorSettings {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

impl Validate for ConnectorSettings {
    fn validate(&self) -> Result<()> {
        self.credentials.validate()?;

        if let Some(base_url) = &self.base_url {
            validate_url("base_url", base_url)?;
        }
        if let Some(timeout) = self.timeout {
            validate_positive_number("timeout_seconds", timeout.as_secs(), 1)?;
        }

        Ok(())
    }
}
