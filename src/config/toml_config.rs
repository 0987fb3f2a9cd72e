use crate::config::credentials::Credentials;
use crate::utils::error::{ConnectorError, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_PLACEHOLDER: &str = r"\$\{([^}]+)\}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub credentials: Credentials,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub continue_on_fail: Option<bool>,
    pub timeout_seconds: Option<u64>,
    /// 覆蓋環境對應的 host，sandbox 代理或測試用
    pub base_url: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConnectorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConnectorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WOLT_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(ENV_PLACEHOLDER).map_err(|e| ConnectorError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn unresolved_placeholder(field: &str, value: &str) -> Result<()> {
        let re = Regex::new(ENV_PLACEHOLDER).map_err(|e| ConnectorError::ConfigError {
            message: e.to_string(),
        })?;

        if let Some(caps) = re.captures(value) {
            return Err(ConnectorError::MissingConfigError {
                field: format!("{} (environment variable {} is not set)", field, &caps[1]),
            });
        }
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        Self::unresolved_placeholder("credentials.username", &self.credentials.username)?;
        Self::unresolved_placeholder("credentials.password", &self.credentials.password)?;
        if let Some(api_key) = &self.credentials.api_key {
            Self::unresolved_placeholder("credentials.api_key", api_key)?;
        }

        self.credentials.validate()?;

        if let Some(base_url) = &self.dispatch.base_url {
            validate_url("dispatch.base_url", base_url)?;
        }

        if let Some(timeout) = self.dispatch.timeout_seconds {
            validate_positive_number("dispatch.timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }

    pub fn continue_on_fail(&self) -> bool {
        self.dispatch.continue_on_fail.unwrap_or(false)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.dispatch.timeout_seconds.map(Duration::from_secs)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.dispatch.base_url.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credentials::{AuthProfile, Environment};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[credentials]
username = "merchant"
password = "secret"
api_key = "key-123"
environment = "production"

[dispatch]
continue_on_fail = true
timeout_seconds = 15
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.credentials.username, "merchant");
        assert_eq!(config.credentials.environment, Environment::Production);
        assert_eq!(config.credentials.auth_profile, AuthProfile::ApiKey);
        assert!(config.continue_on_fail());
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_without_dispatch_section() {
        let toml_content = r#"
[credentials]
username = "merchant"
password = "secret"
auth_profile = "basic"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.credentials.environment, Environment::Test);
        assert_eq!(config.credentials.auth_profile, AuthProfile::Basic);
        assert!(!config.continue_on_fail());
        assert!(config.timeout().is_none());
        assert!(config.base_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TOML_TEST_WOLT_PASSWORD", "from-env");

        let toml_content = r#"
[credentials]
username = "merchant"
password = "${TOML_TEST_WOLT_PASSWORD}"
api_key = "key"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.credentials.password, "from-env");

        std::env::remove_var("TOML_TEST_WOLT_PASSWORD");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[credentials]
username = "merchant"
password = "secret"
api_key = "${TOML_TEST_SURELY_UNSET_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TOML_TEST_SURELY_UNSET_KEY"));
    }

    #[test]
    fn test_config_validation_rejects_bad_base_url() {
        let toml_content = r#"
[credentials]
username = "merchant"
password = "secret"
api_key = "key"

[dispatch]
base_url = "not-a-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[credentials]
username = "file-user"
password = "secret"
api_key = "key"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.credentials.username, "file-user");
    }
}
