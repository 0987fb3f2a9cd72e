pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalRecordIo, CliConfig};

pub use adapters::http::ReqwestTransport;
pub use config::credentials::{AuthProfile, Credentials, Environment};
pub use config::{toml_config::TomlConfig, ConnectorSettings};
pub use crate::core::{dispatcher::Dispatcher, resolver::RequestResolver};
pub use domain::model::{Operation, OperationRequest, Payload, ResultRecord};
pub use utils::error::{ConnectorError, Result};
