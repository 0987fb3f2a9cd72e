use clap::Parser;
use wolt_connector::utils::error::ErrorSeverity;
use wolt_connector::utils::{logger, validation::Validate};
use wolt_connector::{CliConfig, ConnectorError, Dispatcher, LocalRecordIo};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting wolt-connector");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Dispatch failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: &CliConfig) -> Result<(), ConnectorError> {
    let settings = config.resolve()?;
    settings.validate()?;
    tracing::info!(
        "Environment: {}, auth profile: {:?}",
        settings.credentials.environment,
        settings.credentials.auth_profile
    );

    let io = LocalRecordIo::new(config.input.clone(), config.output.clone());
    let records = io.read_records()?;
    tracing::info!("Loaded {} input record(s)", records.len());

    let dispatcher = Dispatcher::from_settings(&settings)?;

    // 中止時仍輸出已完成的結果
    let mut results = Vec::with_capacity(records.len());
    let outcome = dispatcher
        .dispatch_into(&records, settings.continue_on_fail, &mut results)
        .await;

    if outcome.is_err() && !results.is_empty() {
        tracing::warn!("Writing {} result(s) completed before the failure", results.len());
    }
    io.finish(&results, outcome)
}
