use clap::Parser;
use sellout_sync::config::LogFormat;
use sellout_sync::utils::{logger, validation::Validate};
use sellout_sync::{CliConfig, EtlEngine, LocalStorage, SyncPipeline, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting sellout-sync");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => TomlConfig::default(),
    };

    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::debug!(
        "Input: {}, table: {}, batch size: {}, dry run: {}",
        config.source.path,
        config.appsheet.table,
        config.upload.batch_size,
        config.upload.dry_run
    );

    let pipeline = SyncPipeline::new(LocalStorage::default(), config)?;
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        // A failed upload is logged by the engine and does not change the exit status.
        Ok(report) => {
            if !report.outcome.is_responded() {
                tracing::debug!("Run finished without a successful response");
            }
        }
        Err(e) => {
            tracing::error!("❌ Sync failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            return Err(e.into());
        }
    }

    Ok(())
}
