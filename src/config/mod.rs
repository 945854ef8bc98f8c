pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Command line flags. Every value is optional so that it only overrides
/// what the config file (or the built-in default) already provides.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "sellout-sync")]
#[command(about = "Upload a sell-out JSON export to an AppSheet table")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON file holding an array of sell-out records
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long, env = "APPSHEET_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "APPSHEET_APP_ID")]
    pub app_id: Option<String>,

    #[arg(long, env = "APPSHEET_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Target table name
    #[arg(long)]
    pub table: Option<String>,

    /// Maximum number of rows sent; the rest are dropped
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Request timeout; the HTTP client default applies when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write the request body to the output path instead of sending it.
    /// App id and access key are not required in this mode.
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Layers the flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(input) = &self.input {
            config.source.path = input.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.appsheet.base_url = base_url.clone();
        }
        if let Some(app_id) = &self.app_id {
            config.appsheet.app_id = Some(app_id.clone());
        }
        if let Some(access_key) = &self.access_key {
            config.appsheet.access_key = Some(access_key.clone());
        }
        if let Some(table) = &self.table {
            config.appsheet.table = table.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.upload.batch_size = batch_size;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.upload.timeout_seconds = Some(timeout);
        }
        if self.dry_run {
            config.upload.dry_run = true;
        }
        if let Some(output_path) = &self.output_path {
            config.upload.output_path = output_path.clone();
        }
    }
}
