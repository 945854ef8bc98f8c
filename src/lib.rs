pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    etl::{EtlEngine, RunReport},
    mapper::FieldMapper,
    pipeline::SyncPipeline,
    uploader::{AppSheetEndpoint, Uploader},
};
pub use domain::model::{ActionRequest, UploadOutcome};
pub use utils::error::{Result, SyncError};
