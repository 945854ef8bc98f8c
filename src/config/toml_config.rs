use crate::core::uploader::{DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_TABLE};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub appsheet: AppSheetConfig,
    pub upload: UploadConfig,
    /// Target column -> source field, layered over the built-in table.
    pub mapping: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "./Json/sell_out_final.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSheetConfig {
    pub base_url: String,
    pub app_id: Option<String>,
    pub access_key: Option<String>,
    pub table: String,
}

impl Default for AppSheetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: None,
            access_key: None,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub batch_size: usize,
    pub timeout_seconds: Option<u64>,
    pub dry_run: bool,
    pub output_path: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_seconds: None,
            dry_run: false,
            output_path: "./output".to_string(),
        }
    }
}

impl TomlConfig {
    /// Load a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse config text, expanding `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SyncError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Credentials are only required when the request is actually sent.
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_url("appsheet.base_url", &self.appsheet.base_url)?;

        if !self.upload.dry_run {
            let app_id =
                validation::validate_required_field("appsheet.app_id", &self.appsheet.app_id)?;
            validation::validate_non_empty_string("appsheet.app_id", app_id)?;

            let access_key = validation::validate_required_field(
                "appsheet.access_key",
                &self.appsheet.access_key,
            )?;
            validation::validate_non_empty_string("appsheet.access_key", access_key)?;
        }

        validation::validate_non_empty_string("appsheet.table", &self.appsheet.table)?;
        validation::validate_positive_number("upload.batch_size", self.upload.batch_size, 1)?;

        if let Some(timeout) = self.upload.timeout_seconds {
            if timeout == 0 {
                return Err(SyncError::InvalidConfigValueError {
                    field: "upload.timeout_seconds".to_string(),
                    value: timeout.to_string(),
                    reason: "Timeout must be at least 1 second; omit it to use the client default"
                        .to_string(),
                });
            }
        }

        if self.upload.dry_run {
            validation::validate_path("upload.output_path", &self.upload.output_path)?;
        }

        if let Some(mapping) = &self.mapping {
            for (target, source) in mapping {
                validation::validate_non_empty_string(&format!("mapping.{}", target), source)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn base_url(&self) -> &str {
        &self.appsheet.base_url
    }

    fn app_id(&self) -> &str {
        self.appsheet.app_id.as_deref().unwrap_or_default()
    }

    fn access_key(&self) -> &str {
        self.appsheet.access_key.as_deref().unwrap_or_default()
    }

    fn table(&self) -> &str {
        &self.appsheet.table
    }

    fn batch_size(&self) -> usize {
        self.upload.batch_size
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.upload.timeout_seconds
    }

    fn dry_run(&self) -> bool {
        self.upload.dry_run
    }

    fn output_path(&self) -> &str {
        &self.upload.output_path
    }

    fn field_overrides(&self) -> Option<&BTreeMap<String, String>> {
        self.mapping.as_ref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
