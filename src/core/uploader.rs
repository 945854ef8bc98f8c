use crate::core::ConfigProvider;
use crate::domain::model::{ActionRequest, UploadOutcome};
use crate::utils::error::{Result, SyncError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.appsheet.com/api/v2";
pub const DEFAULT_TABLE: &str = "sell_out";
/// Rows sent in the single upload request; anything past this is dropped.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

const ACCESS_KEY_PARAM: &str = "applicationAccessKey";

/// Location of one AppSheet table's `Action` endpoint.
#[derive(Debug, Clone)]
pub struct AppSheetEndpoint {
    base_url: String,
    app_id: String,
    access_key: String,
    table: String,
}

impl AppSheetEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        access_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            app_id: app_id.into(),
            access_key: access_key.into(),
            table: table.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.base_url(),
            config.app_id(),
            config.access_key(),
            config.table(),
        )
    }

    /// `{base}/apps/{app_id}/tables/{table}/Action?applicationAccessKey={key}`
    pub fn action_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| SyncError::InvalidConfigValueError {
            field: "appsheet.base_url".to_string(),
            value: self.base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| SyncError::ConfigError {
                message: format!("Base URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["apps", self.app_id.as_str(), "tables", self.table.as_str(), "Action"]);

        url.query_pairs_mut()
            .append_pair(ACCESS_KEY_PARAM, &self.access_key);

        Ok(url)
    }

    /// Same as [`action_url`](Self::action_url) with the access key masked, for logs.
    pub fn redacted_url(&self) -> String {
        match self.action_url() {
            Ok(mut url) => {
                url.set_query(None);
                url.query_pairs_mut().append_pair(ACCESS_KEY_PARAM, "***");
                url.to_string()
            }
            Err(_) => self.base_url.clone(),
        }
    }
}

/// Sends one `ActionRequest`. No retry; a failed request is reported through
/// the returned outcome rather than as an error.
pub struct Uploader {
    client: Client,
    endpoint: AppSheetEndpoint,
}

impl Uploader {
    pub fn new(endpoint: AppSheetEndpoint, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &AppSheetEndpoint {
        &self.endpoint
    }

    pub async fn upload(&self, request: &ActionRequest) -> UploadOutcome {
        match self.send(request).await {
            Ok(status) => UploadOutcome::Responded { status },
            Err(e) => UploadOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    async fn send(&self, request: &ActionRequest) -> Result<u16> {
        let url = self.endpoint.action_url()?;

        tracing::debug!(
            "POST {} with {} rows",
            self.endpoint.redacted_url(),
            request.rows.len()
        );
        // The request URL carries the access key; keep it out of the error text.
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| SyncError::ApiError(e.without_url()))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {}>", e.without_url()),
            };
            return Err(SyncError::RejectedError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(status.as_u16())
    }
}
