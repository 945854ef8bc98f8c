use crate::core::mapper::FieldMapper;
use crate::core::uploader::{AppSheetEndpoint, Uploader};
use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::domain::model::{ActionRequest, UploadOutcome};
use crate::utils::error::{Result, SyncError};
use std::collections::HashMap;

pub const PAYLOAD_FILENAME: &str = "payload.json";

/// Reads the sell-out export, renames its fields and pushes the first batch
/// of rows to AppSheet.
pub struct SyncPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    mapper: FieldMapper,
    uploader: Uploader,
}

impl<S: Storage, C: ConfigProvider> SyncPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let mapper = match config.field_overrides() {
            Some(overrides) => FieldMapper::with_overrides(overrides),
            None => FieldMapper::default(),
        };
        let uploader = Uploader::new(
            AppSheetEndpoint::from_config(&config),
            config.timeout_seconds(),
        )?;

        Ok(Self {
            storage,
            config,
            mapper,
            uploader,
        })
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    fn parse_records(raw: &[u8]) -> Result<Vec<Record>> {
        let json_data: serde_json::Value = serde_json::from_slice(raw)?;

        let serde_json::Value::Array(items) = json_data else {
            return Err(SyncError::InputFormatError {
                message: "top-level value is not an array".to_string(),
            });
        };

        let mut non_objects = 0usize;
        let records: Vec<Record> = items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(obj) => Record {
                    data: obj.into_iter().collect::<HashMap<_, _>>(),
                },
                _ => {
                    non_objects += 1;
                    Record::default()
                }
            })
            .collect();

        if non_objects > 0 {
            tracing::warn!(
                "{} input elements are not objects; their rows will carry no values",
                non_objects
            );
        }

        Ok(records)
    }

    async fn write_payload(&self, request: &ActionRequest) -> Result<String> {
        let path = format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            PAYLOAD_FILENAME
        );
        let body = serde_json::to_vec_pretty(request)?;

        tracing::debug!("Writing request body ({} bytes) to {}", body.len(), path);
        self.storage.write_file(&path, &body).await?;
        Ok(path)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SyncPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!("Reading input file: {}", self.config.input_path());
        let raw = self.storage.read_file(self.config.input_path()).await?;
        Self::parse_records(&raw)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        tracing::debug!("Mapping {} columns per record", self.mapper.len());
        Ok(TransformResult {
            rows: self.mapper.map_all(&data),
        })
    }

    async fn load(&self, result: TransformResult) -> Result<UploadOutcome> {
        let total = result.rows.len();
        let batch_size = self.config.batch_size();
        if total > batch_size {
            tracing::warn!(
                "Only the first {} of {} rows are uploaded; {} rows dropped",
                batch_size,
                total,
                total - batch_size
            );
        }

        let request = ActionRequest::add(result.rows, batch_size);

        if self.config.dry_run() {
            let path = self.write_payload(&request).await?;
            return Ok(UploadOutcome::Skipped { path });
        }

        tracing::info!(
            "Sending {} rows to {}",
            request.rows.len(),
            self.uploader.endpoint().redacted_url()
        );
        Ok(self.uploader.upload(&request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_input(path: &str, data: &serde_json::Value) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), serde_json::to_vec(data).unwrap());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SyncError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn config(base_url: &str, extra: &str) -> TomlConfig {
        TomlConfig::from_toml_str(&format!(
            r#"
[source]
path = "input.json"

[appsheet]
base_url = "{}"
app_id = "app"
access_key = "key"

[upload]
output_path = "out"
{}
"#,
            base_url, extra
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_extract_reads_array_of_objects() {
        let storage = MockStorage::with_input(
            "input.json",
            &json!([{"SEGMENT3": "A", "NAME": "X"}, {"SEGMENT3": "B"}]),
        );
        let pipeline = SyncPipeline::new(storage, config("http://localhost", "")).unwrap();

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("NAME"), Some(&json!("X")));
    }

    #[tokio::test]
    async fn test_extract_rejects_non_array() {
        let storage = MockStorage::with_input("input.json", &json!({"SEGMENT3": "A"}));
        let pipeline = SyncPipeline::new(storage, config("http://localhost", "")).unwrap();

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SyncError::InputFormatError { .. }));
    }

    #[tokio::test]
    async fn test_extract_missing_file_fails() {
        let storage = MockStorage::with_input("other.json", &json!([]));
        let pipeline = SyncPipeline::new(storage, config("http://localhost", "")).unwrap();

        assert!(matches!(
            pipeline.extract().await,
            Err(SyncError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_non_object_elements_become_empty_records() {
        let storage = MockStorage::with_input("input.json", &json!([1, "x", {"NAME": "Y"}]));
        let pipeline = SyncPipeline::new(storage, config("http://localhost", "")).unwrap();

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].data.is_empty());
        assert_eq!(records[2].get("NAME"), Some(&json!("Y")));
    }

    #[tokio::test]
    async fn test_load_truncates_to_batch_size() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/apps/app/tables/sell_out/Action")
                .json_body(json!({
                    "Action": "Add",
                    "Properties": {},
                    "Rows": [{"trx_numero": 0}, {"trx_numero": 1}]
                }));
            then.status(200);
        });

        let records: Vec<serde_json::Value> =
            (0..5).map(|i| json!({"TRX_NUMBER": i})).collect();
        let storage = MockStorage::with_input("input.json", &json!(records));
        let pipeline =
            SyncPipeline::new(storage, config(&server.base_url(), "batch_size = 2")).unwrap();

        let records = pipeline.extract().await.unwrap();
        let transformed = pipeline.transform(records).await.unwrap();
        assert_eq!(transformed.rows.len(), 5);

        let outcome = pipeline.load(transformed).await.unwrap();
        api_mock.assert();
        assert_eq!(outcome, UploadOutcome::Responded { status: 200 });
    }

    #[tokio::test]
    async fn test_dry_run_writes_payload_without_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let storage = MockStorage::with_input("input.json", &json!([{"NAME": "X"}]));
        let pipeline = SyncPipeline::new(
            storage.clone(),
            config(&server.base_url(), "dry_run = true"),
        )
        .unwrap();

        let records = pipeline.extract().await.unwrap();
        let transformed = pipeline.transform(records).await.unwrap();
        let outcome = pipeline.load(transformed).await.unwrap();

        api_mock.assert_hits(0);
        assert_eq!(
            outcome,
            UploadOutcome::Skipped {
                path: "out/payload.json".to_string()
            }
        );

        let written = storage.get_file("out/payload.json").await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(body["Rows"], json!([{"nombre": "X"}]));
    }

    #[tokio::test]
    async fn test_mapping_overrides_from_config() {
        let storage = MockStorage::with_input("input.json", &json!([{"Codigo EAN": "7501"}]));
        let pipeline = SyncPipeline::new(
            storage,
            config("http://localhost", "\n[mapping]\nean = \"Codigo EAN\""),
        )
        .unwrap();

        let records = pipeline.extract().await.unwrap();
        let transformed = pipeline.transform(records).await.unwrap();
        assert_eq!(transformed.rows[0].get("ean"), Some(&json!("7501")));
    }
}
