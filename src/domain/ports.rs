use crate::domain::model::{Record, TransformResult, UploadOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn base_url(&self) -> &str;
    fn app_id(&self) -> &str;
    fn access_key(&self) -> &str;
    fn table(&self) -> &str;
    fn batch_size(&self) -> usize;
    fn timeout_seconds(&self) -> Option<u64>;
    fn dry_run(&self) -> bool;
    fn output_path(&self) -> &str;
    /// Target column -> source field overrides applied on top of the built-in table.
    fn field_overrides(&self) -> Option<&BTreeMap<String, String>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<UploadOutcome>;
}
