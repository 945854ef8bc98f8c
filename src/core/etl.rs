use crate::core::Pipeline;
use crate::domain::model::UploadOutcome;
use crate::utils::error::Result;

/// Counts gathered over one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub extracted: usize,
    pub transformed: usize,
    pub outcome: UploadOutcome,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract and transform errors propagate. The upload never fails the
    /// run: its outcome is logged and returned in the report.
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting sell-out sync");

        let records = self.pipeline.extract().await?;
        let extracted = records.len();
        tracing::info!("Extracted {} records", extracted);

        let transformed = self.pipeline.transform(records).await?;
        let transformed_count = transformed.rows.len();
        tracing::info!("Transformed {} records", transformed_count);

        let outcome = self.pipeline.load(transformed).await?;
        match &outcome {
            UploadOutcome::Responded { status } => tracing::info!("{}", status),
            UploadOutcome::Failed { error } => tracing::error!("{}", error),
            UploadOutcome::Skipped { path } => {
                tracing::info!("Dry run: request body written to {}", path)
            }
        }

        Ok(RunReport {
            extracted,
            transformed: transformed_count,
            outcome,
        })
    }
}
