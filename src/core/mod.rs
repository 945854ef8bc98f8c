pub mod etl;
pub mod mapper;
pub mod pipeline;
pub mod uploader;

pub use crate::domain::model::{Record, Row, TransformResult, UploadOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
