use std::path::{Path, PathBuf};
use std::sync::Arc;

use apify_client::ApifyClient;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::record::OutputRecord;
use crate::traits::{ResultSink, SinkError};

/// Appends one JSON object per line to a local file.
pub struct JsonlFileSink {
    path: PathBuf,
}

impl JsonlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultSink for JsonlFileSink {
    async fn push(&self, record: &OutputRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Pushes each record to an Apify dataset.
pub struct ApifyDatasetSink {
    client: Arc<ApifyClient>,
    dataset_id: String,
}

impl ApifyDatasetSink {
    pub fn new(client: Arc<ApifyClient>, dataset_id: impl Into<String>) -> Self {
        Self {
            client,
            dataset_id: dataset_id.into(),
        }
    }
}

#[async_trait]
impl ResultSink for ApifyDatasetSink {
    async fn push(&self, record: &OutputRecord) -> Result<(), SinkError> {
        self.client
            .push_dataset_items(&self.dataset_id, std::slice::from_ref(record))
            .await?;
        Ok(())
    }
}
