use crate::domain::model::DrawRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Remote source of draw results.
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// Fetches draws from `start` onward, up to `end` when given.
    /// Order is whatever the source returns.
    async fn fetch(&self, start: u32, end: Option<u32>) -> Result<Vec<DrawRecord>>;
}

/// Local persistence of the whole record collection. Single writer only.
pub trait RecordStore: Send + Sync {
    fn save(&self, records: &[DrawRecord]) -> Result<()>;

    /// Missing or empty backing storage yields an empty collection.
    fn load(&self) -> Result<Vec<DrawRecord>>;

    fn latest_period(&self) -> Result<Option<u32>> {
        Ok(self.load()?.first().and_then(DrawRecord::period_number))
    }
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn storage_path(&self) -> &Path;
}
