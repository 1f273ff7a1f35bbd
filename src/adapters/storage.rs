use crate::domain::model::{sort_descending, DrawRecord};
use crate::domain::ports::{ConfigProvider, RecordStore};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Column names of the cache file, in order.
pub const CSV_HEADERS: [&str; 9] = [
    "times", "rb1", "rb2", "rb3", "rb4", "rb5", "rb6", "bb", "dates",
];

/// One cache row. Field order is the file's column order.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    times: String,
    rb1: String,
    rb2: String,
    rb3: String,
    rb4: String,
    rb5: String,
    rb6: String,
    bb: String,
    dates: String,
}

impl From<&DrawRecord> for CsvRow {
    fn from(record: &DrawRecord) -> Self {
        let [rb1, rb2, rb3, rb4, rb5, rb6] = record.red_balls.clone();
        Self {
            times: record.period.clone(),
            rb1,
            rb2,
            rb3,
            rb4,
            rb5,
            rb6,
            bb: record.blue_ball.clone(),
            dates: record.date.clone(),
        }
    }
}

impl From<CsvRow> for DrawRecord {
    fn from(row: CsvRow) -> Self {
        DrawRecord::new(
            row.times,
            row.dates,
            [row.rb1, row.rb2, row.rb3, row.rb4, row.rb5, row.rb6],
            row.bb,
        )
    }
}

/// Draw cache kept in a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.storage_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvStore {
    /// Overwrites the cache with `records` in descending period order.
    fn save(&self, records: &[DrawRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut ordered = records.to_vec();
        sort_descending(&mut ordered);

        let mut writer = csv::Writer::from_path(&self.path)?;
        if ordered.is_empty() {
            writer.write_record(CSV_HEADERS)?;
        }
        for record in &ordered {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;

        tracing::debug!("Saved {} draws to {}", ordered.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Vec<DrawRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No cache at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // Files written by older tooling start with a BOM.
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let records = reader
            .deserialize::<CsvRow>()
            .map(|row| row.map(DrawRecord::from))
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        tracing::debug!("Loaded {} draws from {}", records.len(), self.path.display());
        Ok(records)
    }
}
