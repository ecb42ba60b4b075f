// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::{Extraction, TransactionRecord};
use crate::report::StatementSummary;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes the records as `<label>.csv` with Date, Merchant, Amount columns.
    /// Undated records get an empty Date field.
    pub fn save_records(&self, label: &str, records: &[TransactionRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.csv", label));

        let mut writer = csv::Writer::from_path(&file_path)?;
        writer.write_record(["Date", "Merchant", "Amount"])?;
        for record in records {
            let date = record.date.map(|d| d.to_string()).unwrap_or_default();
            let amount = record.amount.to_string();
            writer.write_record([date.as_str(), record.merchant.as_str(), amount.as_str()])?;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!("Saved {} records to {}", records.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves the summary plus extraction metadata as `<label>_summary.json`
    pub fn save_summary(
        &self,
        label: &str,
        source: &Path,
        extraction: &Extraction,
        summary: &StatementSummary,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_summary.json", label));

        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "year_context": extraction.year_context,
            "shape": extraction.shape,
            "summary": summary,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved summary to {}", file_path.display());

        Ok(file_path)
    }
}
