use crate::core::{CustomerRecord, CustomerSource};
use crate::utils::error::{CrmError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// JSON array export of the customers table, read from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CustomerSource for JsonFileSource {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>> {
        let data = tokio::fs::read(&self.path).await?;
        let value: serde_json::Value = serde_json::from_slice(&data)?;

        match value {
            serde_json::Value::Array(rows) => CustomerRecord::from_rows(&rows),
            _ => Err(CrmError::InvalidRecordError {
                row: 0,
                reason: format!("{} does not contain a JSON array", self.path.display()),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_exported_array() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"id": "a1", "city": "Lepe", "province": "huelva"}, {"id": "a2", "notes": "Provincia: Ceuta"}]"#,
        )
        .unwrap();

        let records = JsonFileSource::new(file.path()).fetch_customers().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city.as_deref(), Some("Lepe"));
        assert_eq!(records[1].notes.as_deref(), Some("Provincia: Ceuta"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = JsonFileSource::new("/nonexistent/clientes.json")
            .fetch_customers()
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::IoError(_)));
    }
}
