//! CSV export for fetched and aggregated records.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::types::{PipelineResult, Record};

/// Writes `.csv` files into a single output directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Create an exporter, creating `output_dir` if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> PipelineResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if !output_dir.exists() {
            std::fs::create_dir_all(&output_dir)?;
            tracing::info!("Created output directory: {}", output_dir.display());
        }
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full path for an export named `name` (no extension).
    pub fn export_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.csv"))
    }

    /// Write records with a header taken from the first record's keys.
    ///
    /// Returns `Ok(None)` when there is nothing to write.
    pub fn export_records(&self, records: &[Record], name: &str) -> PipelineResult<Option<PathBuf>> {
        let Some(first) = records.first() else {
            tracing::warn!("No data to export for {name}");
            return Ok(None);
        };

        let header: Vec<&String> = first.keys().collect();
        let path = self.export_path(name);
        let mut writer = csv::Writer::from_path(&path)?;

        writer.write_record(&header)?;
        for record in records {
            writer.write_record(header.iter().map(|key| cell(record.get(key.as_str()))))?;
        }
        writer.flush()?;

        tracing::info!(
            "Successfully exported {} rows to {}",
            records.len(),
            path.display()
        );
        Ok(Some(path))
    }

    /// Write a flat `key,value` table.
    pub fn export_aggregated(&self, data: &Record, name: &str) -> PipelineResult<Option<PathBuf>> {
        if data.is_empty() {
            tracing::warn!("No aggregated data to export for {name}");
            return Ok(None);
        }

        let path = self.export_path(name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["key", "value"])?;
        for (key, value) in data {
            writer.write_record([key.clone(), cell(Some(value))])?;
        }
        writer.flush()?;

        tracing::info!("Successfully exported aggregated data to {}", path.display());
        Ok(Some(path))
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn posts() -> Vec<Record> {
        serde_json::from_value(json!([
            { "userId": 1, "id": 1, "title": "hello, world", "body": "x" },
            { "userId": 1, "id": 2, "title": "plain", "body": "y" },
            { "userId": 2, "id": 3, "title": "nested", "body": { "k": 1 } }
        ]))
        .unwrap()
    }

    #[test]
    fn test_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/output");
        let exporter = CsvExporter::new(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(exporter.export_path("posts"), out.join("posts.csv"));
    }

    #[test]
    fn test_export_records() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();
        let path = exporter.export_records(&posts(), "posts_data").unwrap().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, vec!["userId", "id", "title", "body"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][2], "hello, world");
        assert_eq!(&rows[2][3], r#"{"k":1}"#);
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();
        let records: Vec<Record> =
            serde_json::from_value(json!([{ "a": 1, "b": 2 }, { "a": 3 }])).unwrap();
        let path = exporter.export_records(&records, "sparse").unwrap().unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "a,b\n1,2\n3,\n");
    }

    #[test]
    fn test_empty_input_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();
        assert!(exporter.export_records(&[], "none").unwrap().is_none());
        assert!(exporter.export_aggregated(&Record::new(), "none").unwrap().is_none());
        assert!(!exporter.export_path("none").exists());
    }

    #[test]
    fn test_export_aggregated() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();
        let mut data = Record::new();
        data.insert("total_items".into(), json!(10));
        data.insert("source".into(), json!("posts"));
        data.insert("fields".into(), json!(["id", "title"]));

        let path = exporter.export_aggregated(&data, "summary").unwrap().unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "key,value\ntotal_items,10\nsource,posts\nfields,\"[\"\"id\"\",\"\"title\"\"]\"\n"
        );
    }
}
