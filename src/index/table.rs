//! CSV persistence for the chunk table

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, instrument};

use crate::index::{ChunkRecord, IndexError};

/// Header row written to every chunk table
pub const TABLE_HEADERS: [&str; 4] = ["", "text", "n_tokens", "embeddings"];

type Result<T> = std::result::Result<T, IndexError>;

/// Ordered collection of embedded chunks
///
/// All records of a table share the same embedding dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkTable {
    records: Vec<ChunkRecord>,
}

impl ChunkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, checking that every embedding has the same dimension
    pub fn from_records(records: Vec<ChunkRecord>) -> Result<Self> {
        let mut table = Self::new();
        for record in records {
            table.push(record)?;
        }
        Ok(table)
    }

    /// Append a record
    pub fn push(&mut self, record: ChunkRecord) -> Result<()> {
        if let Some(dims) = self.dimensions() {
            if record.embeddings.len() != dims {
                return Err(IndexError::Data(format!(
                    "Embedding has {} dimensions, expected {}",
                    record.embeddings.len(),
                    dims
                )));
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[ChunkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimension shared by every record, if any
    pub fn dimensions(&self) -> Option<usize> {
        self.records.first().map(|r| r.embeddings.len())
    }

    /// Write the table as CSV, creating parent directories as needed
    #[instrument(skip(self), fields(rows = self.records.len()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(TABLE_HEADERS)?;
        for (idx, record) in self.records.iter().enumerate() {
            writer.write_record([
                idx.to_string(),
                record.text.clone(),
                record.n_tokens.to_string(),
                serde_json::to_string(&record.embeddings)?,
            ])?;
        }
        writer.flush()?;

        debug!("Wrote {} chunks to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Read a table written by [`ChunkTable::save`]
    ///
    /// Columns are located by header name, so the row index column is optional.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.trim().to_ascii_lowercase(), idx))
            .collect();

        let column = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| IndexError::Data(format!("Missing column {}", name)))
        };
        let text_col = column("text")?;
        let tokens_col = column("n_tokens")?;
        let embeddings_col = column("embeddings")?;

        let mut table = Self::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let field = |col: usize| record.get(col).unwrap_or_default();

            let n_tokens = field(tokens_col).trim().parse::<usize>().map_err(|e| {
                IndexError::Data(format!("Row {}: invalid n_tokens: {}", row, e))
            })?;
            let embeddings: Vec<f64> = serde_json::from_str(field(embeddings_col))
                .map_err(|e| IndexError::Data(format!("Row {}: invalid embeddings: {}", row, e)))?;

            table.push(ChunkRecord::new(field(text_col), n_tokens, embeddings))?;
        }

        debug!("Loaded {} chunks from {}", table.len(), path.display());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ChunkTable {
        ChunkTable::from_records(vec![
            ChunkRecord::new("OpenAI builds models.", 3, vec![0.1, -0.2, 0.3]),
            ChunkRecord::new("Text with, commas\nand \"quotes\"", 5, vec![1.0, 0.0, 0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("embeddings.csv");

        let table = sample_table();
        table.save(&path).unwrap();
        let loaded = ChunkTable::load(&path).unwrap();

        assert_eq!(loaded, table);
        assert_eq!(loaded.dimensions(), Some(3));
    }

    #[test]
    fn test_saved_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.csv");
        sample_table().save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(",text,n_tokens,embeddings"));
        assert_eq!(
            lines.next(),
            Some("0,OpenAI builds models.,3,\"[0.1,-0.2,0.3]\"")
        );
    }

    #[test]
    fn test_load_without_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.csv");
        std::fs::write(&path, "text,n_tokens,embeddings\nhello,1,\"[1.0, 2.0]\"\n").unwrap();

        let table = ChunkTable::load(&path).unwrap();
        assert_eq!(table.records(), &[ChunkRecord::new("hello", 1, vec![1.0, 2.0])]);
    }

    #[test]
    fn test_load_malformed_embeddings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.csv");
        std::fs::write(&path, ",text,n_tokens,embeddings\n0,hello,1,not a vector\n").unwrap();

        match ChunkTable::load(&path) {
            Err(IndexError::Data(msg)) => assert!(msg.contains("embeddings")),
            other => panic!("Expected data error, got {:?}", other),
        }
    }

    #[test]
    fn test_inconsistent_dimensions() {
        let result = ChunkTable::from_records(vec![
            ChunkRecord::new("a", 1, vec![1.0, 0.0]),
            ChunkRecord::new("b", 1, vec![1.0]),
        ]);
        assert!(matches!(result, Err(IndexError::Data(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChunkTable::load(&dir.path().join("absent.csv"));
        assert!(result.is_err());
    }
}
