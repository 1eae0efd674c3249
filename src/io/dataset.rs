//! CSV dataset load/store.
//!
//! Cells are kept as raw strings: the synthesizer never interprets the
//! original columns, so a load → store round-trip must reproduce every value
//! exactly. Ragged rows are a read error rather than something we repair.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tempfile::NamedTempFile;

use crate::error::AppError;

/// An in-memory delimited table: a header row plus string rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        let wanted = normalize_header_name(name);
        self.headers.iter().any(|h| normalize_header_name(h) == wanted)
    }

    /// Insert a new first column. `values` must hold exactly one entry per row.
    pub fn prepend_column(&mut self, name: &str, values: Vec<String>) -> Result<(), AppError> {
        if values.len() != self.rows.len() {
            return Err(AppError::invariant(format!(
                "Column `{name}` has {} values but the dataset has {} rows.",
                values.len(),
                self.rows.len()
            )));
        }
        self.headers.insert(0, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(0, value);
        }
        Ok(())
    }
}

/// Load a comma-delimited file with a header row.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers from '{}': {e}", path.display())))?
        .clone();

    if headers.is_empty() {
        return Err(AppError::input(format!(
            "CSV '{}' has no header row.",
            path.display()
        )));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::input(format!(
                "CSV parse error in '{}' at line {line}: {e}",
                path.display()
            ))
        })?;
        rows.push(record_to_vec(&record));
    }

    Ok(Dataset {
        headers: record_to_vec(&headers),
        rows,
    })
}

/// Write a dataset as comma-delimited text with a header row and no index column.
///
/// Rows go to a temporary file next to `path` which is renamed over it once
/// complete, so a failed write never leaves a partial file at `path`.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::input(format!("Failed to create CSV '{}': {e}", path.display())))?;

    let mut writer = csv::Writer::from_writer(staging);
    writer
        .write_record(&dataset.headers)
        .map_err(|e| AppError::input(format!("Failed to write CSV header: {e}")))?;

    for (idx, row) in dataset.rows.iter().enumerate() {
        writer
            .write_record(row)
            .map_err(|e| AppError::input(format!("Failed to write CSV row {}: {e}", idx + 2)))?;
    }

    let staging = writer
        .into_inner()
        .map_err(|e| AppError::input(format!("Failed to flush CSV '{}': {e}", path.display())))?;
    staging
        .persist(path)
        .map_err(|e| AppError::input(format!("Failed to move CSV into place at '{}': {e}", path.display())))?;
    Ok(())
}

fn record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_and_write_preserve_cells() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.csv");
        fs::write(&src, "id,name,score\n1,\"Smith, J\",0.50\n2,Lee, 7 \n").unwrap();

        let ds = load_dataset(&src).unwrap();
        assert_eq!(ds.headers, vec!["id", "name", "score"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][1], "Smith, J");
        // Whitespace is data; nothing is trimmed.
        assert_eq!(ds.rows[1][2], " 7 ");

        let out = dir.path().join("out.csv");
        write_dataset(&out, &ds).unwrap();
        assert_eq!(load_dataset(&out).unwrap(), ds);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bad.csv");
        fs::write(&src, "a,b\n1,2\n3\n").unwrap();

        let err = load_dataset(&src).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("line 3"), "{err}");
    }

    #[test]
    fn missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn prepend_column_shifts_existing_cells() {
        let mut ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        );
        ds.prepend_column("t", vec!["x".into(), "y".into()]).unwrap();
        assert_eq!(ds.headers, vec!["t", "a", "b"]);
        assert_eq!(ds.rows[1], vec!["y", "3", "4"]);

        let err = ds.prepend_column("u", vec!["only-one".into()]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INVARIANT);
    }

    #[test]
    fn has_column_ignores_bom_and_case() {
        let ds = Dataset::new(vec!["\u{feff}TimeReceived".into()], vec![]);
        assert!(ds.has_column("timereceived"));
        assert!(!ds.has_column("id"));
    }

    #[test]
    fn failed_write_keeps_previous_destination() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        fs::write(&out, "old\n").unwrap();

        let ragged = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        );
        let err = write_dataset(&out, &ragged).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert_eq!(fs::read_to_string(&out).unwrap(), "old\n");
        // Only the untouched destination is left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fresh.csv");
        let ragged = Dataset::new(vec!["a".into()], vec![vec!["1".into(), "2".into()]]);

        write_dataset(&out, &ragged).unwrap_err();
        assert!(!out.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        let err = write_dataset(&dir.path().join("no-such-dir/out.csv"), &ragged).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
