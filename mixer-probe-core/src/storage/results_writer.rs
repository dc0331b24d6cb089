use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::error::MixerError;

/// Append-only JSON-lines writer for measurement records.
///
/// One compact JSON object per line. Earlier lines are never rewritten and
/// the file is created on first append. Shareable across threads.
pub struct ResultsWriter {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ResultsWriter {
    /// Prepare a writer for `path`, creating missing parent directories.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, MixerError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| MixerError::StorageError(format!("failed to create directory: {}", e)))?;
        }
        Ok(Self {
            path,
            file: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `record` and append it as one line, flushed before return.
    pub fn append<T: Serialize>(&self, record: &T) -> Result<(), MixerError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| MixerError::StorageError(format!("failed to serialize record: {}", e)))?;
        line.push('\n');

        let mut guard = self.file.lock();
        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| MixerError::StorageError(format!("failed to open {}: {}", self.path.display(), e)))?;
            *guard = Some(file);
        }
        let Some(file) = guard.as_mut() else {
            return Err(MixerError::StorageError("results file not open".into()));
        };

        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| MixerError::StorageError(format!("failed to append record: {}", e)))
    }
}

/// Read every record of a JSON-lines file, skipping blank lines.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, MixerError> {
    let file = File::open(path)
        .map_err(|e| MixerError::StorageError(format!("failed to open {}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| MixerError::StorageError(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| MixerError::StorageError(format!("line {}: {}", n + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use crate::models::measurement::MeasurementSample;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mixer_probe_test_{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn appends_one_line_per_record() {
        let path = temp_file_path("results.jsonl");
        let writer = ResultsWriter::new(&path).unwrap();

        writer.append(&MeasurementSample::new("r1", "Master", Some("FL"), 10, -30.0)).unwrap();
        writer.append(&MeasurementSample::new("r1", "Master", Some("FL"), 30, -20.0)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));

        let samples: Vec<MeasurementSample> = read_records(&path).unwrap();
        assert_eq!(samples[1].applied_value, 30);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn existing_lines_are_kept() {
        let path = temp_file_path("existing.jsonl");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"timestamp\":\"earlier\"}\n").unwrap();

        let writer = ResultsWriter::new(&path).unwrap();
        writer.append(&serde_json::json!({"timestamp": "later"})).unwrap();

        let records: Vec<serde_json::Value> = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["timestamp"], "earlier");
        assert_eq!(records[1]["timestamp"], "later");

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn concurrent_appends_do_not_interleave() {
        let path = temp_file_path("threads.jsonl");
        let writer = Arc::new(ResultsWriter::new(&path).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let writer = Arc::clone(&writer);
                thread::spawn(move || {
                    for i in 0..25 {
                        writer
                            .append(&MeasurementSample::new("r", &format!("C{}", t), None, i, 0.0))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let samples: Vec<MeasurementSample> = read_records(&path).unwrap();
        assert_eq!(samples.len(), 100);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let result: Result<Vec<serde_json::Value>, _> = read_records(Path::new("/nonexistent/mixer-probe.jsonl"));
        assert!(matches!(result, Err(MixerError::StorageError(_))));
    }
}
