use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::source::METADATA_COLUMNS;
use crate::data::{Record, RecordStore};
use crate::errors::CoresetError;
use crate::source::RecordSource;
use crate::types::{FeatureValue, SourceId};

/// Configuration for a whitespace-delimited tabular file source.
///
/// Each line is `group_id example_id label feature_1 ... feature_F`.
#[derive(Clone, Debug)]
pub struct FileSourceConfig {
    /// Stable source identifier used in logs and summaries.
    pub source_id: SourceId,
    /// Dataset file path.
    pub path: PathBuf,
    /// Optional required feature width; by default the first row decides.
    pub expected_features: Option<usize>,
}

impl FileSourceConfig {
    /// Create a config whose source id is the file name.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source_id = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            source_id,
            path,
            expected_features: None,
        }
    }

    /// Override the source id.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Require every row to carry exactly `count` features.
    pub fn with_expected_features(mut self, count: usize) -> Self {
        self.expected_features = Some(count);
        self
    }
}

/// Filesystem-backed tabular source.
pub struct FileSource {
    config: FileSourceConfig,
}

impl FileSource {
    pub fn new(config: FileSourceConfig) -> Self {
        Self { config }
    }

    /// Shorthand for `FileSource::new(FileSourceConfig::new(path))`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSourceConfig::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read records from any buffered reader; blank lines are skipped.
    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<RecordStore, CoresetError> {
        let mut store = RecordStore::new();
        let mut width = self.config.expected_features;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                debug!("[coreset:source] skipping blank line {}", line_no);
                continue;
            }
            let record = parse_record_line(&line, line_no)?;
            match width {
                Some(expected) if expected != record.features.len() => {
                    return Err(CoresetError::ShapeMismatch {
                        line: line_no,
                        expected,
                        found: record.features.len(),
                    });
                }
                Some(_) => {}
                None => width = Some(record.features.len()),
            }
            store.push(record)?;
        }
        Ok(store)
    }
}

impl RecordSource for FileSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn load(&self) -> Result<RecordStore, CoresetError> {
        info!(
            "[coreset:source] reading dataset from {}",
            self.config.path.display()
        );
        let file = File::open(&self.config.path).map_err(|err| {
            CoresetError::SourceUnavailable {
                source_id: self.config.source_id.clone(),
                reason: format!("failed opening {}: {err}", self.config.path.display()),
            }
        })?;
        let store = self.read_from(BufReader::new(file))?;
        info!(
            "[coreset:source] reading complete (records={}, features={})",
            store.len(),
            store.feature_count()
        );
        Ok(store)
    }
}

/// Parse one data line: three integer metadata columns followed by float features.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_record_line(line: &str, line_no: usize) -> Result<Record, CoresetError> {
    let mut columns = line.split_whitespace();
    let mut metadata = [0i64; METADATA_COLUMNS];
    for (position, (slot, name)) in metadata
        .iter_mut()
        .zip(["group id", "example id", "label"])
        .enumerate()
    {
        let raw = columns.next().ok_or_else(|| CoresetError::Parse {
            line: line_no,
            reason: format!(
                "expected at least {METADATA_COLUMNS} columns, found {position}"
            ),
        })?;
        *slot = raw.parse::<i64>().map_err(|_| CoresetError::Parse {
            line: line_no,
            reason: format!("invalid {name} '{raw}': must be an integer"),
        })?;
    }
    let features = columns
        .enumerate()
        .map(|(position, raw)| {
            raw.parse::<FeatureValue>().map_err(|_| CoresetError::Parse {
                line: line_no,
                reason: format!(
                    "invalid feature {} '{raw}': must be a float",
                    position + 1
                ),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [group_id, example_id, label] = metadata;
    Ok(Record::new(group_id, example_id, label, features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn parses_metadata_and_features() {
        let record = parse_record_line("279 261532 0 52.00 32.69 -0.87\t1e-05", 1).unwrap();
        assert_eq!(record.group_id, 279);
        assert_eq!(record.example_id, 261532);
        assert_eq!(record.label, 0);
        assert_eq!(record.features, vec![52.0, 32.69, -0.87, 1e-5]);
    }

    #[test]
    fn accepts_rows_without_features() {
        let record = parse_record_line("1 2 1", 4).unwrap();
        assert!(record.features.is_empty());
    }

    #[test]
    fn reports_short_rows_with_line_number() {
        let err = parse_record_line("1 2", 9).unwrap_err();
        match err {
            CoresetError::Parse { line, reason } => {
                assert_eq!(line, 9);
                assert!(reason.contains("found 2"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_invalid_values() {
        let err = parse_record_line("1 x 0 1.0", 3).unwrap_err();
        assert!(err.to_string().contains("invalid example id 'x'"));

        let err = parse_record_line("1 2 0 1.0 abc", 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 5: invalid feature 2 'abc': must be a float"
        );
    }

    #[test]
    fn skips_blank_lines_and_checks_width() {
        let source = FileSource::from_path("inline.dat");
        let store = source
            .read_from(Cursor::new("1 1 0 1.0 2.0\n\n   \n1 2 1 3.0 4.0\n"))
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.feature_count(), 2);

        let err = source
            .read_from(Cursor::new("1 1 0 1.0 2.0\n\n1 2 1 3.0\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            CoresetError::ShapeMismatch {
                line: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn enforces_expected_width() {
        let source =
            FileSource::new(FileSourceConfig::new("inline.dat").with_expected_features(3));
        let err = source.read_from(Cursor::new("1 1 0 1.0 2.0\n")).unwrap_err();
        assert!(matches!(
            err,
            CoresetError::ShapeMismatch {
                line: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn loads_file_and_names_source_after_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bio_train.dat");
        std::fs::write(&path, "7 100 1 0.5 1.5\n7 101 0 2.5 3.5").unwrap();

        let source = FileSource::from_path(&path);
        assert_eq!(source.id(), "bio_train.dat");
        let store = source.load().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().features, vec![2.5, 3.5]);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let temp = tempdir().unwrap();
        let source = FileSource::new(
            FileSourceConfig::new(temp.path().join("missing.dat")).with_source_id("kdd"),
        );
        match source.load() {
            Err(CoresetError::SourceUnavailable { source_id, .. }) => assert_eq!(source_id, "kdd"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
