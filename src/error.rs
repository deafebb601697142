use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a processing run.
///
/// Non-answers, missing cells and zero denominators are not errors; the
/// scoring strategies map them to a zero contribution.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Bad or incomplete configuration (missing fields, unknown indicator,
    /// data source that does not exist).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A table lacks a key or value column it is required to have.
    #[error("column '{column}' not found in {origin}")]
    MissingColumn { column: String, origin: String },

    /// A directory data source contained no `.csv` files.
    #[error("no input tables found in {}", .0.display())]
    NoInputTables(PathBuf),

    /// A scored column holds text that is neither a number nor a known non-answer.
    #[error("column '{column}' holds non-numeric value '{value}'")]
    NonNumeric { column: String, value: String },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessorError {
    pub(crate) fn missing_column(column: impl Into<String>, origin: impl Into<String>) -> Self {
        ProcessorError::MissingColumn {
            column: column.into(),
            origin: origin.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProcessorError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a `csv` failure; I/O failures underneath it become [`ProcessorError::Io`].
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        if source.is_io_error() {
            return ProcessorError::io(path, std::io::Error::from(source));
        }
        ProcessorError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ProcessorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_io_failure_maps_to_io() {
        let source = csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        match ProcessorError::csv("out.csv", source) {
            ProcessorError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("out.csv"));
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_csv_format_failure_stays_csv() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"a,b\nc\n"[..]);
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("ragged rows are rejected");
        assert!(matches!(
            ProcessorError::csv("in.csv", err),
            ProcessorError::Csv { .. }
        ));
    }
}
