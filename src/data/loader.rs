use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{ProcessorError, Result};

use super::model::{CellValue, Table};

/// File suffix of loadable tables inside a directory data source.
pub const TABLE_SUFFIX: &str = ".csv";

// ---------------------------------------------------------------------------
// Single table
// ---------------------------------------------------------------------------

/// Read a headered CSV file into a [`Table`].
///
/// With `usecols` set, only those columns are kept (in file order) and each
/// of them must be present in the header.
pub fn read_table(path: &Path, usecols: Option<&[String]>) -> Result<Table> {
    let file = File::open(path).map_err(|e| ProcessorError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ProcessorError::csv(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let origin = path.display().to_string();

    let keep: Vec<usize> = match usecols {
        None => (0..headers.len()).collect(),
        Some(wanted) => {
            for col in wanted {
                if !headers.contains(col) {
                    return Err(ProcessorError::missing_column(col.as_str(), origin));
                }
            }
            (0..headers.len())
                .filter(|&i| wanted.contains(&headers[i]))
                .collect()
        }
    };

    let columns = keep.iter().map(|&i| headers[i].clone()).collect();
    let mut table = Table::new(origin, columns);

    for result in reader.records() {
        let record = result.map_err(|e| ProcessorError::csv(path, e))?;
        let row = keep
            .iter()
            .map(|&i| record.get(i).map(CellValue::parse).unwrap_or(CellValue::Missing))
            .collect();
        table.push_row(row);
    }

    log::debug!(
        "Read {} rows with columns {:?} from {}",
        table.len(),
        table.columns(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Directory discovery
// ---------------------------------------------------------------------------

/// A table file found in a directory data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFile {
    /// File name without its extension; becomes the value column's name.
    pub identifier: String,
    pub path: PathBuf,
}

/// List every `.csv` file directly inside `dir`, sorted by identifier.
///
/// Sorting makes the merge order, and so the output, independent of the
/// platform's directory listing order.
pub fn discover_tables(dir: &Path) -> Result<Vec<TableFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ProcessorError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ProcessorError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if !name.ends_with(TABLE_SUFFIX) {
            continue;
        }
        let identifier = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
            .to_string();
        files.push(TableFile { identifier, path });
    }

    files.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    Ok(files)
}
