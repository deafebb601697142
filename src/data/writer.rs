use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ProcessorError, Result};

use super::model::Table;

/// Write `table` as CSV: header row, then data rows, no index column.
///
/// Rows go to a temporary file next to `path` which replaces `path` only
/// once everything is flushed, so a failed write leaves no output behind.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| ProcessorError::io(path, e))?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        writer
            .write_record(table.columns())
            .map_err(|e| ProcessorError::csv(path, e))?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|e| ProcessorError::csv(path, e))?;
        }
        writer.flush().map_err(|e| ProcessorError::io(path, e))?;
    }

    // Temp files are created owner-only; outputs get the usual rw-r--r--.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| ProcessorError::io(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| ProcessorError::io(path, e.error))?;
    Ok(())
}
