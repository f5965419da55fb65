use std::{
    fs,
    io::{ErrorKind, Write as _},
    path::Path as FsPath,
};

use tempfile::NamedTempFile;

use crate::{
    path::Path,
    util::{Result, Status},
};

/// One active iterator in a checkpoint file
///
/// Stored as a line `<path-hex>,<end-hex>`, one byte per nibble so odd
/// lengths survive. An empty end column means unbounded above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRow {
    /// Last node the iterator was positioned on.
    pub path: Path,
    pub end: Option<Path>,
}

impl CheckpointRow {
    pub fn new(path: Path, end: Option<Path>) -> Self {
        CheckpointRow { path, end }
    }

    pub fn encode(&self) -> String {
        let end = self.end.as_ref().map(Path::to_hex).unwrap_or_default();
        format!("{},{}", self.path.to_hex(), end)
    }

    /// Parses one line. Surrounding whitespace in a column is ignored, and a
    /// blank end column means the row is unbounded.
    pub fn parse(line: &str) -> Result<Self> {
        let columns: Vec<&str> = line.split(',').map(str::trim).collect();
        if columns.len() != 2 {
            return Err(Status::corruption(format!(
                "expected 2 columns, found {}",
                columns.len()
            )));
        }
        let path = parse_path(columns[0])?;
        let end = if columns[1].is_empty() {
            None
        } else {
            Some(parse_path(columns[1])?)
        };
        Ok(CheckpointRow { path, end })
    }
}

fn parse_path(column: &str) -> Result<Path> {
    Path::from_hex(column).map_err(|e| match e.message() {
        Some(msg) => Status::corruption(msg.to_string()),
        None => Status::corruption("invalid path"),
    })
}

/// Reads every row of a checkpoint file.
///
/// Returns None if the file does not exist. A single malformed line fails
/// the whole read.
pub fn read_checkpoint(file: &FsPath) -> Result<Option<Vec<CheckpointRow>>> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let row = CheckpointRow::parse(line).map_err(|e| {
            Status::corruption(format!(
                "{} line {}: {}",
                file.display(),
                idx + 1,
                e.message().unwrap_or("malformed row")
            ))
        })?;
        rows.push(row);
    }
    Ok(Some(rows))
}

/// Replaces the checkpoint file with `rows`.
///
/// The rows are written to a temporary file in the same directory which is
/// then renamed over `file`, so readers see either the old or the new
/// checkpoint in full.
pub fn write_checkpoint(file: &FsPath, rows: &[CheckpointRow], sync: bool) -> Result<()> {
    let dir = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => FsPath::new("."),
    };

    let mut content = String::new();
    for row in rows {
        content.push_str(&row.encode());
        content.push('\n');
    }

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Status::io_error(format!("Failed to create checkpoint file: {e}")))?;
    tmp.write_all(content.as_bytes())?;
    if sync {
        tmp.as_file().sync_all()?;
    }
    tmp.persist(file)
        .map_err(|e| Status::io_error(format!("Failed to persist checkpoint: {}", e.error)))?;
    Ok(())
}

/// Deletes the checkpoint file. Returns whether a file was removed.
pub fn remove_checkpoint(file: &FsPath) -> Result<bool> {
    match fs::remove_file(file) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
