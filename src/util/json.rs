//! JSON file helpers shared by snapshots, frame captures and cookie lists.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Write `value` as pretty JSON. The file is staged next to `path` and
/// renamed into place, so readers never see a partial document.
pub fn write_json_to_path<T: Serialize>(value: &T, path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        serde_json::to_writer_pretty(&mut writer, value).map_err(io::Error::other)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn read_json_from_path<T: DeserializeOwned>(path: &Path) -> io::Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| io::Error::other(format!("{}: {e}", path.display())))
}
