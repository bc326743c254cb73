//! Directory scanning and record file naming

use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use crate::value::Record;
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Stringify an entity id and check it can stand as a file stem
pub(crate) fn entity_key(id: impl Display) -> Result<String> {
    let id = id.to_string();
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if bad {
        return Err(Error::InvalidEntityId(id));
    }
    Ok(id)
}

pub(crate) fn record_path(dir: &Path, id: &str, extension: &str) -> PathBuf {
    dir.join(format!("{id}.{extension}"))
}

/// Parse every `*.<extension>` file in `dir` into a fresh snapshot.
///
/// The first malformed record aborts the scan.
pub(crate) fn load_directory<S: StorageBackend>(
    dir: &Path,
    extension: &str,
    storage: &S,
) -> Result<HashMap<String, Record>> {
    let suffix = format!(".{extension}");
    let mut records = HashMap::new();

    let entries = std::fs::read_dir(dir).map_err(|e| Error::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            trace!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        let Some(id) = name.strip_suffix(&suffix) else {
            trace!("Skipping {name}: not a .{extension} record");
            continue;
        };
        if id.is_empty() {
            continue;
        }

        let record: Record = storage.read(&path)?;
        records.insert(id.to_string(), record);
    }

    debug!("Loaded {} records from {}", records.len(), dir.display());
    Ok(records)
}
