// src/storage/mod.rs — JSON file storage for rules and prior turns
//
// One directory per project under the storage root. Writes are atomic
// (temp file + rename); a single active session is assumed.

pub mod rules;
pub mod turns;

pub use rules::{AddOutcome, NewRule, RuleStore};
pub use turns::TurnStore;

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::infra::errors::RulecatchError;

/// Atomically write `value` as pretty JSON to `path` (temp file + rename).
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), RulecatchError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(value)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data.json".into());
    let tmp = dir.join(format!(".{file_name}.tmp"));

    let mut f = std::fs::File::create(&tmp)?;
    f.write_all(json.as_bytes())?;
    f.flush()?;
    f.sync_all()?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
