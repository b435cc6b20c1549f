//! Deterministic base names and collision-safe path resolution.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rand::Rng;

/// Upper bound (exclusive) for the random disambiguator suffix
const DISAMBIGUATOR_RANGE: u32 = 1000;

/// Format a recording's modification time as the note/audio base name,
/// e.g. `2024-05-01 at 09.00`. 24-hour clock, always two digits,
/// locale-independent.
pub fn base_name(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%Y-%m-%d at %H.%M").to_string()
}

/// Return `desired` unchanged when it is unoccupied; otherwise append a
/// random `_N` disambiguator to the stem, before the extension.
///
/// The existence check is consulted once, for the desired path only. A
/// collision after suffixing is treated as acceptably rare and not retried.
pub fn resolve_unique_path<F>(desired: &Path, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !exists(desired) {
        return desired.to_path_buf();
    }

    let n = rand::thread_rng().gen_range(0..DISAMBIGUATOR_RANGE);
    with_disambiguator(desired, n)
}

/// Append `_n` to the stem of `path`, preserving the extension
fn with_disambiguator(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    };

    path.with_file_name(name)
}
