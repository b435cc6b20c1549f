//! Candidate predicate for discovered files.

use std::path::Path;

/// Decide whether a discovered file is eligible for processing: a regular
/// file, with an allow-listed extension, whose path contains the watch root.
///
/// The containment test is a substring check on the rendered path, matching
/// the original system's behavior (which also matches non-prefix
/// occurrences of the watch-root string). Kept as an accepted
/// simplification.
pub fn is_candidate(
    path: &Path,
    is_regular_file: bool,
    watch_root: &Path,
    allowed_extensions: &[String],
) -> bool {
    if !is_regular_file {
        return false;
    }

    let extension = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext,
        None => return false,
    };

    if !allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    {
        return false;
    }

    path.to_string_lossy()
        .contains(watch_root.to_string_lossy().as_ref())
}
