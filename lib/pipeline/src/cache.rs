//! Cache cleanup after a run

use crate::acquire::Acquired;
use std::path::Path;

/// Remove downloaded videos and, if nothing else is left, the cache directory
///
/// Local sources are never touched. Returns the number of files removed.
pub fn remove_downloads(acquired: &[Acquired], cache_dir: &Path) -> usize {
    let mut removed = 0;
    for entry in acquired.iter().filter(|a| a.is_downloaded()) {
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::debug!("Removed cached video {:?}", entry.path());
                removed += 1;
            }
            Err(e) => tracing::warn!("Failed to remove {:?}: {}", entry.path(), e),
        }
    }

    let is_empty = std::fs::read_dir(cache_dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if is_empty {
        if let Err(e) = std::fs::remove_dir(cache_dir) {
            tracing::debug!("Cache dir {:?} left in place: {}", cache_dir, e);
        }
    }

    removed
}
