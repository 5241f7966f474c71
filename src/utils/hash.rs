use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Cheap identity for an image file: canonical path, length and mtime.
/// `None` when the file can't be stat'ed, in which case the result shouldn't
/// be cached.
pub fn hash_file_identity(path: &Path) -> Option<u64> {
    let canonical = path.canonicalize().ok()?;
    let meta = std::fs::metadata(&canonical).ok()?;
    let modified = meta.modified().ok()?;

    let mut h = DefaultHasher::new();
    canonical.hash(&mut h);
    meta.len().hash(&mut h);
    modified.hash(&mut h);
    Some(h.finish())
}
