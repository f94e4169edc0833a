//! Source file discovery for the docstring stage
//!
//! Architecture: Service Layer - discovery encapsulates the enumeration rules
//! - File names are matched against a glob pattern, never full paths
//! - Exclusion is by directory component relative to the walk root, which is
//!   the portable reading of a "/tests/" path-substring filter
//! - Results are sorted so the checker sees a deterministic argument order

use crate::domain::outcome::{GateError, GateResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerate files under `root` whose name matches `file_pattern`, skipping
/// any file that sits below a directory named in `exclude_dirs`
pub fn collect_checked_files(
    root: &Path,
    file_pattern: &str,
    exclude_dirs: &[String],
) -> GateResult<Vec<PathBuf>> {
    let pattern = glob::Pattern::new(file_pattern)
        .map_err(|e| GateError::pattern(format!("Invalid file pattern '{file_pattern}': {e}")))?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = path.file_name() else {
            continue;
        };

        if !pattern.matches(&name.to_string_lossy()) {
            continue;
        }

        if is_excluded(root, path, exclude_dirs) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Whether any ancestor directory of `path` below `root` is an excluded name
fn is_excluded(root: &Path, path: &Path, exclude_dirs: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let Some(parent) = relative.parent() else {
        return false;
    };

    parent.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        exclude_dirs.iter().any(|excluded| excluded.as_str() == name)
    })
}
