// ABOUTME: Repository directory walker with artifact admission filter.
// ABOUTME: Walks in sorted order and keeps files with a known suffix or parent directory.

use std::fs;
use std::path::Path;

use snafu::{OptionExt, ResultExt};
use tracing::debug;

use super::error::{NonUtf8PathSnafu, ReadDirSnafu, ReadFileSnafu, SourceError};
use super::{SourceEntry, normalize_path};
use crate::types::{has_recognized_directory, has_recognized_suffix};

const SKIPPED_DIRS: &[&str] = &[".git"];

/// Walk a repository tree and read every admitted file.
pub fn walk_tree(root: &Path) -> Result<Vec<SourceEntry>, SourceError> {
    let mut entries = Vec::new();
    walk(root, root, &mut entries)?;
    Ok(entries)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<SourceEntry>) -> Result<(), SourceError> {
    let mut children = fs::read_dir(dir)
        .context(ReadDirSnafu { path: dir })?
        .collect::<Result<Vec<_>, _>>()
        .context(ReadDirSnafu { path: dir })?;
    children.sort_by_key(|entry| entry.file_name());

    for child in children {
        let path = child.path();
        let file_type = child.file_type().context(ReadDirSnafu { path: &path })?;

        if file_type.is_dir() {
            if SKIPPED_DIRS.iter().any(|skip| child.file_name() == *skip) {
                continue;
            }
            walk(root, &path, out)?;
            continue;
        }

        if !file_type.is_file() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path);
        let raw = relative.to_str().context(NonUtf8PathSnafu { path: &path })?;
        let relative = normalize_path(raw);

        if !has_recognized_directory(&relative) && !has_recognized_suffix(&relative) {
            debug!(path = %relative, "not admitted");
            continue;
        }

        let content = fs::read(&path).context(ReadFileSnafu { path: &path })?;
        out.push(SourceEntry::new(relative, content));
    }

    Ok(())
}
