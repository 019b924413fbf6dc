// ABOUTME: Tar bundle reader with transparent gzip support.
// ABOUTME: Yields regular file entries in archive order; directories are skipped.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::GzDecoder;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use super::error::{NonUtf8PathSnafu, OpenBundleSnafu, ReadBundleSnafu, SourceError};
use super::{SourceEntry, normalize_path};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read all regular files from a bundle archive.
pub fn read_bundle(path: &Path) -> Result<Vec<SourceEntry>, SourceError> {
    let mut file = File::open(path).context(OpenBundleSnafu { path })?;

    let mut magic = [0u8; 2];
    let compressed = match file.read_exact(&mut magic) {
        Ok(()) => magic == GZIP_MAGIC,
        // Shorter than two bytes: let tar report it.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e).context(ReadBundleSnafu { path }),
    };
    file.seek(SeekFrom::Start(0))
        .context(ReadBundleSnafu { path })?;

    let reader: Box<dyn Read> = if compressed {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();

    for entry in archive.entries().context(ReadBundleSnafu { path })? {
        let mut entry = entry.context(ReadBundleSnafu { path })?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let entry_path = entry.path().context(ReadBundleSnafu { path })?.into_owned();
        let raw = entry_path
            .to_str()
            .context(NonUtf8PathSnafu { path: &entry_path })?;
        let relative = normalize_path(raw);

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .context(ReadBundleSnafu { path })?;

        debug!(entry = %relative, bytes = content.len(), "read bundle entry");
        entries.push(SourceEntry::new(relative, content));
    }

    Ok(entries)
}
