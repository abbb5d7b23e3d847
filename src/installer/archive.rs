//! Unpacking of Firefox release archives.
//!
//! Archives are unpacked into a staging directory inside the install root,
//! so that moving the `firefox/` tree into place is a rename on the same
//! filesystem. The previous installation is only removed once the new tree
//! has been fully unpacked.

use crate::error::{io_error_at, InstallerError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};
use tempfile::TempDir;

/// Top-level directory every Firefox archive carries.
pub const ARCHIVE_ROOT: &str = "firefox";

const TAR_MAGIC_OFFSET: usize = 257;
const HEADER_LEN: usize = 262;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
    Plain,
}

impl Compression {
    /// Detects the compression from the first bytes of the file.
    pub fn detect(header: &[u8]) -> Option<Self> {
        if header.starts_with(&[0x1f, 0x8b]) {
            Some(Compression::Gzip)
        } else if header.starts_with(b"BZh") {
            Some(Compression::Bzip2)
        } else if header.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
            Some(Compression::Xz)
        } else if header.len() >= HEADER_LEN
            && &header[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + 5] == b"ustar"
        {
            Some(Compression::Plain)
        } else {
            None
        }
    }

    fn decoder<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Plain => Box::new(reader),
        }
    }
}

/// A fully unpacked archive waiting to be moved into place.
#[derive(Debug)]
pub struct StagedInstall {
    staging: TempDir,
    compression: Compression,
    entries: usize,
}

impl StagedInstall {
    pub fn firefox_dir(&self) -> PathBuf {
        self.staging.path().join(ARCHIVE_ROOT)
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Replaces `install_dir` with the staged tree. Returns whether an
    /// older installation was removed.
    pub fn commit(self, install_dir: &Path) -> Result<bool> {
        let replaced = install_dir.exists();
        if replaced {
            tracing::info!(path = %install_dir.display(), "removing previous installation");
            fs::remove_dir_all(install_dir).map_err(|e| io_error_at(e, install_dir))?;
        }

        fs::rename(self.firefox_dir(), install_dir).map_err(|e| io_error_at(e, install_dir))?;
        tracing::debug!(path = %install_dir.display(), "installation moved into place");

        // Dropping the staging directory removes what is left of it.
        Ok(replaced)
    }
}

/// Unpacks `archive_path` into a staging directory under `staging_parent`.
pub fn stage_archive(archive_path: &Path, staging_parent: &Path) -> Result<StagedInstall> {
    let mut file = File::open(archive_path).map_err(|e| io_error_at(e, archive_path))?;

    let mut header = Vec::with_capacity(HEADER_LEN);
    (&mut file).take(HEADER_LEN as u64).read_to_end(&mut header)?;
    file.seek(SeekFrom::Start(0))?;

    let compression = Compression::detect(&header).ok_or(InstallerError::UnsupportedArchive)?;
    tracing::debug!(?compression, path = %archive_path.display(), "detected archive format");

    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(staging_parent)
        .map_err(|e| io_error_at(e, staging_parent))?;

    let entries = unpack(compression.decoder(BufReader::new(file)), staging.path())?;

    let staged = StagedInstall {
        staging,
        compression,
        entries,
    };

    // A `firefox` symlink would be moved into place and point anywhere.
    let is_real_dir = fs::symlink_metadata(staged.firefox_dir())
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false);
    if !is_real_dir {
        return Err(InstallerError::ArchiveLayout {
            message: format!("no top-level '{}' directory", ARCHIVE_ROOT),
        });
    }

    Ok(staged)
}

fn unpack<R: Read>(reader: R, destination: &Path) -> Result<usize> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.set_overwrite(true);

    let mut count = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        let traversal = || InstallerError::PathTraversal {
            entry: entry_path.display().to_string(),
        };

        let entry_type = entry.header().entry_type();
        if matches!(entry_type, EntryType::Symlink | EntryType::Link) {
            if let Some(target) = entry.link_name()? {
                let base = match entry_type {
                    EntryType::Symlink => entry_path.parent().unwrap_or(Path::new("")),
                    _ => Path::new(""),
                };
                if link_escapes(base, &target) {
                    return Err(traversal());
                }
            }
        }

        match entry.unpack_in(destination) {
            Ok(true) => count += 1,
            Ok(false) => return Err(traversal()),
            // Raised by tar when a path resolves through an unpacked symlink
            Err(e) if is_outside_destination(&e) => return Err(traversal()),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(count)
}

/// True when `target`, read relative to `base`, leaves the archive root.
fn link_escapes(base: &Path, target: &Path) -> bool {
    let mut depth = 0usize;
    for component in base.components().chain(target.components()) {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(parent) => depth = parent,
                None => return true,
            },
            Component::RootDir | Component::Prefix(_) => return true,
        }
    }
    false
}

fn is_outside_destination(error: &io::Error) -> bool {
    error.to_string().contains("outside of destination")
}
