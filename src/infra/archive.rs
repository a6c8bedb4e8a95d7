//! Archive extraction
//!
//! Unpacks `.tar.xz` archives. Entries are extracted on top of whatever
//! already exists in the destination; nothing is cleared first.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tar::Archive;
use xz2::bufread::XzDecoder;

use crate::error::ArchiveError;

/// Extract every entry of an xz-compressed tar stream into `dest`
pub fn extract_tar_xz<R: Read>(reader: R, dest: &Path) -> Result<(), ArchiveError> {
    tracing::debug!(dest = %dest.display(), "Extracting tar.xz archive");

    let decompressor = XzDecoder::new(BufReader::new(reader));
    let mut archive = Archive::new(decompressor);
    archive.set_overwrite(true);

    archive.unpack(dest).map_err(|e| ArchiveError::Extract {
        dest: dest.to_path_buf(),
        error: e.to_string(),
    })
}

/// Extract an archive file on the blocking thread pool
pub async fn extract_tar_xz_file(file: File, dest: PathBuf) -> Result<(), ArchiveError> {
    tokio::task::spawn_blocking(move || extract_tar_xz(file, &dest))
        .await
        .map_err(|e| ArchiveError::Join {
            error: e.to_string(),
        })?
}
