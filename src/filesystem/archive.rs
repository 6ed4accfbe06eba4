use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};
use tracing::debug;
use zip::ZipArchive;

/// What an archive entry describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File(Vec<u8>),
}

/// One record of an archive, in the order the archive provides it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub kind: EntryKind,
    /// Owner recorded by the source. Zip archives carry no owner, so
    /// [`read_zip`] always leaves this `None` and the importer default applies.
    pub owner: Option<String>,
}

impl ArchiveEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            owner: None,
        }
    }

    pub fn file(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File(content.into()),
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// Reads every entry of the zip archive at `path`
pub fn read_zip(path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    debug!("Opening archive: {}", path.display());
    let file = File::open(path).context(OpenSnafu {
        path: path.to_path_buf(),
    })?;
    let mut archive = ZipArchive::new(file).context(MalformedSnafu {
        path: path.to_path_buf(),
    })?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut zip_file = archive.by_index(index).context(MalformedSnafu {
            path: path.to_path_buf(),
        })?;
        let name = zip_file.name().to_string();

        let entry = if zip_file.is_dir() {
            ArchiveEntry::directory(name)
        } else {
            // The declared size comes from the archive itself and may be bogus
            let mut content = Vec::new();
            zip_file
                .read_to_end(&mut content)
                .context(EntrySnafu { entry: name.clone() })?;
            ArchiveEntry::file(name, content)
        };
        entries.push(entry);
    }

    debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

#[derive(Debug, Snafu)]
pub enum ArchiveError {
    #[snafu(display("cannot open archive: {source}"))]
    OpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("not a valid zip archive: {source}"))]
    MalformedError {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[snafu(display("cannot read entry '{entry}': {source}"))]
    EntryError {
        entry: String,
        source: std::io::Error,
    },
}
