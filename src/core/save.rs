// Read-only access to a decrypted save, memory-mapped from disk or held in memory.
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::core::error::{Error, ErrorKind};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

pub struct SaveBuffer {
    path: Option<PathBuf>,
    backing: Backing,
}

impl SaveBuffer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|err| open_error(&path, err))?;
        let len = file
            .metadata()
            .map(|meta| meta.len())
            .map_err(|err| Error::new(ErrorKind::Io).with_path(&path).with_source(err))?;

        // Zero-length files cannot be mapped on every platform.
        let backing = if len == 0 {
            Backing::Owned(Vec::new())
        } else {
            // The map is read-only and dropped before the CLI exits.
            let mmap = unsafe {
                Mmap::map(&file)
                    .map_err(|err| Error::new(ErrorKind::Io).with_path(&path).with_source(err))?
            };
            Backing::Mapped(mmap)
        };
        tracing::debug!(path = %path.display(), len, "save opened");

        Ok(Self {
            path: Some(path),
            backing,
        })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: None,
            backing: Backing::Owned(bytes.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(bytes) => bytes.as_slice(),
        }
    }
}

impl Deref for SaveBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

fn open_error(path: &Path, err: io::Error) -> Error {
    let base = match err.kind() {
        io::ErrorKind::NotFound => Error::new(ErrorKind::NotFound)
            .with_message("save file not found")
            .with_hint("Pass the path to a decrypted save file."),
        io::ErrorKind::PermissionDenied => {
            Error::new(ErrorKind::Io).with_message("permission denied reading save")
        }
        _ => Error::new(ErrorKind::Io).with_message("failed to open save"),
    };
    base.with_path(path).with_source(err)
}
