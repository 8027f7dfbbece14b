//! Durable storage of capture records

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::smtp::Envelope;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to create capture directory {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write capture record {}: {source}", path.display())]
    WriteRecord {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes one artifact file per captured message into a directory.
///
/// Records are created and finalized in one step and never updated
/// afterward.
#[derive(Debug, Clone)]
pub struct CaptureStore {
    dir: PathBuf,
}

impl CaptureStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CaptureError::CreateDir {
            dir: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory this store writes into
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Write one capture record and return its path.
    ///
    /// The name is derived from the arrival timestamp; a numeric suffix
    /// avoids collisions when several messages land in the same second.
    pub fn write(&self, envelope: &Envelope) -> Result<PathBuf, CaptureError> {
        let stem = envelope.timestamp.format("capture_%Y%m%d_%H%M%S").to_string();

        let (path, mut file) = self.create_unique(&stem)?;
        self.write_record(&mut file, envelope)
            .map_err(|source| CaptureError::WriteRecord {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Create the first non-existing file for `stem`, trying `stem.txt`,
    /// then `stem_1.txt`, `stem_2.txt`, ...
    fn create_unique(&self, stem: &str) -> Result<(PathBuf, File), CaptureError> {
        for n in 0u32.. {
            let name = if n == 0 {
                format!("{stem}.txt")
            } else {
                format!("{stem}_{n}.txt")
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(CaptureError::WriteRecord { path, source }),
            }
        }
        unreachable!("u32 suffix space exhausted")
    }

    fn write_record(&self, file: &mut File, envelope: &Envelope) -> io::Result<()> {
        writeln!(
            file,
            "Timestamp: {}",
            envelope.timestamp.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file, "From: {}", envelope.from)?;
        writeln!(file, "To: {}", envelope.recipients_joined())?;
        writeln!(file, "Peer: {}", envelope.peer)?;
        writeln!(file, "{}", "-".repeat(30))?;
        writeln!(file, "{}", envelope.body)?;
        file.flush()
    }
}
