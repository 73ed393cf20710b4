use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{ByteSource, SourceError};

/// Region backed by a file: a saved segment image, or a segment exposed
/// through the filesystem such as `/dev/shm/MumbleLink`.
///
/// Every read rewinds to offset zero so repeated reads observe the writer's
/// latest data.
pub struct FileSource {
    path: PathBuf,
    file: File,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        log::debug!("opened link source {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn read_region(&mut self, len: usize) -> Result<Vec<u8>, SourceError> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buffer = Vec::with_capacity(len);
        (&mut self.file).take(len as u64).read_to_end(&mut buffer)?;
        if buffer.len() < len {
            log::debug!(
                "short read from {}: {} of {} bytes",
                self.path.display(),
                buffer.len(),
                len
            );
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::FileSource;
    use crate::source::{ByteSource, SourceError};

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("gw2link_{tag}_{unique}.bin"))
    }

    #[test]
    fn rereads_from_start_and_sees_rewrites() {
        let path = temp_path("reread");
        fs::write(&path, [1u8, 2, 3, 4, 5]).unwrap();
        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.read_region(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(source.read_region(3).unwrap(), vec![1, 2, 3]);

        fs::write(&path, [9u8, 8, 7, 6]).unwrap();
        assert_eq!(source.read_region(2).unwrap(), vec![9, 8]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn short_file_yields_short_buffer() {
        let path = temp_path("short");
        fs::write(&path, [1u8, 2]).unwrap();
        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.read_region(8).unwrap(), vec![1, 2]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = temp_path("missing");
        let err = match FileSource::open(&path) {
            Ok(_) => panic!("expected missing file to be rejected"),
            Err(err) => err,
        };
        assert!(matches!(err, SourceError::Io(_)));
    }
}
