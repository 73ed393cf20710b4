use super::{ByteSource, SourceError};

/// In-memory region, used for replaying captured segments.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Replace the region contents, as the writer would.
    pub fn overwrite(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
    }
}

impl ByteSource for MemorySource {
    fn read_region(&mut self, len: usize) -> Result<Vec<u8>, SourceError> {
        let end = len.min(self.bytes.len());
        Ok(self.bytes[..end].to_vec())
    }
}
