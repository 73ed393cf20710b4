//! Byte sources for the link segment.
//!
//! A source hands out the leading bytes of a region that some other process
//! keeps rewriting. Sources do not decode and do not detect torn reads.

mod file;
mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use thiserror::Error;

/// Readable region of fixed length, refreshed by an external writer.
pub trait ByteSource {
    /// Return up to `len` bytes from the start of the region.
    ///
    /// A region shorter than `len` yields fewer bytes rather than an error;
    /// the decoder reports the shortfall.
    fn read_region(&mut self, len: usize) -> Result<Vec<u8>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("shared memory error ({context}): {message}")]
    SharedMemory {
        context: &'static str,
        message: String,
    },
}
