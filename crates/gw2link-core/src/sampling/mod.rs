//! Reading samples from a live source.
//!
//! This is the caller side of the decoder: it acquires bytes, decodes and
//! assembles them, and optionally guards against torn reads by comparing
//! consecutive reads. The decoder itself never retries.

use std::path::Path;

use thiserror::Error;

use crate::Snapshot;
use crate::link::{DecodeError, Link, decode_link, layout};
use crate::snapshot::{AssembleError, assemble_link};
use crate::source::{ByteSource, FileSource, SourceError};

mod simplify;
mod trail;

pub use simplify::simplify;
pub use trail::{PositionTrail, SectionedTrail, TrailEvent, TrailSection};

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("assembly error: {0}")]
    Assemble(#[from] AssembleError),
    #[error("segment kept changing across {attempts} read attempts")]
    Unstable { attempts: usize },
}

/// Read and decode one sample, without torn-read detection.
pub fn read_link<S: ByteSource + ?Sized>(source: &mut S) -> Result<Link, LinkError> {
    let buffer = source.read_region(layout::LINK_SIZE)?;
    Ok(decode_link(&buffer)?)
}

/// Read one sample, accepting it only when two back-to-back reads match.
///
/// Mismatching reads mean the writer was mid-update; the pair is discarded
/// and read again, at most `attempts` times (minimum one).
pub fn read_stable_link<S: ByteSource + ?Sized>(
    source: &mut S,
    attempts: usize,
) -> Result<Link, LinkError> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        let first = source.read_region(layout::LINK_SIZE)?;
        let second = source.read_region(layout::LINK_SIZE)?;
        if first == second {
            return Ok(decode_link(&first)?);
        }
        log::warn!("torn read on attempt {attempt}/{attempts}, reading again");
    }
    Err(LinkError::Unstable { attempts })
}

/// Read, decode and assemble one snapshot.
pub fn read_snapshot<S: ByteSource + ?Sized>(source: &mut S) -> Result<Snapshot, LinkError> {
    let link = read_link(source)?;
    Ok(assemble_link(&link)?)
}

/// Read one snapshot from a file-backed segment.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use gw2link_core::read_snapshot_file;
///
/// let snapshot = read_snapshot_file(Path::new("/dev/shm/MumbleLink"))?;
/// println!("map {} at {:?}", snapshot.map_id, snapshot.position);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_snapshot_file(path: &Path) -> Result<Snapshot, LinkError> {
    let mut source = FileSource::open(path)?;
    read_snapshot(&mut source)
}
