//! gw2link core library: decoding of the game client's link segment.
//!
//! The game client publishes avatar/camera pose, map identity and minimap
//! state into a fixed-size shared-memory segment. This crate decodes that
//! segment into a [`Snapshot`]:
//! sources -> link decoder (layout/reader/parser) -> snapshot assembler.
//!
//! Decoding and assembly are byte-oriented and side-effect free; all I/O is
//! isolated in `source` and the sampling helpers.
//!
//! Invariants:
//! - Field offsets come from an explicit layout table; no host struct layout
//!   is ever relied on.
//! - Numeric fields are little-endian; strings are strict UTF-16LE.
//! - Decoding and assembly are total or fail with a typed error; no partial
//!   record or snapshot is produced.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use gw2link_core::read_snapshot_file;
//!
//! let snapshot = read_snapshot_file(Path::new("/dev/shm/MumbleLink"))?;
//! println!("{}", serde_json::to_string(&snapshot)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod link;
mod sampling;
pub mod snapshot;
pub mod source;

pub use link::{DecodeError, Link, decode_link};
pub use sampling::{
    LinkError, PositionTrail, SectionedTrail, TrailEvent, TrailSection, read_link,
    read_snapshot, read_snapshot_file, read_stable_link, simplify,
};
pub use snapshot::{AssembleError, assemble, assemble_link};
pub use source::{ByteSource, FileSource, MemorySource, SourceError};

/// Decoded, self-consistent view of one segment sample.
///
/// Field names and order are the JSON output contract; renaming or removing
/// a field breaks consumers.
///
/// # Examples
/// ```
/// use gw2link_core::Snapshot;
///
/// let snapshot = Snapshot {
///     name: "Foo".to_string(),
///     profession: 1,
///     race: 2,
///     spec: 3,
///     commander: true,
///     team_color_id: 0,
///     map_id: 15,
///     build_id: 12345,
///     ui_tick: 999,
///     position: [12, -4],
/// };
/// let json = serde_json::to_string(&snapshot).unwrap();
/// assert!(json.ends_with(r#""position":[12,-4]}"#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Character name.
    pub name: String,
    /// Profession id.
    pub profession: u32,
    /// Race id.
    pub race: u32,
    /// Active specialization id.
    pub spec: u32,
    /// Whether the commander tag is shown.
    pub commander: bool,
    pub team_color_id: u32,
    pub map_id: u32,
    /// Game build the client is running.
    pub build_id: u32,
    /// Producer tick counter at the time of the sample.
    pub ui_tick: u64,
    /// Minimap player position, rounded half to even.
    pub position: [i64; 2],
}

#[cfg(test)]
mod tests {
    use super::Snapshot;

    #[test]
    fn snapshot_serializes_exact_keys() {
        let snapshot = Snapshot {
            name: "Foo".to_string(),
            profession: 1,
            race: 2,
            spec: 3,
            commander: true,
            team_color_id: 0,
            map_id: 15,
            build_id: 12345,
            ui_tick: 999,
            position: [12, -4],
        };

        let value = serde_json::to_value(&snapshot).expect("snapshot json");
        let object = value.as_object().expect("object");
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "build_id",
                "commander",
                "map_id",
                "name",
                "position",
                "profession",
                "race",
                "spec",
                "team_color_id",
                "ui_tick",
            ]
        );
        assert_eq!(value["position"], serde_json::json!([12, -4]));
        assert_eq!(value["commander"], serde_json::json!(true));
    }
}
