//! Layout table for the link segment.
//!
//! Every field is declared in segment order and its offset is derived from
//! the end of the previous field, so the table describes a packed layout with
//! no alignment padding regardless of how the host would lay out an
//! equivalent struct. Readers and tests take offsets from here only.

use std::ops::Range;

/// Size of the shared-memory region the game client maps.
pub const SEGMENT_SIZE: usize = 4096;

/// Capacity of the `name` field in UTF-16 code units.
pub const NAME_UNITS: usize = 256;
/// Capacity of the `identity` field in UTF-16 code units.
pub const IDENTITY_UNITS: usize = 256;
/// Length of the opaque socket address at the start of the context record.
pub const SERVER_ADDRESS_LEN: usize = 28;

/// Encoding of a single field. All multi-byte values are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    U16,
    U32,
    U64,
    F32,
    /// Three consecutive `f32` values.
    Vec3,
    /// Fixed-capacity UTF-16LE string, NUL-terminated when shorter.
    Utf16 { units: usize },
    /// Opaque bytes, not decoded further.
    Bytes { len: usize },
}

impl Encoding {
    pub const fn size(self) -> usize {
        match self {
            Encoding::U16 => 2,
            Encoding::U32 | Encoding::F32 => 4,
            Encoding::U64 => 8,
            Encoding::Vec3 => 12,
            Encoding::Utf16 { units } => units * 2,
            Encoding::Bytes { len } => len,
        }
    }
}

/// One row of the layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Byte offset relative to the start of the owning record.
    pub offset: usize,
    pub encoding: Encoding,
}

impl Field {
    /// First field of a record, at offset zero.
    pub const fn first(name: &'static str, encoding: Encoding) -> Self {
        Self {
            name,
            offset: 0,
            encoding,
        }
    }

    /// Field placed immediately after `self`.
    pub const fn then(self, name: &'static str, encoding: Encoding) -> Self {
        Self {
            name,
            offset: self.end(),
            encoding,
        }
    }

    pub const fn size(self) -> usize {
        self.encoding.size()
    }

    pub const fn end(self) -> usize {
        self.offset + self.size()
    }

    pub const fn range(self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Primary record: version, tick, avatar/camera pose, name and identity.
pub mod primary {
    use super::{Encoding, Field, IDENTITY_UNITS, NAME_UNITS};

    pub const UI_VERSION: Field = Field::first("ui_version", Encoding::U32);
    pub const UI_TICK: Field = UI_VERSION.then("ui_tick", Encoding::U64);
    pub const AVATAR_POSITION: Field = UI_TICK.then("avatar_position", Encoding::Vec3);
    pub const AVATAR_FRONT: Field = AVATAR_POSITION.then("avatar_front", Encoding::Vec3);
    pub const AVATAR_TOP: Field = AVATAR_FRONT.then("avatar_top", Encoding::Vec3);
    pub const NAME: Field = AVATAR_TOP.then("name", Encoding::Utf16 { units: NAME_UNITS });
    pub const CAMERA_POSITION: Field = NAME.then("camera_position", Encoding::Vec3);
    pub const CAMERA_FRONT: Field = CAMERA_POSITION.then("camera_front", Encoding::Vec3);
    pub const CAMERA_TOP: Field = CAMERA_FRONT.then("camera_top", Encoding::Vec3);
    pub const IDENTITY: Field = CAMERA_TOP.then(
        "identity",
        Encoding::Utf16 {
            units: IDENTITY_UNITS,
        },
    );
    pub const CONTEXT_LEN: Field = IDENTITY.then("context_len", Encoding::U32);

    pub const FIELDS: &[Field] = &[
        UI_VERSION,
        UI_TICK,
        AVATAR_POSITION,
        AVATAR_FRONT,
        AVATAR_TOP,
        NAME,
        CAMERA_POSITION,
        CAMERA_FRONT,
        CAMERA_TOP,
        IDENTITY,
        CONTEXT_LEN,
    ];

    pub const SIZE: usize = CONTEXT_LEN.end();
}

/// Context record: map/session identity and minimap state.
pub mod context {
    use super::{Encoding, Field, SERVER_ADDRESS_LEN};

    pub const SERVER_ADDRESS: Field = Field::first(
        "server_address",
        Encoding::Bytes {
            len: SERVER_ADDRESS_LEN,
        },
    );
    pub const MAP_ID: Field = SERVER_ADDRESS.then("map_id", Encoding::U32);
    pub const MAP_TYPE: Field = MAP_ID.then("map_type", Encoding::U32);
    pub const SHARD_ID: Field = MAP_TYPE.then("shard_id", Encoding::U32);
    pub const INSTANCE: Field = SHARD_ID.then("instance", Encoding::U32);
    pub const BUILD_ID: Field = INSTANCE.then("build_id", Encoding::U32);
    pub const UI_STATE: Field = BUILD_ID.then("ui_state", Encoding::U32);
    pub const COMPASS_WIDTH: Field = UI_STATE.then("compass_width", Encoding::U16);
    pub const COMPASS_HEIGHT: Field = COMPASS_WIDTH.then("compass_height", Encoding::U16);
    pub const COMPASS_ROTATION: Field = COMPASS_HEIGHT.then("compass_rotation", Encoding::F32);
    pub const PLAYER_X: Field = COMPASS_ROTATION.then("player_x", Encoding::F32);
    pub const PLAYER_Y: Field = PLAYER_X.then("player_y", Encoding::F32);
    pub const MAP_CENTER_X: Field = PLAYER_Y.then("map_center_x", Encoding::F32);
    pub const MAP_CENTER_Y: Field = MAP_CENTER_X.then("map_center_y", Encoding::F32);
    pub const MAP_SCALE: Field = MAP_CENTER_Y.then("map_scale", Encoding::F32);

    pub const FIELDS: &[Field] = &[
        SERVER_ADDRESS,
        MAP_ID,
        MAP_TYPE,
        SHARD_ID,
        INSTANCE,
        BUILD_ID,
        UI_STATE,
        COMPASS_WIDTH,
        COMPASS_HEIGHT,
        COMPASS_ROTATION,
        PLAYER_X,
        PLAYER_Y,
        MAP_CENTER_X,
        MAP_CENTER_Y,
        MAP_SCALE,
    ];

    pub const SIZE: usize = MAP_SCALE.end();
}

pub const PRIMARY_SIZE: usize = primary::SIZE;
pub const CONTEXT_SIZE: usize = context::SIZE;
/// Bytes read from the segment for one sample: primary record then context.
pub const LINK_SIZE: usize = PRIMARY_SIZE + CONTEXT_SIZE;

pub const PRIMARY_RANGE: Range<usize> = 0..PRIMARY_SIZE;
pub const CONTEXT_RANGE: Range<usize> = PRIMARY_SIZE..LINK_SIZE;

const _: () = assert!(LINK_SIZE <= SEGMENT_SIZE);
