use super::error::DecodeError;
use super::layout::{self, Field, context, primary};
use super::reader::{LinkReader, Vec3};

/// A fixed-layout record that can be decoded from its own byte slice.
pub trait Record: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;
    /// Layout table, in field order.
    const FIELDS: &'static [Field];

    /// Decode from a reader over exactly `SIZE` bytes.
    fn read(reader: &LinkReader<'_>) -> Result<Self, DecodeError>;
}

/// Position and orientation vectors, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub front: Vec3,
    pub top: Vec3,
}

/// Primary record at the start of the segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub ui_version: u32,
    pub ui_tick: u64,
    pub avatar: Pose,
    /// Reserved; carried but not part of the snapshot.
    pub name: String,
    pub camera: Pose,
    /// JSON-encoded identity object.
    pub identity: String,
    /// Number of valid bytes in the following context record.
    pub context_len: u32,
}

/// Context record that follows the primary record.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRecord {
    pub server_address: [u8; layout::SERVER_ADDRESS_LEN],
    pub map_id: u32,
    pub map_type: u32,
    pub shard_id: u32,
    pub instance: u32,
    pub build_id: u32,
    pub ui_state: u32,
    pub compass_width: u16,
    pub compass_height: u16,
    pub compass_rotation: f32,
    pub player_x: f32,
    pub player_y: f32,
    pub map_center_x: f32,
    pub map_center_y: f32,
    pub map_scale: f32,
}

/// Both records of one segment sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub primary: LinkRecord,
    pub context: ContextRecord,
}

impl Link {
    /// Prefix of the context record the producer declared valid.
    pub fn context_valid_len(&self) -> usize {
        (self.primary.context_len as usize).min(layout::CONTEXT_SIZE)
    }

    pub fn context_is_complete(&self) -> bool {
        self.context_valid_len() == layout::CONTEXT_SIZE
    }
}

fn read_pose(
    reader: &LinkReader<'_>,
    position: &Field,
    front: &Field,
    top: &Field,
) -> Result<Pose, DecodeError> {
    Ok(Pose {
        position: reader.read_vec3(position)?,
        front: reader.read_vec3(front)?,
        top: reader.read_vec3(top)?,
    })
}

impl Record for LinkRecord {
    const SIZE: usize = primary::SIZE;
    const FIELDS: &'static [Field] = primary::FIELDS;

    fn read(reader: &LinkReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            ui_version: reader.read_u32_le(&primary::UI_VERSION)?,
            ui_tick: reader.read_u64_le(&primary::UI_TICK)?,
            avatar: read_pose(
                reader,
                &primary::AVATAR_POSITION,
                &primary::AVATAR_FRONT,
                &primary::AVATAR_TOP,
            )?,
            name: reader.read_utf16(&primary::NAME)?,
            camera: read_pose(
                reader,
                &primary::CAMERA_POSITION,
                &primary::CAMERA_FRONT,
                &primary::CAMERA_TOP,
            )?,
            identity: reader.read_utf16(&primary::IDENTITY)?,
            context_len: reader.read_u32_le(&primary::CONTEXT_LEN)?,
        })
    }
}

impl Record for ContextRecord {
    const SIZE: usize = context::SIZE;
    const FIELDS: &'static [Field] = context::FIELDS;

    fn read(reader: &LinkReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            server_address: reader.read_bytes(&context::SERVER_ADDRESS)?,
            map_id: reader.read_u32_le(&context::MAP_ID)?,
            map_type: reader.read_u32_le(&context::MAP_TYPE)?,
            shard_id: reader.read_u32_le(&context::SHARD_ID)?,
            instance: reader.read_u32_le(&context::INSTANCE)?,
            build_id: reader.read_u32_le(&context::BUILD_ID)?,
            ui_state: reader.read_u32_le(&context::UI_STATE)?,
            compass_width: reader.read_u16_le(&context::COMPASS_WIDTH)?,
            compass_height: reader.read_u16_le(&context::COMPASS_HEIGHT)?,
            compass_rotation: reader.read_f32_le(&context::COMPASS_ROTATION)?,
            player_x: reader.read_f32_le(&context::PLAYER_X)?,
            player_y: reader.read_f32_le(&context::PLAYER_Y)?,
            map_center_x: reader.read_f32_le(&context::MAP_CENTER_X)?,
            map_center_y: reader.read_f32_le(&context::MAP_CENTER_Y)?,
            map_scale: reader.read_f32_le(&context::MAP_SCALE)?,
        })
    }
}

/// Decode one record from the start of `buffer`.
///
/// Only the first `T::SIZE` bytes are read; a shorter buffer fails with
/// `TruncatedBuffer` and never yields a partial record.
pub fn decode<T: Record>(buffer: &[u8]) -> Result<T, DecodeError> {
    let reader = LinkReader::new(buffer);
    reader.require_len(T::SIZE)?;
    let record = reader.read_slice(0..T::SIZE)?;
    T::read(&LinkReader::new(record))
}

/// Decode a full segment sample of exactly `LINK_SIZE` bytes.
///
/// # Examples
/// ```
/// use gw2link_core::link::{DecodeError, decode_link, layout};
///
/// let buffer = vec![0u8; layout::LINK_SIZE];
/// let link = decode_link(&buffer)?;
/// assert_eq!(link.context.build_id, 0);
///
/// let err = decode_link(&buffer[..10]).unwrap_err();
/// assert!(matches!(err, DecodeError::TruncatedBuffer { .. }));
/// # Ok::<(), DecodeError>(())
/// ```
pub fn decode_link(buffer: &[u8]) -> Result<Link, DecodeError> {
    let reader = LinkReader::new(buffer);
    reader.require_len(layout::LINK_SIZE)?;
    if reader.len() != layout::LINK_SIZE {
        return Err(DecodeError::UnexpectedLength {
            expected: layout::LINK_SIZE,
            actual: reader.len(),
        });
    }

    let primary = decode::<LinkRecord>(reader.read_slice(layout::PRIMARY_RANGE)?)?;
    let context = decode::<ContextRecord>(reader.read_slice(layout::CONTEXT_RANGE)?)?;
    Ok(Link { primary, context })
}
