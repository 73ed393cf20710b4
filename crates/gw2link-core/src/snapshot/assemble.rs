use super::error::AssembleError;
use super::identity::parse_identity;
use crate::Snapshot;
use crate::link::{ContextRecord, Link, LinkRecord};

/// Build a snapshot from the two decoded records.
///
/// The position is the minimap player position rounded half to even; the
/// avatar and camera vectors are not part of the snapshot.
///
/// # Errors
/// Fails when the identity is malformed, or a player coordinate is not
/// finite or does not fit an `i64` once rounded.
pub fn assemble(primary: &LinkRecord, context: &ContextRecord) -> Result<Snapshot, AssembleError> {
    let identity = parse_identity(&primary.identity)?;
    let position = [
        round_coordinate("x", context.player_x)?,
        round_coordinate("y", context.player_y)?,
    ];

    Ok(Snapshot {
        name: identity.name,
        profession: identity.profession,
        race: identity.race,
        spec: identity.spec,
        commander: identity.commander,
        team_color_id: identity.team_color_id,
        map_id: context.map_id,
        build_id: context.build_id,
        ui_tick: primary.ui_tick,
        position,
    })
}

pub fn assemble_link(link: &Link) -> Result<Snapshot, AssembleError> {
    assemble(&link.primary, &link.context)
}

/// Round a coordinate to the nearest integer, ties to even.
///
/// Values whose rounded form lies outside the `i64` range are rejected
/// rather than clamped.
///
/// # Examples
/// ```
/// use gw2link_core::snapshot::round_coordinate;
///
/// assert_eq!(round_coordinate("x", 12.5).unwrap(), 12);
/// assert_eq!(round_coordinate("y", -3.5).unwrap(), -4);
/// ```
pub fn round_coordinate(axis: &'static str, value: f32) -> Result<i64, AssembleError> {
    if !value.is_finite() {
        return Err(AssembleError::NonFinitePosition { axis, value });
    }
    let rounded = value.round_ties_even();
    if !(-I64_BOUND..I64_BOUND).contains(&rounded) {
        return Err(AssembleError::PositionOutOfRange { axis, value });
    }
    Ok(rounded as i64)
}

/// 2^63, the first `f32` past `i64::MAX`.
const I64_BOUND: f32 = 9_223_372_036_854_775_808.0;
