use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::AssembleError;

/// Character identity published by the game as a JSON object.
///
/// Keys not listed here (`world_id`, `fov`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub name: String,
    pub profession: u32,
    pub race: u32,
    /// Active specialization id.
    pub spec: u32,
    pub commander: bool,
    pub team_color_id: u32,
}

/// Parse the identity string decoded from the primary record.
///
/// # Examples
/// ```
/// use gw2link_core::snapshot::parse_identity;
///
/// let raw = r#"{"name":"Foo","profession":1,"race":2,"spec":3,"commander":true,"team_color_id":0}"#;
/// let identity = parse_identity(raw)?;
/// assert_eq!(identity.name, "Foo");
/// assert!(parse_identity(r#"{"name":"Foo"}"#).is_err());
/// # Ok::<(), gw2link_core::snapshot::AssembleError>(())
/// ```
///
/// # Errors
/// Returns `MalformedIdentity` when the input is not a JSON object, misses a
/// required key, or carries a key of the wrong type.
pub fn parse_identity(raw: &str) -> Result<Identity, AssembleError> {
    // Parsed as a map first: a derived struct would also accept a JSON array.
    let object: Map<String, Value> =
        serde_json::from_str(raw).map_err(|err| AssembleError::MalformedIdentity(err.to_string()))?;
    Identity::deserialize(Value::Object(object))
        .map_err(|err| AssembleError::MalformedIdentity(err.to_string()))
}
