//! Link segment decoding.
//!
//! The segment is decoded in layers:
//! - `layout`: the layout table, with offsets derived from field order
//! - `reader`: bounds-checked little-endian reads keyed by layout fields
//! - `parser`: record decoding (`decode`, `decode_link`)
//! - `error`: explicit decoding errors
//!
//! Decoding is pure. The buffer is never reinterpreted in place; each field
//! is copied out of its declared byte range after the length check.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use parser::{ContextRecord, Link, LinkRecord, Pose, Record, decode, decode_link};
pub use reader::{LinkReader, Vec3};
