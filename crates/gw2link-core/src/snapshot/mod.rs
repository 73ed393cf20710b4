//! Snapshot assembly.
//!
//! Combines the primary and context records with the JSON identity carried
//! in the primary record. Assembly is all-or-nothing: any failure aborts
//! without producing a partial snapshot.

pub mod assemble;
pub mod error;
pub mod identity;

pub use assemble::{assemble, assemble_link, round_coordinate};
pub use error::AssembleError;
pub use identity::{Identity, parse_identity};
