//! Entity structs mirrored from the backend.
//!
//! Field names follow the backend's camelCase JSON. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for wire roundtrips and schema
//! validation.

mod address;
mod coordinates;
mod organization;

pub use address::Address;
pub use coordinates::Coordinates;
pub use organization::{Organization, OrganizationEnvelope};
