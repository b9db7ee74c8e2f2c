use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Id;

/// A point on the organization map.
///
/// Both axes are integers; `x` is bounded by [`Coordinates::MAX_X`] when
/// created through a [`CoordinatesDraft`](crate::drafts::CoordinatesDraft).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Coordinates {
    pub id: Id,
    pub x: i32,
    pub y: i64,
}

impl Coordinates {
    /// Largest accepted `x`.
    pub const MAX_X: i32 = 442;
}
