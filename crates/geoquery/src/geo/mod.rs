//! Geographic side of query building.
//!
//! Coordinates are encoded into non-negative integer ordinates, the current
//! map viewport becomes a boundary query over the encoded fields, and the
//! viewport centre feeds a distance-aware rank expression.

mod boundary;
mod encoding;
mod rank;
mod viewport;

pub use boundary::{BoundaryQueryBuilder, BoundingBox, EncodedRange};
pub use encoding::{CoordinateEncoder, CoordinateOffset, EncodedPoint, LatLon};
pub use rank::{
    DISTANCE_SCALE, MAX_DISTANCE_WEIGHT, RankExpressionComposer, TEXT_RELEVANCE, distance_formula,
};
pub use viewport::{MapView, Viewport};
