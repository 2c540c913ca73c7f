//! Rank expressions blending text relevance with distance from a point.

use super::encoding::EncodedPoint;

/// Backend pseudo-field carrying the built-in text relevance score.
pub const TEXT_RELEVANCE: &str = "text_relevance";

/// Factor applied to the distance term before weighting, to bring it into
/// rough parity with `text_relevance` (0..1000).
pub const DISTANCE_SCALE: u32 = 5;

pub const MAX_DISTANCE_WEIGHT: u8 = 100;

/// Euclidean distance between two encoded coordinate fields and a query point.
pub fn distance_formula(lat_field: &str, lon_field: &str, point: EncodedPoint) -> String {
    format!(
        "sqrt(({lat_field}-{})^2 + ({lon_field}-{})^2)",
        point.lat, point.lon
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankExpressionComposer {
    distance_weight: u8,
}

impl Default for RankExpressionComposer {
    fn default() -> Self {
        Self {
            distance_weight: MAX_DISTANCE_WEIGHT,
        }
    }
}

impl RankExpressionComposer {
    /// Weights above 100 are clamped.
    pub fn new(distance_weight: u8) -> Self {
        Self {
            distance_weight: distance_weight.min(MAX_DISTANCE_WEIGHT),
        }
    }

    pub fn distance_weight(&self) -> u8 {
        self.distance_weight
    }

    pub fn text_weight(&self) -> u8 {
        MAX_DISTANCE_WEIGHT - self.distance_weight
    }

    pub fn compose(&self, distance_formula: &str) -> String {
        match self.distance_weight {
            MAX_DISTANCE_WEIGHT => distance_formula.to_string(),
            0 => TEXT_RELEVANCE.to_string(),
            distance_weight => format!(
                "({} * {TEXT_RELEVANCE}) + ({distance_weight} * ({DISTANCE_SCALE} * {distance_formula}))/100",
                self.text_weight()
            ),
        }
    }
}
