//! Boundary (`bq`) queries restricting matches to the visible map area.

use std::fmt;

/// An inclusive range of encoded ordinates.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodedRange {
    pub min: i64,
    pub max: i64,
}

impl EncodedRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Encoded bounding box of a viewport.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub lat: EncodedRange,
    pub lon: EncodedRange,
}

impl BoundingBox {
    pub fn new(lat: EncodedRange, lon: EncodedRange) -> Self {
        Self { lat, lon }
    }

    /// The box spans the antimeridian. Decided on encoded longitude.
    pub fn crosses_antimeridian(&self) -> bool {
        self.lon.min > self.lon.max
    }
}

/// Range syntax of the structured query grammar. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RangeTerm {
    from: Option<i64>,
    to: Option<i64>,
}

impl RangeTerm {
    fn closed(range: EncodedRange) -> Self {
        Self {
            from: Some(range.min),
            to: Some(range.max),
        }
    }

    fn up_to(max: i64) -> Self {
        Self {
            from: None,
            to: Some(max),
        }
    }

    fn from(min: i64) -> Self {
        Self {
            from: Some(min),
            to: None,
        }
    }
}

impl fmt::Display for RangeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(from) = self.from {
            write!(f, "{from}")?;
        }
        f.write_str("..")?;
        if let Some(to) = self.to {
            write!(f, "{to}")?;
        }
        Ok(())
    }
}

/// Builds `bq` clauses over the two encoded coordinate fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryQueryBuilder {
    lat_field: String,
    lon_field: String,
}

impl BoundaryQueryBuilder {
    pub fn new(lat_field: impl Into<String>, lon_field: impl Into<String>) -> Self {
        Self {
            lat_field: lat_field.into(),
            lon_field: lon_field.into(),
        }
    }

    pub fn lat_field(&self) -> &str {
        &self.lat_field
    }

    pub fn lon_field(&self) -> &str {
        &self.lon_field
    }

    /// `(and lat:min..max lon:min..max)`, or when the box crosses the
    /// antimeridian the union of its two longitude halves:
    /// `(or (and lat:min..max lon:..lon_max) (and lat:min..max lon:lon_min..))`.
    ///
    /// An inverted latitude range is passed through unchanged.
    pub fn build(&self, bounds: &BoundingBox) -> String {
        let lat = RangeTerm::closed(bounds.lat);
        if bounds.crosses_antimeridian() {
            let west = self.clause(lat, RangeTerm::up_to(bounds.lon.max));
            let east = self.clause(lat, RangeTerm::from(bounds.lon.min));
            format!("(or {west} {east})")
        } else {
            self.clause(lat, RangeTerm::closed(bounds.lon))
        }
    }

    fn clause(&self, lat: RangeTerm, lon: RangeTerm) -> String {
        format!("(and {}:{lat} {}:{lon})", self.lat_field, self.lon_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> BoundaryQueryBuilder {
        BoundaryQueryBuilder::new("latF", "lonF")
    }

    #[test]
    fn test_normal_box() {
        let bounds = BoundingBox::new(EncodedRange::new(1000, 2000), EncodedRange::new(500, 1500));
        assert!(!bounds.crosses_antimeridian());
        assert_eq!(
            builder().build(&bounds),
            "(and latF:1000..2000 lonF:500..1500)"
        );
    }

    #[test]
    fn test_single_meridian_box() {
        let bounds = BoundingBox::new(EncodedRange::new(1000, 2000), EncodedRange::new(700, 700));
        assert_eq!(builder().build(&bounds), "(and latF:1000..2000 lonF:700..700)");
    }

    #[test]
    fn test_antimeridian_wraparound() {
        let bounds = BoundingBox::new(EncodedRange::new(1000, 2000), EncodedRange::new(35000, 100));
        assert!(bounds.crosses_antimeridian());
        assert_eq!(
            builder().build(&bounds),
            "(or (and latF:1000..2000 lonF:..100) (and latF:1000..2000 lonF:35000..))"
        );
    }

    #[test]
    fn test_inverted_latitude_is_not_rewritten() {
        let bounds = BoundingBox::new(EncodedRange::new(2000, 1000), EncodedRange::new(500, 1500));
        assert_eq!(
            builder().build(&bounds),
            "(and latF:2000..1000 lonF:500..1500)"
        );
    }

    #[test]
    fn test_range_term_display() {
        assert_eq!(RangeTerm::closed(EncodedRange::new(1, 2)).to_string(), "1..2");
        assert_eq!(RangeTerm::up_to(5).to_string(), "..5");
        assert_eq!(RangeTerm::from(5).to_string(), "5..");
    }
}
