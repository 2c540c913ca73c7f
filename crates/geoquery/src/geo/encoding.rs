//! Offset encoding of geographic degrees into non-negative integer ordinates.
//!
//! Range filters on the search backend only work on unsigned integer fields,
//! so latitudes and longitudes are indexed shifted by a fixed offset and
//! multiplied by a scale. With the default offsets (90, 180) and scale (100)
//! every valid coordinate lands in `0..=18000` / `0..=36000` with a
//! precision of 1/100 degree.

/// Offsets and scale used to encode coordinates.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateOffset {
    pub latitude_offset: f64,
    pub longitude_offset: f64,
    pub scale: f64,
}

impl Default for CoordinateOffset {
    fn default() -> Self {
        Self {
            latitude_offset: 90.0,
            longitude_offset: 180.0,
            scale: 100.0,
        }
    }
}

/// A point in degrees.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A point in encoded ordinates.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodedPoint {
    pub lat: i64,
    pub lon: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateEncoder {
    offset: CoordinateOffset,
}

impl CoordinateEncoder {
    pub fn new(offset: CoordinateOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> CoordinateOffset {
        self.offset
    }

    /// `round((degree + latitude_offset) * scale)`
    pub fn encode_lat(&self, degree: f64) -> i64 {
        ((degree + self.offset.latitude_offset) * self.offset.scale).round() as i64
    }

    /// `round((degree + longitude_offset) * scale)`
    pub fn encode_lon(&self, degree: f64) -> i64 {
        ((degree + self.offset.longitude_offset) * self.offset.scale).round() as i64
    }

    pub fn encode(&self, point: LatLon) -> EncodedPoint {
        EncodedPoint {
            lat: self.encode_lat(point.lat),
            lon: self.encode_lon(point.lon),
        }
    }

    pub fn decode_lat(&self, value: i64) -> f64 {
        value as f64 / self.offset.scale - self.offset.latitude_offset
    }

    pub fn decode_lon(&self, value: i64) -> f64 {
        value as f64 / self.offset.scale - self.offset.longitude_offset
    }

    pub fn decode(&self, point: EncodedPoint) -> LatLon {
        LatLon {
            lat: self.decode_lat(point.lat),
            lon: self.decode_lon(point.lon),
        }
    }
}
