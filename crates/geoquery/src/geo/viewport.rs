use tracing::debug;

use super::{
    boundary::{BoundaryQueryBuilder, BoundingBox, EncodedRange},
    encoding::{CoordinateEncoder, EncodedPoint, LatLon},
    rank::{RankExpressionComposer, distance_formula},
};

/// Visible map area as reported by the map, in degrees.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub south_west: LatLon,
    pub north_east: LatLon,
}

impl Viewport {
    pub fn new(south_west: LatLon, north_east: LatLon) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Midpoint of the viewport. When the viewport crosses the antimeridian
    /// the longitude midpoint is taken over the wrapped span.
    pub fn center(&self) -> LatLon {
        let lat = (self.south_west.lat + self.north_east.lat) / 2.0;
        let (west, east) = (self.south_west.lon, self.north_east.lon);
        let lon = if west <= east {
            (west + east) / 2.0
        } else {
            let mid = west + (east + 360.0 - west) / 2.0;
            if mid > 180.0 { mid - 360.0 } else { mid }
        };
        LatLon { lat, lon }
    }
}

/// Query-side state of the map: the encoded bounding box and centre of the
/// current viewport, plus the distance weight used for ranking.
///
/// Before the first viewport arrives there is no bounding box and the centre
/// is the encoded origin.
#[derive(Debug, Clone)]
pub struct MapView {
    encoder: CoordinateEncoder,
    boundary: BoundaryQueryBuilder,
    composer: RankExpressionComposer,
    viewport: Option<Viewport>,
    bounds: Option<BoundingBox>,
    center: EncodedPoint,
}

impl MapView {
    pub fn new(
        encoder: CoordinateEncoder,
        lat_field: impl Into<String>,
        lon_field: impl Into<String>,
        distance_weight: u8,
    ) -> Self {
        Self {
            encoder,
            boundary: BoundaryQueryBuilder::new(lat_field, lon_field),
            composer: RankExpressionComposer::new(distance_weight),
            viewport: None,
            bounds: None,
            center: encoder.encode(LatLon::default()),
        }
    }

    /// Viewport change notification. Recomputes the bounding box and centre.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let sw = self.encoder.encode(viewport.south_west);
        let ne = self.encoder.encode(viewport.north_east);
        let bounds = BoundingBox::new(EncodedRange::new(sw.lat, ne.lat), EncodedRange::new(sw.lon, ne.lon));
        self.center = self.encoder.encode(viewport.center());
        debug!(
            ?bounds,
            center = ?self.center,
            wraps = bounds.crosses_antimeridian(),
            "Map viewport changed"
        );
        self.bounds = Some(bounds);
        self.viewport = Some(viewport);
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    /// Encoded centre used as the distance query point.
    pub fn center(&self) -> EncodedPoint {
        self.center
    }

    /// Centre of the current viewport in degrees.
    pub fn center_degrees(&self) -> Option<LatLon> {
        self.viewport.map(|v| v.center())
    }

    pub fn encoder(&self) -> &CoordinateEncoder {
        &self.encoder
    }

    pub fn distance_weight(&self) -> u8 {
        self.composer.distance_weight()
    }

    /// Returns the weight actually stored (clamped to 100).
    pub fn set_distance_weight(&mut self, weight: u8) -> u8 {
        self.composer = RankExpressionComposer::new(weight);
        debug!(weight = self.composer.distance_weight(), "Distance weight changed");
        self.composer.distance_weight()
    }

    pub fn boundary_query(&self) -> Option<String> {
        self.bounds.as_ref().map(|b| self.boundary.build(b))
    }

    pub fn distance_formula(&self) -> String {
        distance_formula(self.boundary.lat_field(), self.boundary.lon_field(), self.center)
    }

    pub fn rank_expression(&self) -> String {
        self.composer.compose(&self.distance_formula())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(weight: u8) -> MapView {
        MapView::new(CoordinateEncoder::default(), "latitude_90", "longitude_180", weight)
    }

    #[test]
    fn test_no_viewport() {
        let view = map(100);
        assert!(view.bounds().is_none());
        assert!(view.boundary_query().is_none());
        assert!(view.center_degrees().is_none());
        assert_eq!(view.center(), EncodedPoint { lat: 9000, lon: 18000 });
        assert_eq!(
            view.rank_expression(),
            "sqrt((latitude_90-9000)^2 + (longitude_180-18000)^2)"
        );
    }

    #[test]
    fn test_viewport_updates_bounds_and_center() {
        let mut view = map(100);
        view.set_viewport(Viewport::new(LatLon::new(10.0, 20.0), LatLon::new(20.0, 40.0)));

        assert_eq!(
            view.bounds(),
            Some(&BoundingBox::new(EncodedRange::new(10000, 11000), EncodedRange::new(20000, 22000)))
        );
        assert_eq!(view.center(), EncodedPoint { lat: 10500, lon: 21000 });
        assert_eq!(
            view.boundary_query().as_deref(),
            Some("(and latitude_90:10000..11000 longitude_180:20000..22000)")
        );
    }

    #[test]
    fn test_viewport_across_antimeridian() {
        let mut view = map(100);
        view.set_viewport(Viewport::new(LatLon::new(-10.0, 170.0), LatLon::new(10.0, -170.0)));

        assert_eq!(
            view.boundary_query().as_deref(),
            Some("(or (and latitude_90:8000..10000 longitude_180:..1000) (and latitude_90:8000..10000 longitude_180:35000..))")
        );
        let center = view.center_degrees().unwrap();
        assert!((center.lon.abs() - 180.0).abs() < 1e-9);
        assert_eq!(view.center().lat, 9000);
    }

    #[test]
    fn test_wrapped_center_normalised() {
        let viewport = Viewport::new(LatLon::new(0.0, 160.0), LatLon::new(0.0, -140.0));
        let center = viewport.center();
        assert!((center.lon - -170.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_weight() {
        let mut view = map(100);
        assert_eq!(view.set_distance_weight(0), 0);
        assert_eq!(view.rank_expression(), "text_relevance");
        assert_eq!(view.set_distance_weight(120), 100);
        assert_eq!(view.distance_weight(), 100);
    }
}
