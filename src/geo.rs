//! Geographic helpers: haversine distance and bounding boxes.

use geo::HaversineDistance;
use geo::Point;

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p1 = Point::new(lon1, lat1);
    let p2 = Point::new(lon2, lat2);
    p1.haversine_distance(&p2)
}

/// Latitude/longitude bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BBox {
    /// An empty box that any `extend` call turns into a valid one.
    pub fn invalid() -> Self {
        Self {
            min_lat: f64::MAX,
            min_lon: f64::MAX,
            max_lat: -f64::MAX,
            max_lon: -f64::MAX,
        }
    }

    pub fn extend(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lat = self.max_lat.max(lat);
        self.max_lon = self.max_lon.max(lon);
    }

    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
            && self.min_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lat.is_finite()
            && self.max_lon.is_finite()
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Corner-to-corner distance in metres.
    pub fn diagonal_m(&self) -> f64 {
        haversine_distance(self.max_lat, self.max_lon, self.min_lat, self.min_lon)
    }
}
