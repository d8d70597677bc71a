//! Geometry conversion utilities shared by region generation, aggregation and
//! export.
//!
//! All boolean work is delegated to the `geo` crate ([`BooleanOps`]); this
//! module only builds the input shapes and converts between coordinate
//! representations. Every polygon leaving this module has its exterior wound
//! counter-clockwise ([`Direction::Default`]).

use geo::orient::{Direction, Orient};
use geo::{Area, BooleanOps, Buffer, Coord, LineString, MultiPolygon, Point, Polygon};
use thiserror::Error;

use crate::coord::LatLon;

/// Number of vertices used to approximate circles and ellipses.
pub const CURVE_SEGMENTS: usize = 64;

/// Height-to-width ratio applied to circle regions.
///
/// Degrees of longitude are shorter than degrees of latitude away from the
/// equator, so a "circle" drawn in lon/lat space is squashed vertically.
pub const CIRCLE_ASPECT: f64 = 0.75;

/// Errors raised while building geometry from raw coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Ring has {0} distinct points, at least 3 are required")]
    DegenerateRing(usize),

    #[error("Ring coordinate sequences differ in length: {lon} longitudes, {lat} latitudes")]
    MismatchedRing { lon: usize, lat: usize },

    #[error("Distance must be finite and non-negative, got {0}")]
    InvalidDistance(f64),

    #[error("Path is empty")]
    EmptyPath,
}

/// An empty multipolygon.
pub fn empty() -> MultiPolygon<f64> {
    MultiPolygon::new(Vec::new())
}

/// Builds a polygon from a coordinate ring.
///
/// The ring is taken as-is (no reordering); `geo` closes it if the last point
/// differs from the first, so an already-closed ring round-trips exactly.
pub fn ring_to_polygon(ring: &[LatLon]) -> Result<Polygon<f64>, GeometryError> {
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .map(|c| {
            let (x, y) = c.to_xy();
            Coord { x, y }
        })
        .collect();
    polygon_from_coords(coords)
}

/// Builds a polygon from parallel longitude/latitude sequences.
pub fn lon_lat_to_polygon(lon: &[f64], lat: &[f64]) -> Result<Polygon<f64>, GeometryError> {
    if lon.len() != lat.len() {
        return Err(GeometryError::MismatchedRing {
            lon: lon.len(),
            lat: lat.len(),
        });
    }
    let coords = lon.iter().zip(lat).map(|(&x, &y)| Coord { x, y }).collect();
    polygon_from_coords(coords)
}

fn polygon_from_coords(coords: Vec<Coord<f64>>) -> Result<Polygon<f64>, GeometryError> {
    let distinct = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => coords.len() - 1,
        _ => coords.len(),
    };
    if distinct < 3 {
        return Err(GeometryError::DegenerateRing(distinct));
    }
    Ok(Polygon::new(LineString::from(coords), Vec::new()))
}

/// Exterior ring of a polygon as geographic coordinates.
pub fn exterior_coords(polygon: &Polygon<f64>) -> Vec<LatLon> {
    polygon
        .exterior()
        .coords()
        .map(|c| LatLon::from_xy(c.x, c.y))
        .collect()
}

/// Axis-aligned ellipse approximated with `segments` vertices.
///
/// `width` and `height` are full extents (diameters), not semi-axes.
pub fn ellipse(center: LatLon, width: f64, height: f64, segments: usize) -> Polygon<f64> {
    let (cx, cy) = center.to_xy();
    let (a, b) = (width / 2.0, height / 2.0);
    let segments = segments.max(3);
    let coords: Vec<Coord<f64>> = (0..segments)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / segments as f64;
            Coord {
                x: cx + a * t.cos(),
                y: cy + b * t.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::from(coords), Vec::new())
}

/// Circle region: an ellipse `radius` wide and `CIRCLE_ASPECT * radius` tall.
pub fn circle_region(center: LatLon, radius: f64) -> Polygon<f64> {
    ellipse(center, radius, CIRCLE_ASPECT * radius, CURVE_SEGMENTS)
}

/// Buffers an ordered path by `distance`, producing a corridor with rounded
/// joins and caps.
///
/// Repeated consecutive points are dropped; a path that collapses to a
/// single point buffers to a disc. A zero distance yields an empty
/// result.
pub fn corridor(path: &[LatLon], distance: f64) -> Result<MultiPolygon<f64>, GeometryError> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(GeometryError::InvalidDistance(distance));
    }
    if path.is_empty() {
        return Err(GeometryError::EmptyPath);
    }
    if distance == 0.0 {
        return Ok(empty());
    }

    let mut coords: Vec<Coord<f64>> = path
        .iter()
        .map(|p| {
            let (x, y) = p.to_xy();
            Coord { x, y }
        })
        .collect();
    coords.dedup();
    let buffered = if coords.len() == 1 {
        Point::from(coords[0]).buffer(distance)
    } else {
        LineString::from(coords).buffer(distance)
    };
    Ok(buffered.orient(Direction::Default))
}

/// Unions any number of polygons into one multipolygon.
pub fn union_all<I>(polygons: I) -> MultiPolygon<f64>
where
    I: IntoIterator<Item = Polygon<f64>>,
{
    polygons.into_iter().fold(empty(), |acc, polygon| {
        let piece = MultiPolygon::new(vec![polygon.orient(Direction::Default)]);
        acc.union(&piece)
    })
}

/// Unsigned area in squared coordinate units.
pub fn area(region: &MultiPolygon<f64>) -> f64 {
    region.unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<LatLon> {
        vec![
            LatLon::from_xy(x, y),
            LatLon::from_xy(x + size, y),
            LatLon::from_xy(x + size, y + size),
            LatLon::from_xy(x, y + size),
            LatLon::from_xy(x, y),
        ]
    }

    #[test]
    fn test_closed_ring_round_trips() {
        let ring = square(18.0, 45.0, 0.5);
        let polygon = ring_to_polygon(&ring).unwrap();
        assert_eq!(exterior_coords(&polygon), ring);
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let ring = vec![LatLon::from_xy(0.0, 0.0), LatLon::from_xy(1.0, 0.0)];
        assert_eq!(
            ring_to_polygon(&ring),
            Err(GeometryError::DegenerateRing(2))
        );
    }

    #[test]
    fn test_mismatched_lon_lat() {
        let err = lon_lat_to_polygon(&[0.0, 1.0, 1.0], &[0.0, 0.0]).unwrap_err();
        assert_eq!(err, GeometryError::MismatchedRing { lon: 3, lat: 2 });
    }

    #[test]
    fn test_circle_region_extent() {
        let center = LatLon::from_xy(10.0, 20.0);
        let polygon = circle_region(center, 2.0);
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for c in polygon.exterior().coords() {
            min_x = min_x.min(c.x);
            max_x = max_x.max(c.x);
            min_y = min_y.min(c.y);
            max_y = max_y.max(c.y);
        }
        assert!((max_x - min_x - 2.0).abs() < 1e-9, "width should equal radius");
        assert!((max_y - min_y - 1.5).abs() < 1e-2, "height should be 0.75 radius");
    }

    #[test]
    fn test_corridor_zero_distance_is_empty() {
        let path = vec![LatLon::from_xy(0.0, 0.0), LatLon::from_xy(1.0, 0.0)];
        assert!(corridor(&path, 0.0).unwrap().0.is_empty());
    }

    #[test]
    fn test_corridor_negative_distance_rejected() {
        let path = vec![LatLon::from_xy(0.0, 0.0)];
        assert!(matches!(
            corridor(&path, -1.0),
            Err(GeometryError::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_corridor_area_close_to_stadium() {
        // Stadium: rectangle 10 x 2 plus a unit disc split over both caps
        let path = vec![LatLon::from_xy(0.0, 0.0), LatLon::from_xy(10.0, 0.0)];
        let region = corridor(&path, 1.0).unwrap();
        let expected = 10.0 * 2.0 + std::f64::consts::PI;
        assert_eq!(region.0.len(), 1);
        assert!((area(&region) - expected).abs() / expected < 0.01);
    }

    #[test]
    fn test_corridor_bends_stay_connected() {
        let path = vec![
            LatLon::from_xy(0.0, 0.0),
            LatLon::from_xy(4.0, 0.0),
            LatLon::from_xy(4.0, 4.0),
            LatLon::from_xy(4.0, 4.0),
        ];
        let region = corridor(&path, 0.5).unwrap();
        assert_eq!(region.0.len(), 1);
        // Two 4 x 1 arms, one disc's worth of caps and the rounded join
        let lower = 8.0;
        let upper = 8.0 + std::f64::consts::PI * 0.25 * 1.5;
        assert!(area(&region) > lower && area(&region) < upper);
    }

    #[test]
    fn test_corridor_single_point_is_disc() {
        let region = corridor(&[LatLon::from_xy(3.0, 3.0)], 1.0).unwrap();
        assert_eq!(region.0.len(), 1);
        assert!((area(&region) - std::f64::consts::PI).abs() / std::f64::consts::PI < 0.01);
    }

    #[test]
    fn test_union_all_merges_overlap() {
        let a = ring_to_polygon(&square(0.0, 0.0, 2.0)).unwrap();
        let b = ring_to_polygon(&square(1.0, 1.0, 2.0)).unwrap();
        let merged = union_all(vec![a, b]);
        assert_eq!(merged.0.len(), 1);
        assert!((area(&merged) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_all_keeps_disjoint_parts() {
        let a = ring_to_polygon(&square(0.0, 0.0, 1.0)).unwrap();
        let b = ring_to_polygon(&square(5.0, 5.0, 1.0)).unwrap();
        let merged = union_all(vec![a, b]);
        assert_eq!(merged.0.len(), 2);
        assert!((area(&merged) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_with_self_is_idempotent() {
        let a = ring_to_polygon(&square(0.0, 0.0, 1.0)).unwrap();
        let once = union_all(vec![a.clone()]);
        let twice = once.union(&once);
        assert!((area(&once) - area(&twice)).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_ellipse_stays_inside_bounding_box(
            x in -170.0f64..170.0,
            y in -80.0f64..80.0,
            radius in 0.001f64..5.0,
        ) {
            let polygon = circle_region(LatLon::from_xy(x, y), radius);
            for c in polygon.exterior().coords() {
                prop_assert!((c.x - x).abs() <= radius / 2.0 + 1e-9);
                prop_assert!((c.y - y).abs() <= CIRCLE_ASPECT * radius / 2.0 + 1e-9);
            }
        }

        #[test]
        fn prop_open_ring_gets_closed(
            points in proptest::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 3..12)
        ) {
            let ring: Vec<LatLon> = points.iter().map(|&(x, y)| LatLon::from_xy(x, y)).collect();
            if let Ok(polygon) = ring_to_polygon(&ring) {
                let coords = exterior_coords(&polygon);
                prop_assert_eq!(coords.first(), coords.last());
                prop_assert_eq!(&coords[..ring.len()], &ring[..]);
            }
        }
    }
}
