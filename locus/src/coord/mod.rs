//! Coordinate types and sampling helpers
//!
//! Geographic positions are stored as [`LatLon`] in degrees. Geometry work is
//! done on a plane where `x = longitude` and `y = latitude`; no projection is
//! applied, which is why circle regions carry an explicit aspect correction
//! (see [`crate::geometry::ellipse`]).

mod types;

pub use types::{CoordError, LatLon, SampleGrid, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Evenly spaced values from `start` to `end` inclusive.
///
/// Mirrors the usual `linspace` contract: one point yields `start`, zero
/// points yield an empty vector.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Generates the sample positions for an elevation request.
///
/// Rows run from `top_left.lat` to `bottom_right.lat`, columns from
/// `top_left.lon` to `bottom_right.lon`. Every even row (0, 2, 4, ...) is
/// shifted east by half a column step so neighbouring rows interleave and the
/// Voronoi cells come out roughly hexagonal.
///
/// # Errors
///
/// Returns [`CoordError::InvalidGrid`] when either axis has fewer than two
/// points, and a latitude/longitude error when a corner is out of range.
pub fn hex_sample_grid(grid: &SampleGrid) -> Result<Vec<LatLon>, CoordError> {
    grid.top_left.validate()?;
    grid.bottom_right.validate()?;
    if grid.n_points_lat < 2 || grid.n_points_lon < 2 {
        return Err(CoordError::InvalidGrid(format!(
            "need at least 2 points per axis, got {}x{}",
            grid.n_points_lat, grid.n_points_lon
        )));
    }

    let lons = linspace(grid.top_left.lon, grid.bottom_right.lon, grid.n_points_lon);
    let lats = linspace(grid.top_left.lat, grid.bottom_right.lat, grid.n_points_lat);
    let half_step = (lons[1] - lons[0]) * 0.5;

    let mut points = Vec::with_capacity(grid.len());
    for (row, lat) in lats.iter().enumerate() {
        let shift = if row % 2 == 0 { half_step } else { 0.0 };
        points.extend(lons.iter().map(|lon| LatLon {
            lat: *lat,
            lon: lon + shift,
        }));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n_lat: usize, n_lon: usize) -> SampleGrid {
        SampleGrid {
            top_left: LatLon { lat: 46.0, lon: 18.0 },
            bottom_right: LatLon { lat: 45.0, lon: 19.0 },
            n_points_lat: n_lat,
            n_points_lon: n_lon,
        }
    }

    #[test]
    fn test_latlon_new_validates_range() {
        assert!(LatLon::new(45.5, 18.7).is_ok());
        assert!(matches!(
            LatLon::new(91.0, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            LatLon::new(0.0, -180.5),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_latlon_nan_is_rejected() {
        assert!(LatLon::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_xy_mapping() {
        let c = LatLon { lat: 45.5, lon: 18.7 };
        assert_eq!(c.to_xy(), (18.7, 45.5));
        assert_eq!(LatLon::from_xy(18.7, 45.5), c);
    }

    #[test]
    fn test_latlon_deserializes_from_config_shape() {
        let c: LatLon = serde_json::from_str(r#"{"lat": 45.55, "lon": 18.68}"#).unwrap();
        assert_eq!(c, LatLon { lat: 45.55, lon: 18.68 });
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_hex_grid_shifts_even_rows() {
        let points = hex_sample_grid(&grid(3, 3)).unwrap();
        assert_eq!(points.len(), 9);

        // Row 0 shifted by half of the 0.5° column step
        assert!((points[0].lon - 18.25).abs() < 1e-12);
        // Row 1 unshifted
        assert!((points[3].lon - 18.0).abs() < 1e-12);
        // Row 2 shifted again
        assert!((points[6].lon - 18.25).abs() < 1e-12);

        assert!((points[0].lat - 46.0).abs() < 1e-12);
        assert!((points[8].lat - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_hex_grid_rejects_single_axis() {
        assert!(matches!(
            hex_sample_grid(&grid(1, 4)),
            Err(CoordError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_grid_corners() {
        let corners = grid(2, 2).corners();
        assert_eq!(corners[0], LatLon { lat: 46.0, lon: 18.0 });
        assert_eq!(corners[2], LatLon { lat: 45.0, lon: 19.0 });
        assert_eq!(corners[1], LatLon { lat: 46.0, lon: 19.0 });
    }
}
