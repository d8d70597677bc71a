//! Elevation banding over a Voronoi partition of sample points.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use spade::{DelaunayTriangulation, HasPosition, InsertionError, Point2, Triangulation};

use crate::geometry::union_all;
use crate::provider::ElevationSample;

/// Cell vertices closer than this are merged.
const VERTEX_EPSILON: f64 = 1e-10;

struct Site {
    position: Point2<f64>,
    elevation: f64,
}

impl HasPosition for Site {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Voronoi cells of every sample whose elevation lies in `[min, max]`.
///
/// Cells with a vertex at infinity (samples on the convex hull) are dropped,
/// as are cells left with fewer than 3 distinct vertices.
pub fn band_cells(
    samples: &[ElevationSample],
    min: f64,
    max: f64,
) -> Result<Vec<Polygon<f64>>, InsertionError> {
    let mut triangulation: DelaunayTriangulation<Site> = DelaunayTriangulation::new();
    for sample in samples {
        triangulation.insert(Site {
            position: Point2::new(sample.lon, sample.lat),
            elevation: sample.elevation,
        })?;
    }

    let mut cells = Vec::new();
    for face in triangulation.voronoi_faces() {
        let elevation = face.as_delaunay_vertex().data().elevation;
        if elevation < min || elevation > max {
            continue;
        }

        let mut vertices: Vec<Coord<f64>> = Vec::new();
        let mut bounded = true;
        for edge in face.adjacent_edges() {
            match edge.from().position() {
                Some(p) => {
                    let coord = Coord { x: p.x, y: p.y };
                    let duplicate = vertices.last().is_some_and(|last| near(*last, coord));
                    if !duplicate {
                        vertices.push(coord);
                    }
                }
                None => {
                    bounded = false;
                    break;
                }
            }
        }
        if !bounded {
            continue;
        }
        if vertices.len() > 1 && near(vertices[0], vertices[vertices.len() - 1]) {
            vertices.pop();
        }
        if vertices.len() < 3 {
            continue;
        }
        cells.push(Polygon::new(LineString::from(vertices), Vec::new()));
    }
    Ok(cells)
}

/// Union of the in-band cells.
pub fn elevation_band(
    samples: &[ElevationSample],
    min: f64,
    max: f64,
) -> Result<MultiPolygon<f64>, InsertionError> {
    Ok(union_all(band_cells(samples, min, max)?))
}

fn near(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() < VERTEX_EPSILON && (a.y - b.y).abs() < VERTEX_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::area;

    /// 3x3 unit lattice; only the center sample has a bounded cell.
    fn lattice(center: f64, rest: f64) -> Vec<ElevationSample> {
        let mut samples = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                let elevation = if x == 1 && y == 1 { center } else { rest };
                samples.push(ElevationSample {
                    lat: y as f64,
                    lon: x as f64,
                    elevation,
                });
            }
        }
        samples
    }

    #[test]
    fn test_hull_cells_are_dropped() {
        let band = elevation_band(&lattice(100.0, 100.0), 0.0, 1000.0).unwrap();
        assert_eq!(band.0.len(), 1);
        assert!((area(&band) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_is_inclusive_at_min() {
        let band = elevation_band(&lattice(120.0, 100.0), 120.0, 130.0).unwrap();
        assert!((area(&band) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_is_inclusive_at_max() {
        let band = elevation_band(&lattice(120.0, 100.0), 110.0, 120.0).unwrap();
        assert!((area(&band) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_band_cell_is_dropped() {
        let band = elevation_band(&lattice(120.0, 100.0), 120.5, 130.0).unwrap();
        assert!(band.0.is_empty());
    }

    #[test]
    fn test_too_few_samples_yield_nothing() {
        let samples = lattice(100.0, 100.0);
        let band = elevation_band(&samples[..2], 0.0, 1000.0).unwrap();
        assert!(band.0.is_empty());
        assert!(elevation_band(&[], 0.0, 1000.0).unwrap().0.is_empty());
    }

    #[test]
    fn test_adjacent_cells_merge() {
        // 4x3 lattice: the two interior samples share an edge
        let mut samples = Vec::new();
        for y in 0..3 {
            for x in 0..4 {
                samples.push(ElevationSample {
                    lat: y as f64,
                    lon: x as f64,
                    elevation: 50.0,
                });
            }
        }
        let band = elevation_band(&samples, 50.0, 50.0).unwrap();
        assert_eq!(band.0.len(), 1);
        assert!((area(&band) - 2.0).abs() < 1e-9);
    }
}
