//! Type-dispatched region construction.

use geo::Polygon;
use tracing::debug;

use super::elevation::elevation_band;
use super::{RawGeometry, Region, RegionError};
use crate::cache::{CacheKey, CacheStore};
use crate::coord::LatLon;
use crate::geometry::{circle_region, corridor, lon_lat_to_polygon, ring_to_polygon, GeometryError};
use crate::location::{LocationDescriptor, LocationKind};
use crate::provider::{
    ElevationProvider, ElevationSample, IsochroneRequest, Ring, RoutingProvider, TravelProfile,
};

/// Builds regions for descriptors, fetching external geometry through the
/// cache.
pub struct RegionGenerator<R: RoutingProvider, E: ElevationProvider> {
    cache: CacheStore,
    routing: R,
    elevation: E,
}

impl<R: RoutingProvider, E: ElevationProvider> RegionGenerator<R, E> {
    pub fn new(cache: CacheStore, routing: R, elevation: E) -> Self {
        Self {
            cache,
            routing,
            elevation,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn routing(&self) -> &R {
        &self.routing
    }

    pub fn elevation(&self) -> &E {
        &self.elevation
    }

    /// Generates every region of one location.
    ///
    /// Isochrone locations yield one region per coordinate; every other kind
    /// yields exactly one. Any failure fails the whole location.
    pub fn generate(&self, descriptor: &LocationDescriptor) -> Result<Vec<Region>, RegionError> {
        let regions = match &descriptor.kind {
            LocationKind::Isochrone { profile, minutes } => descriptor
                .coordinates
                .iter()
                .map(|origin| self.isochrone(descriptor, *profile, *minutes, *origin))
                .collect::<Result<Vec<_>, _>>()?,
            LocationKind::Line { buffer_distance } => {
                let area = corridor(&descriptor.coordinates, *buffer_distance)
                    .map_err(|e| geometry_error(descriptor, e))?;
                vec![Region::from_polygons(descriptor.coordinates.clone(), area.0)]
            }
            LocationKind::Circle { radius } => {
                let center = descriptor
                    .coordinates
                    .first()
                    .ok_or_else(|| geometry_error(descriptor, GeometryError::EmptyPath))?;
                vec![Region::from_polygons(
                    vec![*center],
                    vec![circle_region(*center, *radius)],
                )]
            }
            LocationKind::Elevation { grid, min, max } => {
                let key = CacheKey::elevation(&descriptor.canonical_name, &descriptor.category);
                let samples: Vec<ElevationSample> = self.cache.load_or_fetch(&key, || {
                    self.elevation
                        .elevations(grid)
                        .map_err(|source| RegionError::Provider {
                            location: descriptor.name.clone(),
                            source,
                        })
                })?;
                let band = elevation_band(&samples, *min, *max).map_err(|e| {
                    RegionError::Triangulation {
                        location: descriptor.name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                debug!(
                    location = %descriptor.name,
                    samples = samples.len(),
                    polygons = band.0.len(),
                    "Elevation band built"
                );
                vec![Region {
                    source: descriptor.coordinates.clone(),
                    raw: RawGeometry::Samples(samples),
                    polygons: band.0,
                }]
            }
            LocationKind::Standard => {
                let polygon = ring_to_polygon(&descriptor.coordinates)
                    .map_err(|e| geometry_error(descriptor, e))?;
                vec![Region::from_polygons(descriptor.coordinates.clone(), vec![polygon])]
            }
        };
        Ok(regions)
    }

    fn isochrone(
        &self,
        descriptor: &LocationDescriptor,
        profile: TravelProfile,
        minutes: u32,
        origin: LatLon,
    ) -> Result<Region, RegionError> {
        let key = CacheKey::isochrone(&descriptor.canonical_name, origin.lat, origin.lon);
        let request = IsochroneRequest {
            profile,
            origin,
            minutes,
        };
        let rings: Vec<Ring> = self.cache.load_or_fetch(&key, || {
            self.routing
                .isochrone(&request)
                .map_err(|source| RegionError::Provider {
                    location: descriptor.name.clone(),
                    source,
                })
        })?;

        let polygons = rings
            .iter()
            .map(|ring| lon_lat_to_polygon(&ring.lon, &ring.lat))
            .collect::<Result<Vec<Polygon<f64>>, _>>()
            .map_err(|e| geometry_error(descriptor, e))?;

        Ok(Region {
            source: vec![origin],
            raw: RawGeometry::Rings(rings),
            polygons,
        })
    }
}

fn geometry_error(descriptor: &LocationDescriptor, source: GeometryError) -> RegionError {
    RegionError::Geometry {
        location: descriptor.name.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::SampleGrid;
    use crate::geometry::{area, exterior_coords};
    use crate::provider::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingRouting {
        calls: AtomicUsize,
        rings: Result<Vec<Ring>, ProviderError>,
    }

    impl CountingRouting {
        fn returning(rings: Vec<Ring>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rings: Ok(rings),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rings: Err(ProviderError::Timeout("30s".into())),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RoutingProvider for CountingRouting {
        fn isochrone(&self, _request: &IsochroneRequest) -> Result<Vec<Ring>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rings.clone()
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct LatticeElevation {
        calls: AtomicUsize,
    }

    impl ElevationProvider for LatticeElevation {
        fn elevations(&self, _grid: &SampleGrid) -> Result<Vec<ElevationSample>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut samples = Vec::new();
            for y in 0..3 {
                for x in 0..3 {
                    samples.push(ElevationSample {
                        lat: y as f64,
                        lon: x as f64,
                        elevation: 100.0,
                    });
                }
            }
            Ok(samples)
        }

        fn name(&self) -> &str {
            "lattice"
        }
    }

    fn square_ring(x: f64) -> Ring {
        Ring::from_positions(vec![(x, 0.0), (x + 1.0, 0.0), (x + 1.0, 1.0), (x, 1.0), (x, 0.0)])
    }

    fn generator(
        temp: &TempDir,
        routing: CountingRouting,
    ) -> RegionGenerator<CountingRouting, LatticeElevation> {
        RegionGenerator::new(
            CacheStore::new(temp.path()),
            routing,
            LatticeElevation {
                calls: AtomicUsize::new(0),
            },
        )
    }

    fn isochrone_descriptor(origins: Vec<LatLon>) -> LocationDescriptor {
        LocationDescriptor::new(
            "Office",
            "work",
            LocationKind::Isochrone {
                profile: TravelProfile::Walking,
                minutes: 10,
            },
            origins,
        )
    }

    #[test]
    fn test_isochrone_one_region_per_coordinate() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::returning(vec![square_ring(0.0)]));
        let descriptor = isochrone_descriptor(vec![
            LatLon { lat: 45.0, lon: 18.0 },
            LatLon { lat: 45.1, lon: 18.1 },
        ]);

        let regions = gen.generate(&descriptor).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].source, vec![LatLon { lat: 45.1, lon: 18.1 }]);
        assert_eq!(gen.routing().calls(), 2);
    }

    #[test]
    fn test_isochrone_rings_are_not_merged() {
        let temp = TempDir::new().unwrap();
        let rings = vec![square_ring(0.0), square_ring(0.5)];
        let gen = generator(&temp, CountingRouting::returning(rings));
        let descriptor = isochrone_descriptor(vec![LatLon { lat: 45.0, lon: 18.0 }]);

        let regions = gen.generate(&descriptor).unwrap();
        assert_eq!(regions[0].polygons.len(), 2);
        assert!(matches!(&regions[0].raw, RawGeometry::Rings(r) if r.len() == 2));
    }

    #[test]
    fn test_isochrone_fetched_once() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::returning(vec![square_ring(0.0)]));
        let descriptor = isochrone_descriptor(vec![LatLon { lat: 45.0, lon: 18.0 }]);

        let first = gen.generate(&descriptor).unwrap();
        let second = gen.generate(&descriptor).unwrap();
        assert_eq!(gen.routing().calls(), 1);
        assert_eq!(first[0].polygons, second[0].polygons);
    }

    #[test]
    fn test_provider_failure_fails_location() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::failing());
        let descriptor = isochrone_descriptor(vec![LatLon { lat: 45.0, lon: 18.0 }]);

        let result = gen.generate(&descriptor);
        assert!(matches!(
            result,
            Err(RegionError::Provider { ref location, .. }) if location == "Office"
        ));
        assert!(!gen
            .cache()
            .path_for(&CacheKey::isochrone(&descriptor.canonical_name, 45.0, 18.0))
            .exists());
    }

    #[test]
    fn test_standard_round_trip() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::failing());
        let ring = vec![
            LatLon { lat: 45.0, lon: 18.0 },
            LatLon { lat: 45.0, lon: 18.2 },
            LatLon { lat: 45.2, lon: 18.2 },
            LatLon { lat: 45.0, lon: 18.0 },
        ];
        let descriptor =
            LocationDescriptor::new("Park", "nature", LocationKind::Standard, ring.clone());

        let regions = gen.generate(&descriptor).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(exterior_coords(&regions[0].polygons[0]), ring);
    }

    #[test]
    fn test_circle_uses_first_coordinate() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::failing());
        let descriptor = LocationDescriptor::new(
            "Gym",
            "sport",
            LocationKind::Circle { radius: 2.0 },
            vec![LatLon { lat: 10.0, lon: 20.0 }, LatLon { lat: 50.0, lon: 50.0 }],
        );

        let regions = gen.generate(&descriptor).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].source, vec![LatLon { lat: 10.0, lon: 20.0 }]);
        let xs: Vec<f64> = exterior_coords(&regions[0].polygons[0])
            .iter()
            .map(|c| c.lon)
            .collect();
        let max = xs.iter().cloned().fold(f64::MIN, f64::max);
        let min = xs.iter().cloned().fold(f64::MAX, f64::min);
        let width = max - min;
        assert!((width - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_corridor() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::failing());
        let descriptor = LocationDescriptor::new(
            "River",
            "nature",
            LocationKind::Line { buffer_distance: 0.1 },
            vec![LatLon { lat: 45.0, lon: 18.0 }, LatLon { lat: 45.0, lon: 19.0 }],
        );

        let regions = gen.generate(&descriptor).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].polygons.len(), 1);
        let total = area(&regions[0].multi_polygon());
        // 1.0 x 0.2 rectangle plus two half discs
        let stadium = 0.2 + std::f64::consts::PI * 0.01;
        assert!((total - stadium).abs() / stadium < 0.01);
    }

    #[test]
    fn test_elevation_cached_and_banded() {
        let temp = TempDir::new().unwrap();
        let gen = generator(&temp, CountingRouting::failing());
        let grid = SampleGrid {
            top_left: LatLon { lat: 2.0, lon: 0.0 },
            bottom_right: LatLon { lat: 0.0, lon: 2.0 },
            n_points_lat: 3,
            n_points_lon: 3,
        };
        let descriptor = LocationDescriptor::new(
            "Hills",
            "terrain",
            LocationKind::Elevation { grid, min: 100.0, max: 100.0 },
            grid.corners().to_vec(),
        );

        let regions = gen.generate(&descriptor).unwrap();
        gen.generate(&descriptor).unwrap();
        assert_eq!(gen.elevation().calls.load(Ordering::SeqCst), 1);
        assert!((area(&regions[0].multi_polygon()) - 1.0).abs() < 1e-9);
        assert!(matches!(&regions[0].raw, RawGeometry::Samples(s) if s.len() == 9));
    }
}
