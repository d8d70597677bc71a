//! Locus - Region synthesis and composition for choosing where to live
//!
//! This library turns location criteria (commute-time isochrones, proximity
//! corridors, radii, elevation bands) into planar regions and combines them
//! into a single eligible area.
//!
//! # Pipeline
//!
//! ```text
//! config entries ─► location::resolve ─► region::RegionGenerator ─► aggregate ─► compose
//!                                          │                                        │
//!                                          ├─ cache::CacheStore                     ▼
//!                                          └─ provider (routing / elevation)    render
//! ```
//!
//! Coordinates are carried as [`coord::LatLon`] and mapped onto the plane as
//! `x = longitude`, `y = latitude` for all geometry work.

pub mod aggregate;
pub mod app;
pub mod cache;
pub mod compose;
pub mod config;
pub mod coord;
pub mod geometry;
pub mod location;
pub mod pipeline;
pub mod provider;
pub mod region;
pub mod render;

/// Library version, recorded in exported files.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
