//! `hawkeye-mapping` – the HawkEye 2-D occupancy mapping engine.
//!
//! Maintains a large global map and a robot-centred local map that is
//! reprojected from the global one on every pose update.  Sensor code casts
//! geometry into the local map; synchronization commits it back.
//!
//! # Modules
//!
//! - [`transform`] – [`TransformCalculator`][transform::TransformCalculator]:
//!   rotation + translation between a local frame and its base frame.
//! - [`frame`] – [`Frame`][frame::Frame]: a grid of map cells with point,
//!   line, rectangle and arc rasterization and reprojection to/from a base
//!   frame.
//! - [`engine`] – [`HawkEye`][engine::HawkEye]: owns the global and local
//!   frames, handles pose updates and synchronization.
//! - [`smoothing`] – the [`Smoother`][smoothing::Smoother] capability and the
//!   built-in [`ObservationDecay`][smoothing::ObservationDecay].
//! - [`render`] – the [`MapRenderer`][render::MapRenderer] capability with
//!   ASCII and occupancy renderers.
//! - [`report`] – the [`MapReporter`][report::MapReporter] sink for engine
//!   status events.
//! - [`shared`] – [`SharedHawkEye`][shared::SharedHawkEye]: a mutex-guarded
//!   handle for multi-threaded callers.

pub mod engine;
pub mod frame;
pub mod render;
pub mod report;
pub mod shared;
pub mod smoothing;
pub mod transform;

pub use engine::{HawkEye, MapConfig};
