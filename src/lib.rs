// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

//! Radial gauge geometry and animation.
//!
//! A gauge maps a value in a `[min, max]` domain onto an angular sweep and
//! produces ring-sector paths, ticks, labels and an indicator for it. The
//! displayed value is tweened between targets one host frame at a time.
//!
//! ```no_run
//! use radial_gauge::{compose, GaugeConfig, GaugeProps};
//!
//! let props = GaugeProps::builder().value(42.0).max(100.0).unit("%").build();
//! let config = GaugeConfig::resolve(&props)?;
//! let svg = compose(&config, props.value).to_svg();
//! # Ok::<(), radial_gauge::GaugeError>(())
//! ```

pub mod angle;
pub mod arc;
pub mod config;
pub mod error;
pub mod gauge;
pub mod render;
pub mod segments;
pub mod svg;
pub mod ticks;
pub mod tween;
pub mod viewer;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

pub use angle::{from_internal_angle, project_value, to_internal_angle, AngleRange, Domain};
pub use arc::{arc_path, segmented_arc_path, ColoredPath, PathCommand, Point, SectorPath};
pub use config::{
    load_props, props_from_str, thresholds_from_value, GaugeConfig, GaugeProps, IndicatorType,
    LineStyle, TextStyle, ValueFormat,
};
pub use error::{GaugeError, Result};
pub use gauge::{compose, Gauge, GaugeGeometry, Indicator, RingLayout, TextLabel};
pub use render::{render_geometry, Canvas, Color};
pub use segments::{build_segments, color_at, SegmentRange, Threshold};
pub use ticks::{ticks, TextAnchor, TickPoint};
pub use tween::{ease_out_quad, linear, AnimationDriver, EasingFn, FrameHandle, FrameHost, Tween};
pub use viewer::{GaugeCommand, GaugeWindow};
