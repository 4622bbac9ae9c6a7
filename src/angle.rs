// ============================================================================
// ANGLE MAPPING
// ============================================================================
//
// Degree/radian conversion and value-to-angle projection.
//
// Caller-facing angles are in degrees with zero pointing up and positive
// angles sweeping clockwise. Internally everything is in radians in screen
// space (y grows downwards), so zero degrees lands on `-PI / 2`.

use std::f64::consts::PI;

use crate::error::{GaugeError, Result};

const ROTATION_OFFSET_DEGREES: f64 = 90.0;

/// Converts a caller-facing angle in degrees to internal radians.
pub fn to_internal_angle(degrees: f64) -> f64 {
    (degrees - ROTATION_OFFSET_DEGREES) * PI / 180.0
}

/// Inverse of [`to_internal_angle`].
pub fn from_internal_angle(radians: f64) -> f64 {
    radians * 180.0 / PI + ROTATION_OFFSET_DEGREES
}

/// Remaps a `[0, 1]` fraction onto the sweep between two internal angles.
///
/// Works for reversed sweeps (`start > end`) as well.
pub fn sweep_angle(start_angle: f64, end_angle: f64, fraction: f64) -> f64 {
    start_angle + fraction * (end_angle - start_angle)
}

/// Numeric range a gauge value is measured against. Always `max > min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: f64,
    max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(GaugeError::Domain { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamps `value` into `[min, max]`. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Position of `value` within the domain, always in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        ((self.clamp(value) - self.min) / self.span()).clamp(0.0, 1.0)
    }

    /// Maps a fraction back to a domain value.
    pub fn denormalize(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }
}

/// Start and end of the gauge sweep, in caller-facing degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl AngleRange {
    pub const fn new(start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
        }
    }

    pub fn start_radians(&self) -> f64 {
        to_internal_angle(self.start_angle)
    }

    pub fn end_radians(&self) -> f64 {
        to_internal_angle(self.end_angle)
    }

    /// Internal angle reached after sweeping `fraction` of the range.
    pub fn at(&self, fraction: f64) -> f64 {
        sweep_angle(self.start_radians(), self.end_radians(), fraction)
    }
}

impl Default for AngleRange {
    fn default() -> Self {
        Self::new(-40.0, 220.0)
    }
}

/// Projects `value` onto the sweep, returning an internal angle in radians.
///
/// Values outside the domain are clamped, so the result always lies between
/// the two projected end angles.
pub fn project_value(
    value: f64,
    min: f64,
    max: f64,
    start_angle: f64,
    end_angle: f64,
) -> Result<f64> {
    let domain = Domain::new(min, max)?;
    Ok(AngleRange::new(start_angle, end_angle).at(domain.normalize(value)))
}
