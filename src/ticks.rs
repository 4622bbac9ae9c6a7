// ============================================================================
// TICKS & LABELS
// ============================================================================
//
// Tick marks and label anchors at segment boundaries.

use crate::angle::{sweep_angle, Domain};
use crate::arc::Point;
use crate::segments::SegmentRange;

/// Radial length of a threshold tick.
pub const TICK_LENGTH: f64 = 6.0;

/// Distance between the tick radius and a threshold label.
pub const LABEL_OFFSET: f64 = 10.0;

/// Horizontal extent below which a label is considered centred.
const ANCHOR_DEAD_ZONE: f64 = 1.0;

/// A radial line from `(x1, y1)` (outer) to `(x2, y2)` (inner), marking
/// the domain `value` at that boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPoint {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Anchor that keeps text outside the ring for a label at `x`.
    pub fn for_x(x: f64) -> Self {
        if x > ANCHOR_DEAD_ZONE {
            TextAnchor::Start
        } else if x < -ANCHOR_DEAD_ZONE {
            TextAnchor::End
        } else {
            TextAnchor::Middle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Where a threshold label goes and which value it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPoint {
    pub position: Point,
    pub value: f64,
    pub anchor: TextAnchor,
}

/// Unique segment boundaries, ascending.
pub fn boundary_fractions(segments: &[SegmentRange]) -> Vec<f64> {
    let mut fractions: Vec<f64> = segments
        .iter()
        .flat_map(|segment| [segment.start, segment.end])
        .collect();
    fractions.sort_by(f64::total_cmp);
    fractions.dedup();
    fractions
}

/// One tick per unique segment boundary, outer end at `radius`.
pub fn ticks(
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    segments: &[SegmentRange],
    domain: &Domain,
) -> Vec<TickPoint> {
    boundary_fractions(segments)
        .into_iter()
        .map(|fraction| {
            let angle = sweep_angle(start_angle, end_angle, fraction);
            let outer = Point::polar(radius, angle);
            let inner = Point::polar(radius - TICK_LENGTH, angle);
            TickPoint {
                x1: outer.x,
                y1: outer.y,
                x2: inner.x,
                y2: inner.y,
                value: domain.denormalize(fraction),
            }
        })
        .collect()
}

/// Label anchors just outside each tick.
pub fn label_points(
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    segments: &[SegmentRange],
    domain: &Domain,
) -> Vec<LabelPoint> {
    boundary_fractions(segments)
        .into_iter()
        .map(|fraction| {
            let angle = sweep_angle(start_angle, end_angle, fraction);
            let position = Point::polar(radius + LABEL_OFFSET, angle);
            LabelPoint {
                position,
                value: domain.denormalize(fraction),
                anchor: TextAnchor::for_x(position.x),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn three_segments() -> Vec<SegmentRange> {
        vec![
            SegmentRange::new(0.0, 0.6, "limegreen"),
            SegmentRange::new(0.6, 0.8, "orange"),
            SegmentRange::new(0.8, 1.0, "tomato"),
        ]
    }

    #[test]
    fn shared_boundaries_collapse() {
        assert_eq!(boundary_fractions(&three_segments()), vec![0.0, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn ticks_carry_domain_values() {
        let domain = Domain::new(0.0, 200.0).unwrap();
        let ticks = ticks(50.0, 0.0, PI, &three_segments(), &domain);
        let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 120.0, 160.0, 200.0]);
    }

    #[test]
    fn tick_endpoints_sit_on_radius() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        let segments = vec![SegmentRange::new(0.0, 1.0, "x")];
        let ticks = ticks(50.0, -FRAC_PI_2, FRAC_PI_2, &segments, &domain);
        assert_eq!(ticks.len(), 2);

        let first = ticks[0];
        assert!(first.x1.abs() < 1e-9 && (first.y1 + 50.0).abs() < 1e-9);
        assert!(first.x2.abs() < 1e-9 && (first.y2 + 50.0 - TICK_LENGTH).abs() < 1e-9);
    }

    #[test]
    fn label_anchor_follows_side() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        let segments = vec![SegmentRange::new(0.0, 0.5, "a"), SegmentRange::new(0.5, 1.0, "b")];
        // left, top, right
        let labels = label_points(40.0, PI, 2.0 * PI, &segments, &domain);
        let anchors: Vec<_> = labels.iter().map(|l| l.anchor).collect();
        assert_eq!(anchors, [TextAnchor::End, TextAnchor::Middle, TextAnchor::Start]);
        assert!((labels[1].position.y + 40.0 + LABEL_OFFSET).abs() < 1e-9);
    }
}
