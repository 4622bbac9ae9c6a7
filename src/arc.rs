// ============================================================================
// ARC PATHS
// ============================================================================
//
// Ring-sector path geometry.
//
// Angles here are internal radians (see `crate::angle`). Coordinates are
// relative to the gauge centre with y growing downwards.

use std::f64::consts::{PI, TAU};

use crate::angle::sweep_angle;
use crate::segments::SegmentRange;

const FULL_TURN_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn polar(radius: f64, angle: f64) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One step of a path, all coordinates absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc of `radius` to `to`. `sweep` is true for increasing angles.
    Arc {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

/// An annular wedge between two radii and two angles, square corners.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorPath {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    commands: Vec<PathCommand>,
}

impl SectorPath {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// True for zero-sweep sectors, which draw nothing.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn is_full_turn(&self) -> bool {
        self.sweep().abs() >= TAU - FULL_TURN_TOLERANCE
    }

    /// Whether `point` lies inside the filled sector.
    pub fn contains(&self, point: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        let r = point.x.hypot(point.y);
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        self.covers_angle(point.y.atan2(point.x))
    }

    /// Whether the angular extent of the sector covers `angle`.
    pub fn covers_angle(&self, angle: f64) -> bool {
        if self.is_full_turn() {
            return true;
        }
        let low = self.start_angle.min(self.end_angle);
        (angle - low).rem_euclid(TAU) <= self.sweep().abs()
    }
}

/// A sector together with its fill colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredPath {
    pub path: SectorPath,
    pub color: String,
}

/// Builds the ring sector between `inner_radius` and `outer_radius` swept
/// from `start_angle` to `end_angle`.
///
/// A zero sweep yields an empty path. A sweep of a full turn or more is
/// emitted as a complete annulus: two half-arcs for the outer edge and a
/// second, reversed subpath for the inner edge. An inner radius of zero
/// closes the wedge through the centre.
pub fn arc_path(
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> SectorPath {
    let mut path = SectorPath {
        inner_radius,
        outer_radius,
        start_angle,
        end_angle,
        commands: Vec::new(),
    };

    let sweep = end_angle - start_angle;
    if sweep == 0.0 || !sweep.is_finite() {
        return path;
    }

    let clockwise = sweep > 0.0;
    let commands = &mut path.commands;

    if sweep.abs() >= TAU - FULL_TURN_TOLERANCE {
        let half = start_angle + PI * sweep.signum();
        commands.push(PathCommand::MoveTo(Point::polar(outer_radius, start_angle)));
        for angle in [half, start_angle] {
            commands.push(PathCommand::Arc {
                radius: outer_radius,
                large_arc: false,
                sweep: clockwise,
                to: Point::polar(outer_radius, angle),
            });
        }
        commands.push(PathCommand::Close);

        if inner_radius > 0.0 {
            commands.push(PathCommand::MoveTo(Point::polar(inner_radius, start_angle)));
            for angle in [half, start_angle] {
                commands.push(PathCommand::Arc {
                    radius: inner_radius,
                    large_arc: false,
                    sweep: !clockwise,
                    to: Point::polar(inner_radius, angle),
                });
            }
            commands.push(PathCommand::Close);
        }
        return path;
    }

    let large_arc = sweep.abs() > PI;
    commands.push(PathCommand::MoveTo(Point::polar(outer_radius, start_angle)));
    commands.push(PathCommand::Arc {
        radius: outer_radius,
        large_arc,
        sweep: clockwise,
        to: Point::polar(outer_radius, end_angle),
    });
    if inner_radius > 0.0 {
        commands.push(PathCommand::LineTo(Point::polar(inner_radius, end_angle)));
        commands.push(PathCommand::Arc {
            radius: inner_radius,
            large_arc,
            sweep: !clockwise,
            to: Point::polar(inner_radius, start_angle),
        });
    } else {
        commands.push(PathCommand::LineTo(Point::new(0.0, 0.0)));
    }
    commands.push(PathCommand::Close);

    path
}

/// One sector per segment, each remapped from its `[0, 1]` slice onto the
/// sweep. Output order follows `segments`.
pub fn segmented_arc_path(
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
    end_angle: f64,
    segments: &[SegmentRange],
) -> Vec<ColoredPath> {
    segments
        .iter()
        .map(|segment| ColoredPath {
            path: arc_path(
                inner_radius,
                outer_radius,
                sweep_angle(start_angle, end_angle, segment.start),
                sweep_angle(start_angle, end_angle, segment.end),
            ),
            color: segment.color.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn move_count(path: &SectorPath) -> usize {
        path.commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    #[test]
    fn zero_sweep_is_empty() {
        let path = arc_path(40.0, 50.0, 1.0, 1.0);
        assert!(path.is_empty());
        assert!(!path.contains(Point::polar(45.0, 1.0)));
    }

    #[test]
    fn quarter_sector_layout() {
        let path = arc_path(40.0, 50.0, -FRAC_PI_2, 0.0);
        let commands = path.commands();
        assert_eq!(commands.len(), 5);
        match commands[0] {
            PathCommand::MoveTo(p) => {
                assert!(p.x.abs() < EPS && (p.y + 50.0).abs() < EPS);
            }
            other => panic!("unexpected {other:?}"),
        }
        match commands[1] {
            PathCommand::Arc {
                radius,
                large_arc,
                sweep,
                to,
            } => {
                assert_eq!(radius, 50.0);
                assert!(!large_arc);
                assert!(sweep);
                assert!((to.x - 50.0).abs() < EPS && to.y.abs() < EPS);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(commands[3], PathCommand::Arc { sweep: false, .. }));
        assert_eq!(commands[4], PathCommand::Close);
    }

    #[test]
    fn large_sweep_sets_large_arc_flag() {
        let path = arc_path(10.0, 20.0, 0.0, 3.0 * FRAC_PI_2);
        assert!(matches!(path.commands()[1], PathCommand::Arc { large_arc: true, .. }));
    }

    #[test]
    fn reversed_sweep_flips_direction() {
        let path = arc_path(10.0, 20.0, 0.0, -1.0);
        assert!(matches!(path.commands()[1], PathCommand::Arc { sweep: false, .. }));
        assert!(path.contains(Point::polar(15.0, -0.5)));
        assert!(!path.contains(Point::polar(15.0, 0.5)));
    }

    #[test]
    fn full_turn_is_two_subpaths() {
        let path = arc_path(30.0, 40.0, -FRAC_PI_2, 3.0 * FRAC_PI_2);
        assert!(path.is_full_turn());
        assert_eq!(move_count(&path), 2);
        assert!(path.contains(Point::polar(35.0, 2.0)));
        assert!(!path.contains(Point::polar(20.0, 2.0)));

        let disc = arc_path(0.0, 40.0, 0.0, TAU);
        assert_eq!(move_count(&disc), 1);
    }

    #[test]
    fn pie_slice_closes_through_center() {
        let path = arc_path(0.0, 10.0, 0.0, 1.0);
        assert_eq!(path.commands()[2], PathCommand::LineTo(Point::new(0.0, 0.0)));
    }

    #[test]
    fn zero_width_ring_is_degenerate_but_not_empty() {
        let path = arc_path(25.0, 25.0, 0.0, 1.0);
        assert!(!path.is_empty());
        assert_eq!(path.commands().len(), 5);
    }

    #[test]
    fn segments_remap_onto_sweep() {
        let segments = vec![
            SegmentRange::new(0.0, 0.25, "a"),
            SegmentRange::new(0.25, 1.0, "b"),
        ];
        let paths = segmented_arc_path(5.0, 10.0, 0.0, 2.0, &segments);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].color, "a");
        assert!((paths[0].path.end_angle - 0.5).abs() < EPS);
        assert_eq!(paths[0].path.end_angle, paths[1].path.start_angle);
        assert!((paths[1].path.end_angle - 2.0).abs() < EPS);
    }
}
