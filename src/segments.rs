// ============================================================================
// THRESHOLD SEGMENTS
// ============================================================================
//
// Threshold lists to coloured `[0, 1]` segments, and colour lookup.

use log::debug;
use serde::Deserialize;

use crate::angle::Domain;

/// Colour of the single segment built from an empty threshold list.
pub const DEFAULT_SEGMENT_COLOR: &str = "lightgray";

/// Colour returned by [`color_at`] when no segment matches.
pub const NEUTRAL_COLOR: &str = "gray";

/// A domain value at which a colour band ends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub color: String,
}

impl Threshold {
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }
}

/// A coloured, half-open slice of the normalized range.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRange {
    pub start: f64,
    pub end: f64,
    pub color: String,
}

impl SegmentRange {
    pub fn new(start: f64, end: f64, color: impl Into<String>) -> Self {
        Self {
            start,
            end,
            color: color.into(),
        }
    }

    pub fn contains(&self, fraction: f64) -> bool {
        fraction >= self.start && fraction <= self.end
    }
}

/// Bands at 60%, 80% and 100% of `max`.
pub fn default_thresholds(max: f64) -> Vec<Threshold> {
    vec![
        Threshold::new(max * 0.6, "limegreen"),
        Threshold::new(max * 0.8, "orange"),
        Threshold::new(max, "tomato"),
    ]
}

/// A single neutral band ending at `max`.
pub fn default_reference_thresholds(max: f64) -> Vec<Threshold> {
    vec![Threshold::new(max, DEFAULT_SEGMENT_COLOR)]
}

/// Builds sorted, contiguous segments covering `[0, 1]` from `thresholds`.
///
/// Thresholds are sorted by value (stable). A threshold whose normalized
/// value does not move past the running cursor is absorbed. Whatever is
/// left after the last emitted boundary is painted with the colour of the
/// highest threshold, absorbed or not. NaN thresholds are skipped.
pub fn build_segments(thresholds: &[Threshold], domain: &Domain) -> Vec<SegmentRange> {
    let mut sorted: Vec<&Threshold> = thresholds
        .iter()
        .filter(|threshold| {
            let keep = !threshold.value.is_nan();
            if !keep {
                debug!("skipping NaN threshold ({})", threshold.color);
            }
            keep
        })
        .collect();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    let Some(last) = sorted.last().copied() else {
        return vec![SegmentRange::new(0.0, 1.0, DEFAULT_SEGMENT_COLOR)];
    };

    let mut segments = Vec::with_capacity(sorted.len() + 1);
    let mut cursor = 0.0;
    for threshold in sorted {
        let t = domain.normalize(threshold.value);
        if t > cursor {
            segments.push(SegmentRange::new(cursor, t, threshold.color.as_str()));
            cursor = t;
        } else {
            debug!(
                "threshold {} ({}) absorbed at {cursor}",
                threshold.value, threshold.color
            );
        }
    }

    if cursor < 1.0 {
        segments.push(SegmentRange::new(cursor, 1.0, last.color.as_str()));
    }

    segments
}

/// Colour of the first segment containing `fraction` (inclusive on both
/// ends, so shared boundaries resolve to the lower segment).
pub fn color_at(fraction: f64, segments: &[SegmentRange]) -> &str {
    segments
        .iter()
        .find(|segment| segment.contains(fraction))
        .map_or(NEUTRAL_COLOR, |segment| segment.color.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn domain() -> Domain {
        Domain::new(0.0, 100.0).unwrap()
    }

    fn assert_partition(segments: &[SegmentRange]) {
        assert!(!segments.is_empty());
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[segments.len() - 1].end, 1.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for segment in segments {
            assert!(segment.end > segment.start, "zero-width segment {segment:?}");
        }
    }

    #[test]
    fn nan_thresholds_are_skipped() {
        let thresholds = vec![
            Threshold::new(50.0, "a"),
            Threshold::new(f64::NAN, "nan"),
        ];
        assert_eq!(
            build_segments(&thresholds, &domain()),
            vec![
                SegmentRange::new(0.0, 0.5, "a"),
                SegmentRange::new(0.5, 1.0, "a"),
            ]
        );

        let only_nan = vec![Threshold::new(f64::NAN, "nan")];
        assert_eq!(
            build_segments(&only_nan, &domain()),
            vec![SegmentRange::new(0.0, 1.0, DEFAULT_SEGMENT_COLOR)]
        );
    }

    #[test]
    fn three_bands() {
        let thresholds = default_thresholds(100.0);
        let segments = build_segments(&thresholds, &domain());
        assert_eq!(
            segments,
            vec![
                SegmentRange::new(0.0, 0.6, "limegreen"),
                SegmentRange::new(0.6, 0.8, "orange"),
                SegmentRange::new(0.8, 1.0, "tomato"),
            ]
        );
    }

    #[test]
    fn empty_thresholds_fall_back() {
        assert_eq!(
            build_segments(&[], &domain()),
            vec![SegmentRange::new(0.0, 1.0, DEFAULT_SEGMENT_COLOR)]
        );
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let thresholds = vec![
            Threshold::new(100.0, "tomato"),
            Threshold::new(60.0, "limegreen"),
            Threshold::new(80.0, "orange"),
        ];
        let segments = build_segments(&thresholds, &domain());
        let colors: Vec<_> = segments.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, ["limegreen", "orange", "tomato"]);
    }

    #[test]
    fn duplicate_threshold_is_absorbed() {
        let thresholds = vec![Threshold::new(50.0, "a"), Threshold::new(50.0, "b")];
        let segments = build_segments(&thresholds, &domain());
        assert_eq!(
            segments,
            vec![SegmentRange::new(0.0, 0.5, "a"), SegmentRange::new(0.5, 1.0, "b")]
        );
    }

    #[test]
    fn out_of_domain_thresholds_collapse() {
        let below = vec![Threshold::new(-10.0, "blue")];
        assert_eq!(
            build_segments(&below, &domain()),
            vec![SegmentRange::new(0.0, 1.0, "blue")]
        );

        let above = vec![Threshold::new(40.0, "green"), Threshold::new(250.0, "red")];
        assert_eq!(
            build_segments(&above, &domain()),
            vec![SegmentRange::new(0.0, 0.4, "green"), SegmentRange::new(0.4, 1.0, "red")]
        );
    }

    #[test]
    fn segments_always_partition_unit_range() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let count = rng.random_range(0..8);
            let thresholds: Vec<_> = (0..count)
                .map(|i| Threshold::new(rng.random_range(-30.0..130.0_f64).round(), format!("c{i}")))
                .collect();
            assert_partition(&build_segments(&thresholds, &domain()));
        }
    }

    #[test]
    fn build_is_idempotent() {
        let thresholds = vec![Threshold::new(30.0, "x"), Threshold::new(70.0, "y")];
        assert_eq!(
            build_segments(&thresholds, &domain()),
            build_segments(&thresholds, &domain())
        );
    }

    #[test]
    fn color_at_ends_and_boundaries() {
        let segments = build_segments(&default_thresholds(100.0), &domain());
        assert_eq!(color_at(0.0, &segments), "limegreen");
        assert_eq!(color_at(1.0, &segments), "tomato");
        assert_eq!(color_at(0.6, &segments), "limegreen");
        assert_eq!(color_at(0.7, &segments), "orange");
        assert_eq!(color_at(0.8, &segments), "orange");
    }

    #[test]
    fn color_at_without_match_is_neutral() {
        assert_eq!(color_at(0.5, &[]), NEUTRAL_COLOR);
        let partial = [SegmentRange::new(0.0, 0.2, "red")];
        assert_eq!(color_at(0.9, &partial), NEUTRAL_COLOR);
    }
}
