use std::time::{Duration, Instant};

use radial_gauge::{
    build_segments, color_at, compose, project_value, props_from_str, to_internal_angle,
    AnimationDriver, Domain, FrameHandle, FrameHost, GaugeConfig, GaugeError, GaugeProps,
    Indicator, SegmentRange, Threshold, Tween,
};

#[derive(Default)]
struct Frames {
    requested: usize,
}

impl FrameHost for Frames {
    fn request_frame(&mut self) -> FrameHandle {
        self.requested += 1;
        FrameHandle(self.requested as u64)
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

fn domain() -> Domain {
    Domain::new(0.0, 100.0).unwrap()
}

#[test]
fn traffic_light_thresholds() {
    let thresholds = vec![
        Threshold::new(60.0, "limegreen"),
        Threshold::new(80.0, "orange"),
        Threshold::new(100.0, "tomato"),
    ];
    assert_eq!(
        build_segments(&thresholds, &domain()),
        vec![
            SegmentRange::new(0.0, 0.6, "limegreen"),
            SegmentRange::new(0.6, 0.8, "orange"),
            SegmentRange::new(0.8, 1.0, "tomato"),
        ]
    );
}

#[test]
fn empty_thresholds_give_one_fallback_segment() {
    let segments = build_segments(&[], &domain());
    assert_eq!(segments.len(), 1);
    assert_eq!((segments[0].start, segments[0].end), (0.0, 1.0));
}

#[test]
fn duplicate_thresholds_share_one_boundary() {
    let thresholds = vec![Threshold::new(50.0, "a"), Threshold::new(50.0, "b")];
    let segments = build_segments(&thresholds, &domain());
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].end, 0.5);
    assert_eq!(segments[1], SegmentRange::new(0.5, 1.0, "b"));
}

#[test]
fn quarter_value_projection() {
    let angle = project_value(25.0, 0.0, 100.0, -40.0, 220.0).unwrap();
    assert!((angle - to_internal_angle(25.0)).abs() < 1e-9);
}

#[test]
fn color_ends_match_segment_ends() {
    for thresholds in [
        vec![],
        vec![Threshold::new(10.0, "x")],
        vec![Threshold::new(30.0, "x"), Threshold::new(60.0, "y"), Threshold::new(90.0, "z")],
    ] {
        let segments = build_segments(&thresholds, &domain());
        assert_eq!(color_at(0.0, &segments), segments[0].color);
        assert_eq!(color_at(1.0, &segments), segments[segments.len() - 1].color);
    }
}

#[test]
fn tween_without_duration_schedules_nothing() {
    let mut driver = AnimationDriver::new(
        Tween::new(0.0, Duration::ZERO, radial_gauge::ease_out_quad),
        Frames::default(),
    );
    driver.set_value(64.0, Instant::now());
    assert_eq!(driver.displayed(), 64.0);
    assert_eq!(driver.host().requested, 0);
}

#[test]
fn tween_lands_exactly_after_duration() {
    let t0 = Instant::now();
    let mut tween = Tween::new(0.1, Duration::from_millis(250), radial_gauge::ease_out_quad);
    tween.retarget(0.7, t0);
    assert_eq!(tween.advance(t0 + Duration::from_millis(251)), 0.7);
}

#[test]
fn gauge_file_to_svg() {
    let props = props_from_str(
        r#"
        value = 72
        max = 100
        unit = "%"
        show_threshold_ticks = true
        show_threshold_labels = true
        indicator_type = "triangle"
        indicator_color = "black"
        "#,
    )
    .unwrap();
    let config = GaugeConfig::resolve(&props).unwrap();
    let geometry = compose(&config, props.value);
    assert!(matches!(geometry.indicator, Indicator::Triangle { .. }));
    assert_eq!(geometry.value_arc.color, "orange");

    let svg = geometry.to_svg();
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"140\" height=\"140\""));
    assert!(svg.contains("<g transform=\"translate(70,80)\">"));
    // reference ring, value arc and three threshold bands plus the triangle
    assert_eq!(svg.matches("<path ").count(), 6);
    // four ticks
    assert_eq!(svg.matches("<line ").count(), 4);
    assert!(svg.contains(">72</text>"));
    assert!(svg.contains(">%</text>"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn empty_value_arc_is_omitted_from_svg() {
    let props = GaugeProps::builder().value(0.0).max(10.0).build();
    let config = GaugeConfig::resolve(&props).unwrap();
    let svg = compose(&config, 0.0).to_svg();
    // reference ring and three threshold bands only
    assert_eq!(svg.matches("<path ").count(), 4);
    assert_eq!(svg.matches("<line ").count(), 1);
}

#[test]
fn thresholds_that_are_not_a_list_are_rejected() {
    let err = props_from_str("value = 1\nmax = 10\nthresholds = { value = 5, color = \"red\" }\n")
        .unwrap_err();
    assert!(matches!(err, GaugeError::InvalidInput(_)));
}
