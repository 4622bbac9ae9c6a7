// ============================================================================
// GAUGE COMPOSITION
// ============================================================================

use std::time::Instant;

use crate::arc::{arc_path, segmented_arc_path, ColoredPath, Point};
use crate::config::{GaugeConfig, GaugeProps, IndicatorType, LineStyle, TextStyle};
use crate::error::Result;
use crate::segments::{build_segments, color_at};
use crate::ticks::{label_points, ticks, TextAnchor, TickPoint, LABEL_OFFSET};
use crate::tween::{AnimationDriver, FrameHandle, FrameHost, Tween};

/// Stroke width of the line indicator.
pub const INDICATOR_LINE_WIDTH: f64 = 2.0;

/// Triangle base width relative to its length.
const TRIANGLE_BASE_RATIO: f64 = 0.75;

/// Gap between the centre value text and the unit text.
const UNIT_TEXT_GAP: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Indicator {
    /// Radial line, `from` on the outer edge of the gauge.
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    /// Filled marker outside the rings, first point is the tip.
    Triangle { points: [Point; 3], color: String },
}

impl Indicator {
    pub fn color(&self) -> &str {
        match self {
            Indicator::Line { color, .. } | Indicator::Triangle { color, .. } => color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub position: Point,
    pub text: String,
    pub anchor: TextAnchor,
    pub style: TextStyle,
}

/// Radii of every ring, outermost first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub outer_radius: f64,
    pub outer_ring_inner: f64,
    pub reference_outer: f64,
    pub reference_inner: f64,
}

impl RingLayout {
    pub fn from_config(config: &GaugeConfig) -> Self {
        let half_size = config.width.min(config.height) / 2.0;

        let mut padding = 0.0;
        if config.indicator_type == IndicatorType::Triangle {
            padding = config.indicator_length;
        }
        if config.show_threshold_labels {
            padding = f64::max(
                padding,
                LABEL_OFFSET + config.threshold_label_style.font_size,
            );
        }

        let outer_radius = (half_size - padding).max(0.0);
        let outer_ring_inner = (outer_radius - config.outer_ring_width).max(0.0);
        let reference_outer = (outer_ring_inner - config.outer_ring_gap).max(0.0);
        let reference_inner = (reference_outer - config.reference_ring_width).max(0.0);

        Self {
            outer_radius,
            outer_ring_inner,
            reference_outer,
            reference_inner,
        }
    }
}

/// Everything needed to draw one frame of a gauge. Coordinates are relative
/// to `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeGeometry {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub layout: RingLayout,
    pub reference_ring: Vec<ColoredPath>,
    pub value_arc: ColoredPath,
    pub outer_ring: Vec<ColoredPath>,
    pub ticks: Vec<TickPoint>,
    pub tick_style: LineStyle,
    pub labels: Vec<TextLabel>,
    pub indicator: Indicator,
    pub value_text: TextLabel,
    pub unit_text: Option<TextLabel>,
}

/// Builds the geometry for `config` showing `value`.
pub fn compose(config: &GaugeConfig, value: f64) -> GaugeGeometry {
    let layout = RingLayout::from_config(config);
    let start = config.sweep.start_radians();
    let end = config.sweep.end_radians();

    let fraction = config.domain.normalize(value);
    let value_angle = config.sweep.at(fraction);

    let segments = build_segments(&config.thresholds, &config.domain);
    let reference_segments = build_segments(&config.reference_thresholds, &config.domain);

    let outer_ring = segmented_arc_path(
        layout.outer_ring_inner,
        layout.outer_radius,
        start,
        end,
        &segments,
    );
    let reference_ring = segmented_arc_path(
        layout.reference_inner,
        layout.reference_outer,
        start,
        end,
        &reference_segments,
    );
    let value_arc = ColoredPath {
        path: arc_path(layout.reference_inner, layout.reference_outer, start, value_angle),
        color: color_at(fraction, &segments).to_string(),
    };

    let ticks = if config.show_threshold_ticks {
        ticks(layout.outer_radius, start, end, &segments, &config.domain)
    } else {
        Vec::new()
    };

    let labels = if config.show_threshold_labels {
        label_points(layout.outer_radius, start, end, &segments, &config.domain)
            .into_iter()
            .map(|label| TextLabel {
                position: label.position,
                text: config.value_format.format(label.value),
                anchor: label.anchor,
                style: config.threshold_label_style.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let value_text = TextLabel {
        position: Point::new(0.0, 0.0),
        text: config.value_format.format(value),
        anchor: TextAnchor::Middle,
        style: config.center_text_style.clone(),
    };
    let unit_text = (!config.unit.is_empty()).then(|| TextLabel {
        position: Point::new(
            0.0,
            config.center_text_style.font_size / 2.0
                + UNIT_TEXT_GAP
                + config.unit_text_style.font_size / 2.0,
        ),
        text: config.unit.clone(),
        anchor: TextAnchor::Middle,
        style: config.unit_text_style.clone(),
    });

    GaugeGeometry {
        width: config.width,
        height: config.height,
        center: Point::new(
            config.width / 2.0,
            config.height / 2.0 + config.vertical_offset,
        ),
        layout,
        reference_ring,
        value_arc,
        outer_ring,
        ticks,
        tick_style: config.tick_style.clone(),
        labels,
        indicator: indicator(config, &layout, value_angle),
        value_text,
        unit_text,
    }
}

fn indicator(config: &GaugeConfig, layout: &RingLayout, angle: f64) -> Indicator {
    let color = config.indicator_color.clone();
    let length = config.indicator_length;

    match config.indicator_type {
        IndicatorType::Line => Indicator::Line {
            from: Point::polar(layout.outer_radius, angle),
            to: Point::polar((layout.outer_radius - length).max(0.0), angle),
            color,
            width: INDICATOR_LINE_WIDTH,
        },
        IndicatorType::Triangle => {
            let base_radius = layout.outer_radius + length;
            let half_spread = if base_radius > 0.0 {
                (length * TRIANGLE_BASE_RATIO / 2.0) / base_radius
            } else {
                0.0
            };
            Indicator::Triangle {
                points: [
                    Point::polar(layout.outer_radius, angle),
                    Point::polar(base_radius, angle - half_spread),
                    Point::polar(base_radius, angle + half_spread),
                ],
                color,
            }
        }
    }
}

// ============================================================================
// GAUGE INSTANCE
// ============================================================================

/// A gauge with its own animation state.
///
/// Each instance owns its tween exclusively; dropping the gauge cancels any
/// frame it still has outstanding with the host.
pub struct Gauge<H: FrameHost> {
    props: GaugeProps,
    config: GaugeConfig,
    driver: AnimationDriver<H>,
}

impl<H: FrameHost> Gauge<H> {
    /// Starts empty at the domain minimum and animates to `props.value`.
    pub fn new(props: GaugeProps, host: H, now: Instant) -> Result<Self> {
        let config = GaugeConfig::resolve(&props)?;
        let tween = Tween::new(
            config.domain.min(),
            config.transition_duration,
            config.easing_fn,
        );
        let mut driver = AnimationDriver::new(tween, host);
        driver.set_value(props.value, now);

        Ok(Self {
            props,
            config,
            driver,
        })
    }

    pub fn props(&self) -> &GaugeProps {
        &self.props
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn driver(&self) -> &AnimationDriver<H> {
        &self.driver
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.driver.host_mut()
    }

    pub fn displayed_value(&self) -> f64 {
        self.driver.displayed()
    }

    pub fn is_animating(&self) -> bool {
        self.driver.tween().is_running()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.driver.pending()
    }

    pub fn set_value(&mut self, value: f64, now: Instant) {
        self.props.value = value;
        self.driver.set_value(value, now);
    }

    /// Replaces the whole configuration. On error the old one stays active.
    pub fn set_props(&mut self, props: GaugeProps, now: Instant) -> Result<()> {
        let config = GaugeConfig::resolve(&props)?;
        self.driver.set_duration(config.transition_duration);
        self.driver.set_easing(config.easing_fn);
        self.driver.set_value(props.value, now);
        self.props = props;
        self.config = config;
        Ok(())
    }

    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> Option<f64> {
        self.driver.on_frame(handle, now)
    }

    /// Geometry for the currently displayed value.
    pub fn geometry(&self) -> GaugeGeometry {
        compose(&self.config, self.driver.displayed())
    }
}
