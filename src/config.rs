// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================
//
// Configuration resolves in two phases. `GaugeProps` is what callers (or a
// gauge file) supply; anything whose default depends on another option stays
// `None` there. `GaugeConfig::resolve` then fills those defaults from the
// resolved values and validates the result.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use serde::Deserialize;

use crate::angle::{AngleRange, Domain};
use crate::error::{GaugeError, Result};
use crate::segments::{default_reference_thresholds, default_thresholds, Threshold};
use crate::tween::{ease_out_quad, linear, EasingFn, DEFAULT_TRANSITION};

// ============================================================================
// STYLE BUNDLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: String,
    pub font_weight: Option<String>,
}

impl TextStyle {
    pub fn center() -> Self {
        Self {
            font_size: 24.0,
            color: "#333333".to_string(),
            font_weight: Some("bold".to_string()),
        }
    }

    pub fn unit() -> Self {
        Self {
            font_size: 12.0,
            color: "#666666".to_string(),
            font_weight: None,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            color: "#666666".to_string(),
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            stroke: "#666666".to_string(),
            stroke_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorType {
    #[default]
    Line,
    Triangle,
}

/// Turns a gauge value into display text.
#[derive(Clone)]
pub struct ValueFormat(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl ValueFormat {
    pub fn new(format: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(format))
    }

    /// Fixed number of decimal places.
    pub fn decimals(places: usize) -> Self {
        Self::new(move |value| format!("{value:.places$}"))
    }

    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::new(|value| value.to_string())
    }
}

impl fmt::Debug for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFormat(..)")
    }
}

// ============================================================================
// PROPS (PHASE ONE)
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct GaugeProps {
    pub value: f64,
    #[builder(default = 0.0)]
    pub min: f64,
    pub max: f64,
    #[builder(into, default = "".to_string())]
    pub unit: String,

    #[builder(default = 140.0)]
    pub width: f64,
    #[builder(default = 140.0)]
    pub height: f64,
    #[builder(default = -40.0)]
    pub start_angle: f64,
    #[builder(default = 220.0)]
    pub end_angle: f64,

    /// Defaults to bands at 60/80/100% of `max`.
    pub thresholds: Option<Vec<Threshold>>,
    /// Defaults to one neutral band ending at `max`.
    pub reference_thresholds: Option<Vec<Threshold>>,

    #[builder(default)]
    pub value_format: ValueFormat,
    #[builder(default = false)]
    pub show_threshold_ticks: bool,
    #[builder(default = false)]
    pub show_threshold_labels: bool,

    #[builder(default = DEFAULT_TRANSITION)]
    pub transition_duration: Duration,
    #[builder(default = ease_out_quad as EasingFn)]
    pub easing_fn: EasingFn,

    // Ring geometry
    #[builder(default = 10.0)]
    pub vertical_offset: f64,
    #[builder(default = 4.0)]
    pub outer_ring_width: f64,
    #[builder(default = 3.0)]
    pub outer_ring_gap: f64,
    #[builder(default = 12.0)]
    pub reference_ring_width: f64,

    // Indicator
    #[builder(default = 16.0)]
    pub indicator_length: f64,
    #[builder(into, default = "#333333".to_string())]
    pub indicator_color: String,
    #[builder(default)]
    pub indicator_type: IndicatorType,

    // Style pass-through
    #[builder(default = TextStyle::center())]
    pub center_text_style: TextStyle,
    #[builder(default = TextStyle::unit())]
    pub unit_text_style: TextStyle,
    #[builder(default)]
    pub tick_style: LineStyle,
    #[builder(default)]
    pub threshold_label_style: TextStyle,
}

// ============================================================================
// RESOLVED CONFIGURATION (PHASE TWO)
// ============================================================================

#[derive(Debug, Clone)]
pub struct GaugeConfig {
    pub domain: Domain,
    pub sweep: AngleRange,
    pub unit: String,
    pub width: f64,
    pub height: f64,
    pub thresholds: Vec<Threshold>,
    pub reference_thresholds: Vec<Threshold>,
    pub value_format: ValueFormat,
    pub show_threshold_ticks: bool,
    pub show_threshold_labels: bool,
    pub transition_duration: Duration,
    pub easing_fn: EasingFn,
    pub vertical_offset: f64,
    pub outer_ring_width: f64,
    pub outer_ring_gap: f64,
    pub reference_ring_width: f64,
    pub indicator_length: f64,
    pub indicator_color: String,
    pub indicator_type: IndicatorType,
    pub center_text_style: TextStyle,
    pub unit_text_style: TextStyle,
    pub tick_style: LineStyle,
    pub threshold_label_style: TextStyle,
}

impl GaugeConfig {
    pub fn resolve(props: &GaugeProps) -> Result<Self> {
        let domain = Domain::new(props.min, props.max)?;

        for (name, value) in [
            ("width", props.width),
            ("height", props.height),
            ("outer_ring_width", props.outer_ring_width),
            ("outer_ring_gap", props.outer_ring_gap),
            ("reference_ring_width", props.reference_ring_width),
            ("indicator_length", props.indicator_length),
        ] {
            require_non_negative(name, value)?;
        }
        for (name, value) in [
            ("start_angle", props.start_angle),
            ("end_angle", props.end_angle),
            ("vertical_offset", props.vertical_offset),
        ] {
            if !value.is_finite() {
                return Err(GaugeError::InvalidInput(format!("{name} must be finite")));
            }
        }

        let thresholds = props
            .thresholds
            .clone()
            .unwrap_or_else(|| default_thresholds(domain.max()));
        let reference_thresholds = props
            .reference_thresholds
            .clone()
            .unwrap_or_else(|| default_reference_thresholds(domain.max()));

        Ok(Self {
            domain,
            sweep: AngleRange::new(props.start_angle, props.end_angle),
            unit: props.unit.clone(),
            width: props.width,
            height: props.height,
            thresholds,
            reference_thresholds,
            value_format: props.value_format.clone(),
            show_threshold_ticks: props.show_threshold_ticks,
            show_threshold_labels: props.show_threshold_labels,
            transition_duration: props.transition_duration,
            easing_fn: props.easing_fn,
            vertical_offset: props.vertical_offset,
            outer_ring_width: props.outer_ring_width,
            outer_ring_gap: props.outer_ring_gap,
            reference_ring_width: props.reference_ring_width,
            indicator_length: props.indicator_length,
            indicator_color: props.indicator_color.clone(),
            indicator_type: props.indicator_type,
            center_text_style: props.center_text_style.clone(),
            unit_text_style: props.unit_text_style.clone(),
            tick_style: props.tick_style.clone(),
            threshold_label_style: props.threshold_label_style.clone(),
        })
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GaugeError::InvalidInput(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

// ============================================================================
// GAUGE FILES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GaugeFile {
    value: f64,
    min: Option<f64>,
    max: f64,
    unit: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    start_angle: Option<f64>,
    end_angle: Option<f64>,
    thresholds: Option<toml::Value>,
    reference_thresholds: Option<toml::Value>,
    value_decimals: Option<usize>,
    show_threshold_ticks: Option<bool>,
    show_threshold_labels: Option<bool>,
    transition_duration_ms: Option<u64>,
    easing: Option<String>,
    vertical_offset: Option<f64>,
    outer_ring_width: Option<f64>,
    outer_ring_gap: Option<f64>,
    reference_ring_width: Option<f64>,
    indicator_length: Option<f64>,
    indicator_color: Option<String>,
    indicator_type: Option<IndicatorType>,
    center_text_style: Option<TextStyle>,
    unit_text_style: Option<TextStyle>,
    tick_style: Option<LineStyle>,
    threshold_label_style: Option<TextStyle>,
}

/// Reads a threshold list out of a raw TOML value.
///
/// Anything other than an array of `{ value, color }` tables is rejected.
pub fn thresholds_from_value(value: &toml::Value) -> Result<Vec<Threshold>> {
    let Some(items) = value.as_array() else {
        return Err(GaugeError::InvalidInput(format!(
            "thresholds must be a list, got {}",
            value.type_str()
        )));
    };

    items
        .iter()
        .map(|item| {
            item.clone()
                .try_into::<Threshold>()
                .map_err(|e| GaugeError::InvalidInput(format!("bad threshold {item}: {e}")))
        })
        .collect()
}

fn easing_by_name(name: &str) -> Result<EasingFn> {
    match name {
        "linear" => Ok(linear),
        "ease-out-quad" => Ok(ease_out_quad),
        other => Err(GaugeError::InvalidInput(format!("unknown easing {other:?}"))),
    }
}

/// Parses a TOML gauge description.
pub fn props_from_str(text: &str) -> Result<GaugeProps> {
    let file: GaugeFile = toml::from_str(text)?;

    let thresholds = file.thresholds.as_ref().map(thresholds_from_value).transpose()?;
    let reference_thresholds = file
        .reference_thresholds
        .as_ref()
        .map(thresholds_from_value)
        .transpose()?;
    let easing_fn = file.easing.as_deref().map(easing_by_name).transpose()?;

    Ok(GaugeProps::builder()
        .value(file.value)
        .max(file.max)
        .maybe_min(file.min)
        .maybe_unit(file.unit)
        .maybe_width(file.width)
        .maybe_height(file.height)
        .maybe_start_angle(file.start_angle)
        .maybe_end_angle(file.end_angle)
        .maybe_thresholds(thresholds)
        .maybe_reference_thresholds(reference_thresholds)
        .maybe_value_format(file.value_decimals.map(ValueFormat::decimals))
        .maybe_show_threshold_ticks(file.show_threshold_ticks)
        .maybe_show_threshold_labels(file.show_threshold_labels)
        .maybe_transition_duration(file.transition_duration_ms.map(Duration::from_millis))
        .maybe_easing_fn(easing_fn)
        .maybe_vertical_offset(file.vertical_offset)
        .maybe_outer_ring_width(file.outer_ring_width)
        .maybe_outer_ring_gap(file.outer_ring_gap)
        .maybe_reference_ring_width(file.reference_ring_width)
        .maybe_indicator_length(file.indicator_length)
        .maybe_indicator_color(file.indicator_color)
        .maybe_indicator_type(file.indicator_type)
        .maybe_center_text_style(file.center_text_style)
        .maybe_unit_text_style(file.unit_text_style)
        .maybe_tick_style(file.tick_style)
        .maybe_threshold_label_style(file.threshold_label_style)
        .build())
}

pub fn load_props(path: impl AsRef<Path>) -> Result<GaugeProps> {
    let text = std::fs::read_to_string(path)?;
    props_from_str(&text)
}
