// ============================================================================
// RASTER PREVIEW
// ============================================================================
//
// Rasterizes a `GaugeGeometry` into an RGBA frame for the window viewer.
// Everything is drawn immediately, anti-aliased, in paint order.

use log::debug;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::arc::{Point, SectorPath};
use crate::gauge::{GaugeGeometry, Indicator, TextLabel};
use crate::segments::NEUTRAL_COLOR;
use crate::ticks::TextAnchor;

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::new(0x00, 0x00, 0x00)),
    ("white", Color::new(0xff, 0xff, 0xff)),
    ("gray", Color::new(0x80, 0x80, 0x80)),
    ("grey", Color::new(0x80, 0x80, 0x80)),
    ("lightgray", Color::new(0xd3, 0xd3, 0xd3)),
    ("lightgrey", Color::new(0xd3, 0xd3, 0xd3)),
    ("darkgray", Color::new(0xa9, 0xa9, 0xa9)),
    ("gainsboro", Color::new(0xdc, 0xdc, 0xdc)),
    ("red", Color::new(0xff, 0x00, 0x00)),
    ("green", Color::new(0x00, 0x80, 0x00)),
    ("blue", Color::new(0x00, 0x00, 0xff)),
    ("limegreen", Color::new(0x32, 0xcd, 0x32)),
    ("orange", Color::new(0xff, 0xa5, 0x00)),
    ("tomato", Color::new(0xff, 0x63, 0x47)),
    ("gold", Color::new(0xff, 0xd7, 0x00)),
    ("yellow", Color::new(0xff, 0xff, 0x00)),
    ("steelblue", Color::new(0x46, 0x82, 0xb4)),
    ("crimson", Color::new(0xdc, 0x14, 0x3c)),
];

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#rgb`, `#rrggbb` or one of a handful of CSS colour names.
    pub fn parse_css(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            return match hex.len() {
                3 => Some(Self::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
                6 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?)),
                _ => None,
            };
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(text))
            .map(|(_, color)| *color)
    }

    /// Like [`Color::parse_css`], falling back to the neutral colour.
    pub fn resolve(text: &str) -> Self {
        Self::parse_css(text).unwrap_or_else(|| {
            debug!("unknown colour {text:?}, using {NEUTRAL_COLOR}");
            Self::new(0x80, 0x80, 0x80)
        })
    }
}

pub const BACKGROUND: Color = Color::new(0xff, 0xff, 0xff);

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// `frame` holds `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 3)?;
        Some(Color::new(px[0], px[1], px[2]))
    }

    /// Alpha-blends `color` over the pixel at `(x, y)`.
    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| (src as f64 * a + dst as f64 * (1.0 - a)).round() as u8;
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = 0xff;
    }
}

/// Maps gauge-local coordinates onto the canvas.
#[derive(Debug, Clone, Copy)]
struct Transform {
    origin: Point,
    scale: f64,
}

impl Transform {
    fn fit(canvas: &Canvas, geometry: &GaugeGeometry) -> Self {
        let scale = if geometry.width > 0.0 && geometry.height > 0.0 {
            (canvas.width as f64 / geometry.width).min(canvas.height as f64 / geometry.height)
        } else {
            1.0
        };
        Self {
            origin: Point::new(geometry.center.x * scale, geometry.center.y * scale),
            scale,
        }
    }

    fn apply(&self, p: Point) -> Point {
        Point::new(self.origin.x + p.x * self.scale, self.origin.y + p.y * self.scale)
    }

    /// Canvas pixel centre back to gauge-local coordinates.
    fn invert(&self, x: i64, y: i64) -> Point {
        Point::new(
            (x as f64 + 0.5 - self.origin.x) / self.scale,
            (y as f64 + 0.5 - self.origin.y) / self.scale,
        )
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn fill_sector(canvas: &mut Canvas, transform: &Transform, sector: &SectorPath, color: Color) {
    if sector.is_empty() {
        return;
    }
    let reach = sector.outer_radius * transform.scale + 1.0;
    let min_x = (transform.origin.x - reach).floor() as i64;
    let max_x = (transform.origin.x + reach).ceil() as i64;
    let min_y = (transform.origin.y - reach).floor() as i64;
    let max_y = (transform.origin.y + reach).ceil() as i64;
    // one canvas pixel, in gauge units
    let pixel = 1.0 / transform.scale;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = transform.invert(x, y);
            let dist = p.x.hypot(p.y);

            let radial_alpha = ((sector.outer_radius - dist) / pixel + 0.5).clamp(0.0, 1.0)
                * ((dist - sector.inner_radius) / pixel + 0.5).clamp(0.0, 1.0);
            if radial_alpha <= 0.0 {
                continue;
            }

            let angular_alpha = if sector.covers_angle(p.y.atan2(p.x)) {
                1.0
            } else {
                let angle = p.y.atan2(p.x);
                let edge_gap = [sector.start_angle, sector.end_angle]
                    .iter()
                    .map(|edge| angular_distance(angle, *edge))
                    .fold(f64::INFINITY, f64::min);
                (1.0 - edge_gap * dist / pixel).clamp(0.0, 1.0)
            };

            let alpha = radial_alpha * angular_alpha;
            if alpha > 0.01 {
                canvas.blend(x, y, color, alpha);
            }
        }
    }
}

fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(std::f64::consts::TAU);
    d.min(std::f64::consts::TAU - d)
}

fn draw_thick_line_aa(canvas: &mut Canvas, from: Point, to: Point, thickness: f64, color: Color) {
    let pad = thickness.ceil() + 1.0;
    let min_x = (from.x.min(to.x) - pad).floor() as i64;
    let max_x = (from.x.max(to.x) + pad).ceil() as i64;
    let min_y = (from.y.min(to.y) - pad).floor() as i64;
    let max_y = (from.y.max(to.y) + pad).ceil() as i64;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len_sq = dx * dx + dy * dy;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 + 0.5 - from.x;
            let py = y as f64 + 0.5 - from.y;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = (px - t * dx).hypot(py - t * dy);
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

fn fill_triangle(canvas: &mut Canvas, points: [Point; 3], color: Color) {
    let edge = |a: Point, b: Point, p: Point| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let [a, b, c] = points;
    let area = edge(a, b, c);
    if area == 0.0 {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor() as i64;
    let max_x = a.x.max(b.x).max(c.x).ceil() as i64;
    let min_y = a.y.min(b.y).min(c.y).floor() as i64;
    let max_y = a.y.max(b.y).max(c.y).ceil() as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let w = [edge(b, c, p), edge(c, a, p), edge(a, b, p)];
            if w.iter().all(|w| w * area >= 0.0) {
                canvas.blend(x, y, color, 1.0);
            }
        }
    }
}

fn draw_text(canvas: &mut Canvas, font: &Font, at: Point, label: &TextLabel, size: f32) {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(&label.text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x > max_x {
        return;
    }

    let width_px = (max_x - min_x) as f64;
    let height_px = (max_y - min_y) as f64;
    let offset_x = match label.anchor {
        TextAnchor::Start => at.x,
        TextAnchor::Middle => at.x - width_px / 2.0,
        TextAnchor::End => at.x - width_px,
    }
    .round() as i64;
    let offset_y = (at.y - height_px / 2.0).round() as i64;
    let color = Color::resolve(&label.style.color);

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + (gx as i32 + bb.min.x - min_x) as i64;
                let py = offset_y + (gy as i32 + bb.min.y - min_y) as i64;
                canvas.blend(px, py, color, v as f64);
            });
        }
    }
}

// ============================================================================
// GEOMETRY RENDERING
// ============================================================================

/// Paints `geometry` scaled to fit the canvas. Text is skipped without a font.
pub fn render_geometry(canvas: &mut Canvas, geometry: &GaugeGeometry, font: Option<&Font>) {
    canvas.clear(BACKGROUND);
    let transform = Transform::fit(canvas, geometry);

    let sectors = geometry
        .reference_ring
        .iter()
        .chain(std::iter::once(&geometry.value_arc))
        .chain(geometry.outer_ring.iter());
    for sector in sectors {
        fill_sector(canvas, &transform, &sector.path, Color::resolve(&sector.color));
    }

    let tick_color = Color::resolve(&geometry.tick_style.stroke);
    for tick in &geometry.ticks {
        draw_thick_line_aa(
            canvas,
            transform.apply(Point::new(tick.x1, tick.y1)),
            transform.apply(Point::new(tick.x2, tick.y2)),
            geometry.tick_style.stroke_width * transform.scale,
            tick_color,
        );
    }

    if let Some(font) = font {
        for label in geometry.labels.iter() {
            let size = (label.style.font_size * transform.scale) as f32;
            draw_text(canvas, font, transform.apply(label.position), label, size);
        }
    }

    match &geometry.indicator {
        Indicator::Line {
            from,
            to,
            color,
            width,
        } => draw_thick_line_aa(
            canvas,
            transform.apply(*from),
            transform.apply(*to),
            width * transform.scale,
            Color::resolve(color),
        ),
        Indicator::Triangle { points, color } => fill_triangle(
            canvas,
            points.map(|p| transform.apply(p)),
            Color::resolve(color),
        ),
    }

    if let Some(font) = font {
        for label in std::iter::once(&geometry.value_text).chain(geometry.unit_text.as_ref()) {
            let size = (label.style.font_size * transform.scale) as f32;
            draw_text(canvas, font, transform.apply(label.position), label, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GaugeConfig, GaugeProps, IndicatorType};
    use crate::gauge::compose;

    fn frame(size: usize) -> Vec<u8> {
        vec![0; size * size * 4]
    }

    fn geometry(props: &GaugeProps, value: f64) -> GaugeGeometry {
        compose(&GaugeConfig::resolve(props).unwrap(), value)
    }

    #[test]
    fn parses_css_colors() {
        assert_eq!(Color::parse_css("#ff6347"), Some(Color::new(0xff, 0x63, 0x47)));
        assert_eq!(Color::parse_css("#0f0"), Some(Color::new(0x00, 0xff, 0x00)));
        assert_eq!(Color::parse_css("LimeGreen"), Some(Color::new(0x32, 0xcd, 0x32)));
        assert_eq!(Color::parse_css("#12345"), None);
        assert_eq!(Color::parse_css("chartreuse-ish"), None);
        assert_eq!(Color::resolve("nope"), Color::new(0x80, 0x80, 0x80));
    }

    #[test]
    fn paints_rings_and_leaves_center_clear() {
        let props = GaugeProps::builder().value(0.0).max(100.0).build();
        let geometry = geometry(&props, 0.0);
        let mut buffer = frame(140);
        let mut canvas = Canvas::new(&mut buffer, 140, 140);
        render_geometry(&mut canvas, &geometry, None);

        // centre is (70, 80); straight up at radius 57 is the reference ring
        assert_eq!(canvas.pixel(70, 23), Some(Color::new(0xd3, 0xd3, 0xd3)));
        assert_eq!(canvas.pixel(70, 80), Some(BACKGROUND));
        // 270 degrees is in the gap between 220 and -40
        assert_eq!(canvas.pixel(13, 80), Some(BACKGROUND));
    }

    #[test]
    fn value_arc_uses_threshold_color() {
        let props = GaugeProps::builder().value(0.0).max(100.0).build();
        let geometry = geometry(&props, 50.0);
        let mut buffer = frame(140);
        let mut canvas = Canvas::new(&mut buffer, 140, 140);
        render_geometry(&mut canvas, &geometry, None);

        // value 50 sweeps to 90 deg, so 0 deg (straight up) is covered in limegreen
        assert_eq!(canvas.pixel(70, 23), Some(Color::new(0x32, 0xcd, 0x32)));
    }

    #[test]
    fn triangle_indicator_is_filled() {
        let props = GaugeProps::builder()
            .value(0.0)
            .max(100.0)
            .indicator_type(IndicatorType::Triangle)
            .indicator_color("black")
            .start_angle(-90.0)
            .end_angle(90.0)
            .build();
        // midpoint of a -90..90 sweep points straight up
        let geometry = geometry(&props, 50.0);
        let mut buffer = frame(140);
        let mut canvas = Canvas::new(&mut buffer, 140, 140);
        render_geometry(&mut canvas, &geometry, None);

        // tip at radius 54, base at 70: sample at radius 62
        assert_eq!(canvas.pixel(70, 18), Some(Color::new(0, 0, 0)));
        assert_eq!(canvas.pixel(60, 18), Some(BACKGROUND));
    }

    #[test]
    fn lines_blend_into_frame() {
        let mut buffer = frame(10);
        let mut canvas = Canvas::new(&mut buffer, 10, 10);
        canvas.clear(BACKGROUND);
        draw_thick_line_aa(
            &mut canvas,
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            2.0,
            Color::new(0, 0, 0),
        );
        assert_eq!(canvas.pixel(5, 4), Some(Color::new(0, 0, 0)));
        assert_eq!(canvas.pixel(5, 0), Some(BACKGROUND));
    }
}
