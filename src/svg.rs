// ============================================================================
// SVG OUTPUT
// ============================================================================
//
// SVG output: path data strings and standalone documents.

use std::fmt::{self, Display, Write};

use crate::arc::{PathCommand, Point, SectorPath};
use crate::config::TextStyle;
use crate::gauge::{GaugeGeometry, Indicator, TextLabel};

/// Number formatting for path data: three decimals, trailing zeros dropped,
/// negative zero printed as `0`.
pub struct Num(pub f64);

impl Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        if rounded == 0.0 {
            return f.write_str("0");
        }
        let text = format!("{rounded:.3}");
        f.write_str(text.trim_end_matches('0').trim_end_matches('.'))
    }
}

impl Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo(p) => write!(f, "M{},{}", Num(p.x), Num(p.y)),
            PathCommand::LineTo(p) => write!(f, "L{},{}", Num(p.x), Num(p.y)),
            PathCommand::Arc {
                radius,
                large_arc,
                sweep,
                to,
            } => write!(
                f,
                "A{r},{r},0,{},{},{},{}",
                u8::from(large_arc),
                u8::from(sweep),
                Num(to.x),
                Num(to.y),
                r = Num(radius),
            ),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

/// Writes the path data (`d` attribute) for the sector. Empty sectors print
/// as an empty string.
impl Display for SectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in self.commands() {
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Closed polygon path data.
pub fn polygon_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{op}{},{}", Num(p.x), Num(p.y));
    }
    if !points.is_empty() {
        d.push('Z');
    }
    d
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

fn text_style_attrs(style: &TextStyle) -> String {
    let mut attrs = format!(
        r#"font-size="{}" fill="{}""#,
        Num(style.font_size),
        escape(&style.color)
    );
    if let Some(weight) = &style.font_weight {
        let _ = write!(attrs, r#" font-weight="{}""#, escape(weight));
    }
    attrs
}

fn write_text(out: &mut String, label: &TextLabel) {
    let _ = writeln!(
        out,
        r#"    <text x="{}" y="{}" text-anchor="{}" dominant-baseline="central" {}>{}</text>"#,
        Num(label.position.x),
        Num(label.position.y),
        label.anchor.as_str(),
        text_style_attrs(&label.style),
        escape(&label.text),
    );
}

impl GaugeGeometry {
    /// Renders the geometry as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = Num(self.width),
            h = Num(self.height),
        );
        let _ = writeln!(
            out,
            r#"  <g transform="translate({},{})">"#,
            Num(self.center.x),
            Num(self.center.y)
        );

        let sectors = self
            .reference_ring
            .iter()
            .chain(std::iter::once(&self.value_arc))
            .chain(self.outer_ring.iter());
        for sector in sectors.filter(|s| !s.path.is_empty()) {
            let _ = writeln!(
                out,
                r#"    <path d="{}" fill="{}"/>"#,
                sector.path,
                escape(&sector.color)
            );
        }

        for tick in &self.ticks {
            let _ = writeln!(
                out,
                r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                Num(tick.x1),
                Num(tick.y1),
                Num(tick.x2),
                Num(tick.y2),
                escape(&self.tick_style.stroke),
                Num(self.tick_style.stroke_width),
            );
        }

        for label in &self.labels {
            write_text(&mut out, label);
        }

        match &self.indicator {
            Indicator::Line {
                from,
                to,
                color,
                width,
            } => {
                let _ = writeln!(
                    out,
                    r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                    Num(from.x),
                    Num(from.y),
                    Num(to.x),
                    Num(to.y),
                    escape(color),
                    Num(*width),
                );
            }
            Indicator::Triangle { points, color } => {
                let _ = writeln!(
                    out,
                    r#"    <path d="{}" fill="{}"/>"#,
                    polygon_path(points),
                    escape(color)
                );
            }
        }

        write_text(&mut out, &self.value_text);
        if let Some(unit) = &self.unit_text {
            write_text(&mut out, unit);
        }

        out.push_str("  </g>\n</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::arc_path;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn number_formatting() {
        assert_eq!(Num(1.0).to_string(), "1");
        assert_eq!(Num(-0.0000001).to_string(), "0");
        assert_eq!(Num(2.50049).to_string(), "2.5");
        assert_eq!(Num(-12.3456).to_string(), "-12.346");
    }

    #[test]
    fn quarter_sector_path_data() {
        let path = arc_path(40.0, 50.0, -FRAC_PI_2, 0.0);
        assert_eq!(path.to_string(), "M0,-50A50,50,0,0,1,50,0L40,0A40,40,0,0,0,0,-40Z");
    }

    #[test]
    fn full_turn_path_data() {
        let path = arc_path(40.0, 50.0, -FRAC_PI_2, 1.5 * PI);
        assert_eq!(
            path.to_string(),
            "M0,-50A50,50,0,0,1,0,50A50,50,0,0,1,0,-50Z\
             M0,-40A40,40,0,0,0,0,40A40,40,0,0,0,0,-40Z"
        );
    }

    #[test]
    fn empty_sector_has_no_data() {
        assert_eq!(arc_path(1.0, 2.0, 0.5, 0.5).to_string(), "");
    }

    #[test]
    fn polygon() {
        let d = polygon_path(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        assert_eq!(d, "M0,0L1,0L0,1Z");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
