//! Skew-T log-P diagram of the parcel path, rendered as SVG.
use crate::{
    error::PresentationError,
    foehn::FoehnAnalysis,
    keys::{KeyPoint, Stage},
    met_formulas,
    metrics::FoehnMetrics,
};
use itertools::Itertools;
use metfor::{Celsius, HectoPascal, Quantity};
use std::fmt::Write;

const STANDARD_ISOBARS: [f64; 12] = [
    1000.0, 925.0, 850.0, 700.0, 600.0, 500.0, 400.0, 300.0, 250.0, 200.0, 150.0, 100.0,
];

/// Size and axis ranges of the diagram.
///
/// Temperature increases to the right and pressure decreases logarithmically upward. Isotherms
/// lean to the right by `skew` degrees over the full height of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewTLayout {
    /// Width of the image in pixels.
    pub width: f64,
    /// Height of the image in pixels.
    pub height: f64,
    /// Space around the plot area for labels.
    pub margin: f64,
    /// Pressure at the bottom edge of the plot.
    pub bottom_pressure: HectoPascal,
    /// Pressure at the top edge of the plot.
    pub top_pressure: HectoPascal,
    /// Temperature at the bottom left corner.
    pub left_temperature: Celsius,
    /// Temperature at the bottom right corner.
    pub right_temperature: Celsius,
    /// Isotherm lean, C across the full height.
    pub skew: f64,
}

impl Default for SkewTLayout {
    fn default() -> Self {
        SkewTLayout {
            width: 900.0,
            height: 700.0,
            margin: 60.0,
            bottom_pressure: HectoPascal(1020.0),
            top_pressure: HectoPascal(350.0),
            left_temperature: Celsius(-40.0),
            right_temperature: Celsius(45.0),
            skew: 35.0,
        }
    }
}

impl SkewTLayout {
    /// A layout with a pressure range fitted to the path.
    pub fn for_analysis(anal: &FoehnAnalysis) -> Self {
        let bottom = anal
            .windward_surface()
            .pressure
            .unpack()
            .max(anal.leeward_surface().pressure.unpack())
            + 20.0;
        let top = (anal.summit().pressure.unpack() - 50.0).max(10.0);

        SkewTLayout {
            bottom_pressure: HectoPascal(bottom),
            top_pressure: HectoPascal(top),
            ..SkewTLayout::default()
        }
    }

    fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// Fraction of the way up the plot, 0 at the bottom and 1 at the top.
    fn height_fraction(&self, pressure: HectoPascal) -> f64 {
        let bottom = self.bottom_pressure.unpack().ln();
        let top = self.top_pressure.unpack().ln();

        (bottom - pressure.unpack().ln()) / (bottom - top)
    }

    /// Convert a pressure and temperature into image coordinates.
    pub fn coordinates(&self, pressure: HectoPascal, temperature: Celsius) -> (f64, f64) {
        let frac = self.height_fraction(pressure);
        let left = self.left_temperature.unpack();
        let right = self.right_temperature.unpack();

        let x = self.margin
            + (temperature.unpack() + self.skew * frac - left) / (right - left) * self.plot_width();
        let y = self.margin + (1.0 - frac) * self.plot_height();

        (x, y)
    }

    fn pressure_in_range(&self, pressure: f64) -> bool {
        pressure <= self.bottom_pressure.unpack() && pressure >= self.top_pressure.unpack()
    }

    /// Render the diagram.
    pub fn render(&self, anal: &FoehnAnalysis, title: &str) -> Result<String, PresentationError> {
        let mut out = String::with_capacity(32 * 1024);

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(
            out,
            r#"<defs><clipPath id="plot-area"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath></defs>"#,
            self.margin,
            self.margin,
            self.plot_width(),
            self.plot_height()
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

        writeln!(out, r#"<g clip-path="url(#plot-area)">"#)?;
        self.write_isotherms(&mut out)?;
        self.write_dry_adiabats(&mut out)?;
        self.write_isobars(&mut out)?;
        self.write_stages(&mut out, anal)?;
        self.write_dew_point(&mut out, anal)?;
        self.write_key_points(&mut out, anal)?;
        writeln!(out, "</g>")?;

        self.write_axes(&mut out)?;
        self.write_annotation(&mut out, anal)?;

        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
            self.width / 2.0,
            self.margin / 2.0,
            escape(title)
        )?;
        writeln!(out, "</svg>")?;

        Ok(out)
    }

    fn write_isotherms(&self, out: &mut String) -> Result<(), PresentationError> {
        // Skewed lines reach well left of the bottom left corner at the top of the plot.
        let coldest = (self.left_temperature.unpack() - self.skew).div_euclid(10.0) as i32 * 10;
        let warmest = self.right_temperature.unpack() as i32;

        for t in (coldest..=warmest).step_by(10) {
            let t = Celsius(f64::from(t));
            let (x0, y0) = self.coordinates(self.bottom_pressure, t);
            let (x1, y1) = self.coordinates(self.top_pressure, t);
            let stroke = if t == Celsius(0.0) { "#999999" } else { "#d0d0d0" };

            writeln!(
                out,
                r#"<line class="isotherm" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
                x0, y0, x1, y1, stroke
            )?;
        }

        Ok(())
    }

    fn write_dry_adiabats(&self, out: &mut String) -> Result<(), PresentationError> {
        let bottom = self.bottom_pressure.unpack();
        let top = self.top_pressure.unpack();
        let steps: i32 = 20;

        for theta in (-30i32..=150).step_by(10) {
            let theta = Celsius(f64::from(theta));

            let points = (0..=steps)
                .map(|i| HectoPascal(bottom + (top - bottom) * f64::from(i) / f64::from(steps)))
                .map(|p| {
                    let t = met_formulas::dry_adiabat_temperature(HectoPascal(1000.0), theta, p);
                    self.coordinates(p, t)
                })
                .map(|(x, y)| format!("{:.1},{:.1}", x, y))
                .join(" ");

            writeln!(
                out,
                r##"<polyline class="dry-adiabat" points="{}" fill="none" stroke="#e3b778" stroke-width="0.8" stroke-dasharray="2,3"/>"##,
                points
            )?;
        }

        Ok(())
    }

    fn write_isobars(&self, out: &mut String) -> Result<(), PresentationError> {
        for &p in STANDARD_ISOBARS.iter().filter(|&&p| self.pressure_in_range(p)) {
            let y = self.coordinates(HectoPascal(p), self.left_temperature).1;

            writeln!(
                out,
                r##"<line class="isobar" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#b0b0b0" stroke-width="1"/>"##,
                self.margin,
                y,
                self.width - self.margin,
                y
            )?;
        }

        Ok(())
    }

    fn write_stages(
        &self,
        out: &mut String,
        anal: &FoehnAnalysis,
    ) -> Result<(), PresentationError> {
        for seg in anal.path().segments() {
            let stage = seg.stage();
            let (color, dash) = stage_style(stage);

            let points = seg
                .samples()
                .iter()
                .map(|pcl| self.coordinates(pcl.pressure, pcl.temperature))
                .map(|(x, y)| format!("{:.1},{:.1}", x, y))
                .join(" ");

            write!(
                out,
                r#"<polyline class="stage" id="{}" points="{}" fill="none" stroke="{}" stroke-width="2.5""#,
                stage_id(stage),
                points,
                color
            )?;
            if let Some(dash) = dash {
                write!(out, r#" stroke-dasharray="{}""#, dash)?;
            }
            writeln!(out, "><title>{}</title></polyline>", escape(&stage.to_string()))?;
        }

        Ok(())
    }

    fn write_dew_point(
        &self,
        out: &mut String,
        anal: &FoehnAnalysis,
    ) -> Result<(), PresentationError> {
        let points = anal
            .path()
            .samples()
            .map(|pcl| self.coordinates(pcl.pressure, pcl.dew_point))
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .join(" ");

        writeln!(
            out,
            r##"<polyline class="dew-point" points="{}" fill="none" stroke="#1f77b4" stroke-width="2"><title>Dew point</title></polyline>"##,
            points
        )?;

        Ok(())
    }

    fn write_key_points(
        &self,
        out: &mut String,
        anal: &FoehnAnalysis,
    ) -> Result<(), PresentationError> {
        for (key, pcl) in anal.key_points() {
            let (x, y) = self.coordinates(pcl.pressure, pcl.temperature);
            let color = match key {
                KeyPoint::WindwardSurface | KeyPoint::LeewardSurface => "black",
                KeyPoint::WindwardLCL | KeyPoint::LeewardLCL => "#1f77b4",
                KeyPoint::Summit => "red",
            };

            writeln!(
                out,
                r#"<circle class="key-point" cx="{:.1}" cy="{:.1}" r="5" fill="{}"/>"#,
                x, y, color
            )?;
            writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}">{} ({:.0} hPa, {:.1}°C)</text>"#,
                x + 8.0,
                y - 6.0,
                escape(&key.to_string()),
                pcl.pressure.unpack(),
                pcl.temperature.unpack()
            )?;
        }

        Ok(())
    }

    fn write_axes(&self, out: &mut String) -> Result<(), PresentationError> {
        writeln!(
            out,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black" stroke-width="1.5"/>"#,
            self.margin,
            self.margin,
            self.plot_width(),
            self.plot_height()
        )?;

        for &p in STANDARD_ISOBARS.iter().filter(|&&p| self.pressure_in_range(p)) {
            let y = self.coordinates(HectoPascal(p), self.left_temperature).1;
            writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.0}</text>"#,
                self.margin - 6.0,
                y + 4.0,
                p
            )?;
        }

        let left = self.left_temperature.unpack().ceil() as i32;
        let right = self.right_temperature.unpack().floor() as i32;
        for t in (left..=right).filter(|t| t % 10 == 0) {
            let x = self.coordinates(self.bottom_pressure, Celsius(f64::from(t))).0;
            writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                x,
                self.height - self.margin + 16.0,
                t
            )?;
        }

        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Temperature (°C)</text>"#,
            self.width / 2.0,
            self.height - self.margin / 4.0
        )?;
        writeln!(
            out,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" transform="rotate(-90 {x:.1} {y:.1})">Pressure (hPa)</text>"#,
            x = self.margin / 4.0,
            y = self.height / 2.0
        )?;

        Ok(())
    }

    fn write_annotation(
        &self,
        out: &mut String,
        anal: &FoehnAnalysis,
    ) -> Result<(), PresentationError> {
        let metrics = FoehnMetrics::new(anal);
        let leeward = anal.leeward_surface();
        let lines = [
            format!(
                "Leeward: {:.1}°C / Td {:.1}°C",
                leeward.temperature.unpack(),
                leeward.dew_point.unpack()
            ),
            format!("RH: {:.1}%", metrics.leeward_relative_humidity),
            format!("Warming: {:+.1}°C", metrics.temperature_increase.unpack()),
            format!("Moisture loss: {:.2} g/kg", metrics.moisture_loss),
            format!("Risk: {} / {}", metrics.warming_risk, metrics.dryness),
        ];

        let line_height = 16.0;
        let box_width = 230.0;
        let box_height = line_height * lines.len() as f64 + 12.0;
        let x = self.width - self.margin - box_width - 10.0;
        let y = self.margin + 10.0;

        writeln!(out, r#"<g class="annotation">"#)?;
        writeln!(
            out,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="white" fill-opacity="0.9" stroke="black"/>"#,
            x, y, box_width, box_height
        )?;
        for (i, line) in lines.iter().enumerate() {
            writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
                x + 8.0,
                y + line_height * (i as f64 + 1.0),
                escape(line)
            )?;
        }
        writeln!(out, "</g>")?;

        Ok(())
    }
}

/// Render the diagram with a layout fitted to the path.
pub fn render_skewt(anal: &FoehnAnalysis, title: &str) -> Result<String, PresentationError> {
    SkewTLayout::for_analysis(anal).render(anal, title)
}

fn stage_style(stage: Stage) -> (&'static str, Option<&'static str>) {
    match stage {
        Stage::DryAscent => ("grey", None),
        Stage::MoistAscent => ("red", None),
        Stage::MoistDescent => ("red", Some("8,4")),
        Stage::DryDescent => ("grey", Some("8,4")),
    }
}

fn stage_id(stage: Stage) -> &'static str {
    match stage {
        Stage::DryAscent => "dry-ascent",
        Stage::MoistAscent => "moist-ascent",
        Stage::MoistDescent => "moist-descent",
        Stage::DryDescent => "dry-descent",
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::*;
    use crate::utility::test_tools::*;

    #[test]
    fn test_coordinates() {
        let layout = SkewTLayout::default();

        let (_, y) = layout.coordinates(layout.bottom_pressure, Celsius(0.0));
        assert!(approx_equal(y, layout.height - layout.margin, 1.0e-9));

        let (_, y) = layout.coordinates(layout.top_pressure, Celsius(0.0));
        assert!(approx_equal(y, layout.margin, 1.0e-9));

        let (x, _) = layout.coordinates(layout.bottom_pressure, layout.left_temperature);
        assert!(approx_equal(x, layout.margin, 1.0e-9));

        // Isotherms lean right.
        let (x0, _) = layout.coordinates(HectoPascal(1000.0), Celsius(-10.0));
        let (x1, _) = layout.coordinates(HectoPascal(500.0), Celsius(-10.0));
        assert!(x1 > x0);
    }

    #[test]
    fn test_layout_fits_path() {
        let anal = madeira_analysis();
        let layout = SkewTLayout::for_analysis(&anal);

        assert_eq!(layout.bottom_pressure, HectoPascal(1020.0));
        assert_eq!(layout.top_pressure, HectoPascal(350.0));
        for pcl in anal.path().samples() {
            let (x, y) = layout.coordinates(pcl.pressure, pcl.temperature);
            assert!(x > layout.margin && x < layout.width - layout.margin);
            assert!(y > layout.margin && y < layout.height - layout.margin);
        }
    }

    #[test]
    fn test_render() {
        let svg = render_skewt(&madeira_analysis(), "Föhn <Madeira> & Funchal").unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"<polyline class="stage""#).count(), 4);
        assert_eq!(svg.matches(r#"class="dew-point""#).count(), 1);
        assert_eq!(svg.matches(r#"class="key-point""#).count(), 5);
        assert!(svg.contains(r#"id="moist-descent""#));
        assert!(svg.contains("Föhn &lt;Madeira&gt; &amp; Funchal"));
        assert!(!svg.contains("<Madeira>"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape(r#""x""#), "&quot;x&quot;");
        assert_eq!(escape("plain"), "plain");
    }
}
