use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use super::{PieChart, ScatterChart};

// ---------------------------------------------------------------------------
// SVG rendering of chart specifications
// ---------------------------------------------------------------------------

const PIE_WIDTH: f64 = 640.0;
const PIE_HEIGHT: f64 = 420.0;
const PIE_RADIUS: f64 = 150.0;

const SCATTER_WIDTH: f64 = 760.0;
const SCATTER_HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 60.0;

const FONT: &str = "font-family='Helvetica, Arial, sans-serif'";

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn open_svg(svg: &mut String, width: f64, height: f64, title: &str) {
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' viewBox='0 0 {width:.0} {height:.0}' role='img'>"
    );
    let _ = writeln!(svg, "  <rect width='100%' height='100%' fill='#ffffff'/>");
    let _ = writeln!(
        svg,
        "  <text class='title' x='{:.1}' y='30' text-anchor='middle' font-size='17' fill='#2a3f5f' {FONT}>{}</text>",
        width / 2.0,
        escape_xml(title)
    );
}

fn legend_entry(svg: &mut String, x: f64, y: f64, color: &str, label: &str) {
    let _ = writeln!(
        svg,
        "  <rect x='{x:.1}' y='{:.1}' width='12' height='12' fill='{color}'/>",
        y - 10.0
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='{y:.1}' font-size='12' fill='#2a3f5f' {FONT}>{}</text>",
        x + 18.0,
        escape_xml(label)
    );
}

fn no_data(svg: &mut String, cx: f64, cy: f64) {
    let _ = writeln!(
        svg,
        "  <text class='no-data' x='{cx:.1}' y='{cy:.1}' text-anchor='middle' font-size='15' fill='#8a8a8a' {FONT}>No data</text>"
    );
}

/// Render a pie chart.  Slices start at twelve o'clock and run clockwise.
pub fn render_pie_svg(chart: &PieChart) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, PIE_WIDTH, PIE_HEIGHT, &chart.title);

    let cx = 40.0 + PIE_RADIUS + 20.0;
    let cy = PIE_HEIGHT / 2.0 + 15.0;
    let total = chart.total();

    if total == 0 {
        no_data(&mut svg, cx, cy);
    } else {
        let mut angle = -FRAC_PI_2;
        for slice in chart.slices.iter().filter(|s| s.value > 0) {
            let fraction = slice.value as f64 / total as f64;
            let color = slice.color.to_string();
            let label = escape_xml(&slice.label);

            if slice.value == total {
                let _ = writeln!(
                    svg,
                    "  <circle class='slice' cx='{cx:.1}' cy='{cy:.1}' r='{PIE_RADIUS:.1}' fill='{color}' stroke='#ffffff'><title>{label}: {}</title></circle>",
                    slice.value
                );
                break;
            }

            let sweep = fraction * TAU;
            let (x0, y0) = (cx + PIE_RADIUS * angle.cos(), cy + PIE_RADIUS * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + PIE_RADIUS * end.cos(), cy + PIE_RADIUS * end.sin());
            let large_arc = u8::from(sweep > std::f64::consts::PI);
            let _ = writeln!(
                svg,
                "  <path class='slice' d='M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {PIE_RADIUS:.2} {PIE_RADIUS:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z' fill='{color}' stroke='#ffffff'><title>{label}: {}</title></path>",
                slice.value
            );

            // Percentage label at the middle of the slice.
            let mid = angle + sweep / 2.0;
            let (lx, ly) = (
                cx + PIE_RADIUS * 0.65 * mid.cos(),
                cy + PIE_RADIUS * 0.65 * mid.sin(),
            );
            let _ = writeln!(
                svg,
                "  <text x='{lx:.1}' y='{ly:.1}' text-anchor='middle' font-size='12' fill='#ffffff' {FONT}>{:.1}%</text>",
                fraction * 100.0
            );
            angle = end;
        }
    }

    let legend_x = cx + PIE_RADIUS + 50.0;
    for (i, slice) in chart.slices.iter().enumerate() {
        let y = 90.0 + i as f64 * 22.0;
        legend_entry(
            &mut svg,
            legend_x,
            y,
            &slice.color.to_string(),
            &format!("{} ({})", slice.label, slice.value),
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Pick round tick positions covering `[low, high]`.
pub fn nice_ticks(low: f64, high: f64, target: usize) -> Vec<f64> {
    if !(low.is_finite() && high.is_finite()) || target == 0 {
        return Vec::new();
    }
    if high <= low {
        return vec![low];
    }
    let raw = (high - low) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (low / step).ceil() * step;
    let count = ((high - first) / step + 1e-9).floor().max(0.0) as usize + 1;
    (0..count).map(|i| first + i as f64 * step).collect()
}

/// Render a scatter chart: payload mass on x, outcome class on y.
pub fn render_scatter_svg(chart: &ScatterChart) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, SCATTER_WIDTH, SCATTER_HEIGHT, &chart.title);

    let plot_w = SCATTER_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = SCATTER_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    // A degenerate range still gets some horizontal room.
    let (x_min, x_max) = if chart.x_max > chart.x_min {
        (chart.x_min, chart.x_max)
    } else {
        (chart.x_min - 500.0, chart.x_max + 500.0)
    };
    let (y_min, y_max) = (-0.25, 1.25);

    let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
    let sy = |y: f64| MARGIN_TOP + (y_max - y) / (y_max - y_min) * plot_h;

    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN_LEFT:.1}' y='{MARGIN_TOP:.1}' width='{plot_w:.1}' height='{plot_h:.1}' fill='#e5ecf6'/>"
    );

    for t in nice_ticks(x_min, x_max, 6) {
        let x = sx(t);
        let _ = writeln!(
            svg,
            "  <line x1='{x:.1}' y1='{MARGIN_TOP:.1}' x2='{x:.1}' y2='{:.1}' stroke='#ffffff'/>",
            MARGIN_TOP + plot_h
        );
        let _ = writeln!(
            svg,
            "  <text x='{x:.1}' y='{:.1}' text-anchor='middle' font-size='11' fill='#2a3f5f' {FONT}>{t}</text>",
            MARGIN_TOP + plot_h + 16.0
        );
    }
    for class in [0.0, 1.0] {
        let y = sy(class);
        let _ = writeln!(
            svg,
            "  <line x1='{MARGIN_LEFT:.1}' y1='{y:.1}' x2='{:.1}' y2='{y:.1}' stroke='#ffffff'/>",
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' text-anchor='end' font-size='11' fill='#2a3f5f' {FONT}>{class}</text>",
            MARGIN_LEFT - 8.0,
            y + 4.0
        );
    }

    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='{:.1}' text-anchor='middle' font-size='13' fill='#2a3f5f' {FONT}>{}</text>",
        MARGIN_LEFT + plot_w / 2.0,
        SCATTER_HEIGHT - 16.0,
        escape_xml(&chart.x_label)
    );
    let _ = writeln!(
        svg,
        "  <text x='18' y='{:.1}' text-anchor='middle' font-size='13' fill='#2a3f5f' transform='rotate(-90 18 {:.1})' {FONT}>{}</text>",
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        escape_xml(&chart.y_label)
    );

    if chart.point_count() == 0 {
        no_data(&mut svg, MARGIN_LEFT + plot_w / 2.0, MARGIN_TOP + plot_h / 2.0);
    }

    for series in &chart.series {
        let color = series.color.to_string();
        for p in &series.points {
            let _ = writeln!(
                svg,
                "  <circle class='point' cx='{:.1}' cy='{:.1}' r='5' fill='{color}' fill-opacity='0.85'><title>{} | {} kg | class {}</title></circle>",
                sx(p.payload_mass_kg),
                sy(p.class as f64),
                escape_xml(&p.launch_site),
                p.payload_mass_kg,
                p.class
            );
        }
    }

    let legend_x = MARGIN_LEFT + plot_w + 24.0;
    let _ = writeln!(
        svg,
        "  <text x='{legend_x:.1}' y='{:.1}' font-size='12' fill='#2a3f5f' {FONT}>{}</text>",
        MARGIN_TOP + 4.0,
        escape_xml(&chart.legend_title)
    );
    for (i, series) in chart.series.iter().enumerate() {
        let y = MARGIN_TOP + 28.0 + i as f64 * 22.0;
        legend_entry(&mut svg, legend_x, y, &series.color.to_string(), &series.name);
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartColors, payload_scatter, success_pie};
    use crate::color::Color;
    use crate::chart::pie::PieSlice;
    use crate::data::filter::{PayloadRange, SiteSelection};
    use crate::data::model::tests::sample_dataset;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn pie_draws_one_shape_per_non_zero_slice() {
        let ds = sample_dataset();
        let colors = ChartColors::for_dataset(&ds);
        let pie = success_pie(&ds, &colors, &SiteSelection::All);
        let svg = render_pie_svg(&pie);
        let non_zero = pie.slices.iter().filter(|s| s.value > 0).count();
        assert_eq!(count(&svg, "class='slice'"), non_zero);
        assert!(svg.contains("Total Successful Launches by Site"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn single_slice_pie_is_a_full_circle() {
        let pie = PieChart {
            title: "t".into(),
            slices: vec![PieSlice {
                label: "Failure (0)".into(),
                value: 3,
                color: Color::FAILURE,
            }],
        };
        let svg = render_pie_svg(&pie);
        assert_eq!(count(&svg, "<circle class='slice'"), 1);
        assert_eq!(count(&svg, "<path class='slice'"), 0);
    }

    #[test]
    fn empty_pie_renders_placeholder() {
        let pie = PieChart {
            title: "Launch Outcomes for Site <none>".into(),
            slices: Vec::new(),
        };
        let svg = render_pie_svg(&pie);
        assert!(svg.contains("No data"));
        assert!(svg.contains("&lt;none&gt;"));
    }

    #[test]
    fn scatter_draws_every_point() {
        let ds = sample_dataset();
        let colors = ChartColors::for_dataset(&ds);
        let chart = payload_scatter(&ds, &colors, &SiteSelection::All, &PayloadRange::full(&ds));
        let svg = render_scatter_svg(&chart);
        assert_eq!(count(&svg, "class='point'"), chart.point_count());
        assert!(svg.contains("Payload Mass (kg)"));
        assert!(!svg.contains("No data"));
    }

    #[test]
    fn scatter_with_degenerate_range_still_renders() {
        let ds = sample_dataset();
        let colors = ChartColors::for_dataset(&ds);
        let range = PayloadRange::new(9600.0, 9600.0).unwrap();
        let chart = payload_scatter(&ds, &colors, &SiteSelection::All, &range);
        let svg = render_scatter_svg(&chart);
        assert_eq!(count(&svg, "class='point'"), 1);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn ticks_are_round_and_cover_range() {
        assert_eq!(
            nice_ticks(0.0, 10000.0, 5),
            vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0]
        );
        assert_eq!(nice_ticks(5.0, 5.0, 5), vec![5.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn ticks_stay_bounded_for_extreme_ranges() {
        assert_eq!(nice_ticks(0.0, 1.0e8, 10).len(), 11);
        // A step of 2 is below one ulp at 1e17.
        assert!(nice_ticks(1.0e17, 1.0e17 + 8.0, 4).len() <= 5);
        assert!(nice_ticks(0.0, f64::INFINITY, 10).is_empty());
    }
}
