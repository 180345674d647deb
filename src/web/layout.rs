use std::fmt::Write;

use crate::chart::render::{escape_xml, nice_ticks};
use crate::data::filter::ALL_SITES;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Page layout
// ---------------------------------------------------------------------------
//
//   h1                     dashboard title
//   select#site-dropdown   All Sites + one option per launch site
//   img#success-pie-chart
//   p + two range inputs   payload range (kg), ticks every slider step
//   img#success-payload-scatter-chart

const STYLE: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 24px auto; max-width: 900px; }
h1 { text-align: center; color: #503D36; font-size: 40px; }
select { width: 100%; padding: 6px; font-size: 15px; }
.chart { display: block; margin: 16px auto; max-width: 100%; }
.range { display: flex; gap: 12px; align-items: center; }
.range input { flex: 1; }
"#;

/// Re-requests the chart images whenever an input changes.  The pie only
/// depends on the site, the scatter on both inputs.
const SCRIPT: &str = r#"
const site = document.getElementById('site-dropdown');
const low = document.getElementById('payload-min');
const high = document.getElementById('payload-max');
const label = document.getElementById('payload-label');
const pie = document.getElementById('success-pie-chart');
const scatter = document.getElementById('success-payload-scatter-chart');

function payloadRange() {
  let a = Number(low.value), b = Number(high.value);
  if (a > b) { [a, b] = [b, a]; }
  return [a, b];
}

function updatePie() {
  pie.src = '/chart/pie.svg?site=' + encodeURIComponent(site.value);
}

function updateScatter() {
  const [a, b] = payloadRange();
  label.textContent = a + ' to ' + b + ' kg';
  scatter.src = '/chart/scatter.svg?site=' + encodeURIComponent(site.value) +
    '&min=' + a + '&max=' + b;
}

site.addEventListener('change', () => { updatePie(); updateScatter(); });
low.addEventListener('input', updateScatter);
high.addEventListener('input', updateScatter);
"#;

/// Upper bound on datalist marks.  Beyond it the marks fall back to round
/// ticks across the slider extent.
const MAX_MARKS: usize = 50;

/// Tick marks every `step` from `lo` to `hi`.
fn slider_marks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let spans = ((hi - lo) / step).floor();
    if !spans.is_finite() || spans < 0.0 {
        return Vec::new();
    }
    if spans >= MAX_MARKS as f64 {
        return nice_ticks(lo, hi, 10);
    }
    (0..=spans as usize).map(|i| lo + i as f64 * step).collect()
}

fn range_input(html: &mut String, id: &str, lo: f64, hi: f64, value: f64) {
    let _ = writeln!(
        html,
        "  <input type='range' id='{id}' min='{lo}' max='{hi}' step='any' value='{value}' list='payload-marks'>"
    );
}

/// Render the dashboard page for the loaded dataset.
pub fn index_page(state: &AppState) -> String {
    let ds = &state.dataset;
    let (lo, hi) = state.slider_bounds();
    let title = escape_xml(&state.config.title);

    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>\n<html lang='en'>\n<head>");
    let _ = writeln!(html, "<meta charset='utf-8'>\n<title>{title}</title>");
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>");

    // Site selector, default ALL.
    let _ = writeln!(
        html,
        "<select id='site-dropdown' aria-label='Select a launch site'>"
    );
    let _ = writeln!(
        html,
        "  <option value='{ALL_SITES}' selected>All Sites</option>"
    );
    for site in &ds.sites {
        let site = escape_xml(site);
        let _ = writeln!(html, "  <option value='{site}'>{site}</option>");
    }
    let _ = writeln!(html, "</select>");

    let _ = writeln!(
        html,
        "<img class='chart' id='success-pie-chart' alt='Launch success pie chart' src='/chart/pie.svg?site={ALL_SITES}'>"
    );

    // Payload range selector.  `step='any'` keeps the initial dataset bounds
    // exact; the datalist draws the tick marks.
    let _ = writeln!(
        html,
        "<p>Payload range (Kg): <span id='payload-label'>{} to {} kg</span></p>",
        ds.payload_min, ds.payload_max
    );
    let _ = writeln!(html, "<datalist id='payload-marks'>");
    let step = state.config.slider_step.max(1) as f64;
    for mark in slider_marks(lo, hi, step) {
        let _ = writeln!(html, "  <option value='{mark}' label='{mark}'></option>");
    }
    let _ = writeln!(html, "</datalist>");
    let _ = writeln!(html, "<div class='range'>");
    range_input(&mut html, "payload-min", lo, hi, ds.payload_min);
    range_input(&mut html, "payload-max", lo, hi, ds.payload_max);
    let _ = writeln!(html, "</div>");

    let _ = writeln!(
        html,
        "<img class='chart' id='success-payload-scatter-chart' alt='Payload vs. launch outcome scatter chart' src='/chart/scatter.svg?site={ALL_SITES}&amp;min={}&amp;max={}'>",
        ds.payload_min, ds.payload_max
    );

    let _ = writeln!(html, "<script>{SCRIPT}</script>\n</body>\n</html>");
    html
}
