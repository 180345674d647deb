use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// RGB colour with CSS hex formatting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GRAY: Color = Color::from_rgb(160, 160, 160);
    pub const FAILURE: Color = Color::from_rgb(214, 69, 65);
    pub const SUCCESS: Color = Color::from_rgb(46, 160, 67);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colours travel to the browser as CSS hex strings.
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color
// ---------------------------------------------------------------------------

/// Maps the unique values of a category column (booster version, launch
/// site) to distinct colours.  Built from the whole dataset so a value keeps
/// its colour however the rows are filtered.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Color>,
    default_color: Color,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<String, Color> = unique_values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour).
    pub fn legend_entries(&self) -> Vec<(String, Color)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.clone(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(5);
        assert_eq!(palette.len(), 5);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::from_rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(
            serde_json::to_string(&Color::from_rgb(1, 2, 3)).unwrap(),
            "\"#010203\""
        );
    }

    #[test]
    fn unknown_value_gets_default_colour() {
        let map = ColorMap::new("Booster Version Category", &set(&["FT", "B4"]));
        assert_eq!(map.color_for("Starship"), Color::GRAY);
        assert_ne!(map.color_for("FT"), map.color_for("B4"));
    }

    #[test]
    fn colours_depend_only_on_the_full_value_set() {
        let all = set(&["B4", "B5", "FT", "v1.0", "v1.1"]);
        let a = ColorMap::new("Booster Version Category", &all);
        let b = ColorMap::new("Booster Version Category", &all);
        assert_eq!(a.color_for("FT"), b.color_for("FT"));
        assert_eq!(a.legend_entries().len(), 5);
        assert_eq!(a.legend_entries()[0].0, "B4");
    }
}
