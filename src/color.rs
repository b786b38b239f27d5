use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

const GOLDEN_ANGLE: f32 = 137.507_77;

/// `n` badge colours. Hues step by the golden angle; lightness alternates.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * GOLDEN_ANGLE) % 360.0;
            let lightness = if i % 2 == 0 { 0.50 } else { 0.62 };
            let rgb: Srgb = Hsl::new(hue, 0.60, lightness).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// Bar colour of the sources chart.
pub const SOURCE_BAR: Color32 = Color32::from_rgb(54, 162, 235);

/// Line colour of the dates chart.
pub const DATE_LINE: Color32 = Color32::from_rgb(75, 192, 192);

// ---------------------------------------------------------------------------
// Color mapping: label → Color32
// ---------------------------------------------------------------------------

/// Stable colour per label, so a therapy area has the same colour on its
/// card badges and in the pie chart regardless of the current filter.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a String>) -> Self {
        let mut labels: Vec<&String> = labels.into_iter().collect();
        labels.sort();
        labels.dedup();

        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.clone(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label; unknown labels are grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            assert!(p[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_is_independent_of_input_order() {
        let a = ["Onc".to_string(), "CV".to_string()];
        let b = ["CV".to_string(), "Onc".to_string(), "CV".to_string()];
        let ma = ColorMap::new(&a);
        let mb = ColorMap::new(&b);
        assert_eq!(ma.color_for("Onc"), mb.color_for("Onc"));
        assert_ne!(ma.color_for("Onc"), ma.color_for("CV"));
        assert_eq!(ma.color_for("Neuro"), Color32::GRAY);
    }
}
