use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::dimension::Dimension;
use crate::data::model::{Dataset, FieldValue};

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Red → light grey → green scale for a percent change clamped to ±100.
pub fn diverging(pct: f64) -> Color32 {
    let lin = |r: u8, g: u8, b: u8| -> LinSrgb { Srgb::new(r, g, b).into_format::<f32>().into_linear() };
    let (low, mid, high) = (lin(0xd7, 0x30, 0x27), lin(0xf0, 0xf0, 0xf0), lin(0x1a, 0x98, 0x50));

    let t = (pct.clamp(-100.0, 100.0) / 100.0) as f32;
    let mixed = if t < 0.0 { mid.mix(low, -t) } else { mid.mix(high, t) };
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Fixed colour per value of one dimension (brands, by default).
///
/// Built from the whole dataset rather than the filtered subset so a brand
/// keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub dimension: Dimension,
    mapping: BTreeMap<FieldValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(dataset: &Dataset, dimension: Dimension) -> Self {
        let mut values: Vec<&FieldValue> = dataset
            .records
            .iter()
            .map(|r| r.field(dimension))
            .filter(|v| !v.is_missing())
            .collect();
        values.sort();
        values.dedup();

        let palette = generate_palette(values.len());
        let mapping = values.into_iter().cloned().zip(palette).collect();

        ColorMap {
            dimension,
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &FieldValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::five_listings;

    #[test]
    fn palette_size_and_distinctness() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn diverging_scale_endpoints() {
        let close = |a: Color32, b: Color32| {
            a.to_array()
                .iter()
                .zip(b.to_array())
                .all(|(x, y)| x.abs_diff(y) <= 1)
        };
        assert!(close(diverging(0.0), Color32::from_rgb(0xf0, 0xf0, 0xf0)));
        assert!(close(diverging(-250.0), Color32::from_rgb(0xd7, 0x30, 0x27)));
        assert!(close(diverging(100.0), Color32::from_rgb(0x1a, 0x98, 0x50)));
    }

    #[test]
    fn every_brand_gets_its_own_colour() {
        let ds = five_listings();
        let map = ColorMap::new(&ds, Dimension::Brand);
        let a = map.color_for(&"A".into());
        let b = map.color_for(&"B".into());
        assert_ne!(a, b);
        assert_eq!(map.color_for(&"unknown".into()), Color32::GRAY);
    }
}
