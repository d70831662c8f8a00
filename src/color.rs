use palette::{FromColor, Hsl, IntoColor, Lab, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// First hue of the bar palette. With two groups this gives blue and orange.
const START_HUE: f32 = 210.0;

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (START_HUE + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_rgb(rgb)
        })
        .collect()
}

fn to_rgb(color: Srgb) -> RGBColor {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(channel(color.red), channel(color.green), channel(color.blue))
}

// ---------------------------------------------------------------------------
// Diverging colour map: value in [-limit, limit] → colour
// ---------------------------------------------------------------------------

/// Diverging map centred on zero: cold for negative, dark at zero, warm for
/// positive. Interpolation happens in Lab so both halves change lightness evenly.
#[derive(Debug, Clone, Copy)]
pub struct DivergingMap {
    limit: f64,
    cold: Lab,
    center: Lab,
    warm: Lab,
}

impl DivergingMap {
    /// A map whose ends sit at `-limit` and `+limit`. A zero or invalid
    /// limit falls back to 1.0.
    pub fn centered(limit: f64) -> Self {
        let limit = if limit.is_finite() && limit > 0.0 { limit } else { 1.0 };
        Self {
            limit,
            cold: Lab::from_color(Srgb::new(0.40_f32, 0.80, 0.95)),
            center: Lab::from_color(Srgb::new(0.12_f32, 0.12, 0.14)),
            warm: Lab::from_color(Srgb::new(0.98_f32, 0.80, 0.55)),
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Colour for `value`. Values beyond the limit saturate.
    pub fn color_for(&self, value: f64) -> RGBColor {
        let t = (value / self.limit).clamp(-1.0, 1.0) as f32;
        let lab = if t < 0.0 {
            self.center.mix(self.cold, -t)
        } else {
            self.center.mix(self.warm, t)
        };
        to_rgb(Srgb::from_color(lab))
    }
}

/// Black or white, whichever reads better on `fill`.
pub fn text_color_on(fill: RGBColor) -> RGBColor {
    let linear: LinSrgb = Srgb::new(fill.0, fill.1, fill.2)
        .into_format::<f32>()
        .into_linear();
    let luminance = 0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue;
    if luminance > 0.408 {
        RGBColor(0, 0, 0)
    } else {
        RGBColor(255, 255, 255)
    }
}
