use palette::{Hsl, IntoColor, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Wavelength → hue
// ---------------------------------------------------------------------------

/// Display hue (degrees) for a wavelength in nm: red at 650 nm and above,
/// sweeping towards violet and clamping at 350 nm.
pub fn hue(wavelength: f64) -> f64 {
    (650.0 - wavelength).clamp(0.0, 300.0) * 0.96
}

// ---------------------------------------------------------------------------
// Trace colours
// ---------------------------------------------------------------------------

/// Fill alpha of dye and filter traces.
pub const FILL_ALPHA: f32 = 0.2;
/// Line alpha of dye and filter traces.
pub const LINE_ALPHA: f32 = 0.5;
/// Fill alpha of the transmitted trace.
pub const TRANSMITTED_FILL_ALPHA: f32 = 0.9;

/// 8-bit RGBA colour as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Line colour of the transmitted trace.
    pub const TRANSMITTED_LINE: Rgba = Rgba([0, 0, 0, 128]);

    /// `#rrggbbaa`
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Serialised as the `#rrggbbaa` string.
impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fully saturated, mid-lightness colour of `hue` with the given alpha.
pub fn hue_to_rgba(hue: f64, alpha: f32) -> Rgba {
    let hsl = Hsl::new(hue as f32, 1.0, 0.5);
    let rgb: Srgb = hsl.into_color();
    Rgba([
        channel(rgb.red),
        channel(rgb.green),
        channel(rgb.blue),
        channel(alpha),
    ])
}

// ---------------------------------------------------------------------------
// Dash styles for filter traces
// ---------------------------------------------------------------------------

const DASH_STYLES: [&[u32]; 4] = [&[8, 4], &[16, 4], &[4, 8, 4], &[4, 8, 8]];

/// Endless cycle through the filter dash patterns. Each renderer owns one.
#[derive(Debug, Clone, Default)]
pub struct DashCycle {
    index: usize,
}

impl DashCycle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for DashCycle {
    type Item = &'static [u32];

    fn next(&mut self) -> Option<Self::Item> {
        let style = DASH_STYLES[self.index];
        self.index = (self.index + 1) % DASH_STYLES.len();
        Some(style)
    }
}
