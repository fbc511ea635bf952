//! Layer paint types in MapLibre style-spec shape, plus colour parsing.

use serde::{Deserialize, Serialize};

/// Renderer layer kinds used by the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Raster,
}

/// Fill paint properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPaint {
    #[serde(rename = "fill-color")]
    pub fill_color: String,
    #[serde(rename = "fill-opacity", default = "default_opacity")]
    pub fill_opacity: f32,
    #[serde(rename = "fill-outline-color", default, skip_serializing_if = "Option::is_none")]
    pub fill_outline_color: Option<String>,
}

fn default_opacity() -> f32 {
    1.0
}

impl FillPaint {
    pub fn new(fill_color: &str, fill_opacity: f32) -> Self {
        Self {
            fill_color: fill_color.to_string(),
            fill_opacity,
            fill_outline_color: None,
        }
    }

    /// Fill colour as RGBA [0..1] with opacity folded into alpha.
    pub fn rgba(&self) -> Option<[f32; 4]> {
        let mut rgba = parse_color_string(&self.fill_color)?;
        rgba[3] *= self.fill_opacity;
        Some(rgba)
    }

    pub fn validate(&self) -> Result<(), String> {
        if parse_color_string(&self.fill_color).is_none() {
            return Err(format!("unparseable fill-color '{}'", self.fill_color));
        }
        if let Some(outline) = &self.fill_outline_color {
            if parse_color_string(outline).is_none() {
                return Err(format!("unparseable fill-outline-color '{outline}'"));
            }
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(format!("fill-opacity {} outside [0, 1]", self.fill_opacity));
        }
        Ok(())
    }
}

/// Layer description handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    /// Raster layers carry no paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint: Option<FillPaint>,
}

impl LayerSpec {
    pub fn fill(id: &str, source: &str, paint: FillPaint) -> Self {
        Self {
            id: id.to_string(),
            kind: LayerKind::Fill,
            source: source.to_string(),
            paint: Some(paint),
        }
    }

    pub fn raster(id: &str, source: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: LayerKind::Raster,
            source: source.to_string(),
            paint: None,
        }
    }
}

/// Parse a CSS colour (hex, rgb/rgba, or a small named subset) to RGBA [0..1].
pub fn parse_color_string(s: &str) -> Option<[f32; 4]> {
    let s = s.trim();

    if s.starts_with('#') {
        return parse_hex_color(s);
    }

    if s.starts_with("rgb") {
        return parse_rgb_color(s);
    }

    match s.to_lowercase().as_str() {
        "black" => Some([0.0, 0.0, 0.0, 1.0]),
        "white" => Some([1.0, 1.0, 1.0, 1.0]),
        "red" => Some([1.0, 0.0, 0.0, 1.0]),
        "green" => Some([0.0, 0.5, 0.0, 1.0]),
        "blue" => Some([0.0, 0.0, 1.0, 1.0]),
        "orange" => Some([1.0, 0.647, 0.0, 1.0]),
        "transparent" => Some([0.0, 0.0, 0.0, 0.0]),
        _ => None,
    }
}

fn hex_channel(hex: &str, range: std::ops::Range<usize>, doubled: bool) -> Option<f32> {
    let digits = hex.get(range)?;
    let value = if doubled {
        u8::from_str_radix(&digits.repeat(2), 16).ok()?
    } else {
        u8::from_str_radix(digits, 16).ok()?
    };
    Some(value as f32 / 255.0)
}

fn parse_hex_color(s: &str) -> Option<[f32; 4]> {
    let hex = s.trim_start_matches('#');
    match hex.len() {
        // #RGB / #RGBA
        3 | 4 => {
            let r = hex_channel(hex, 0..1, true)?;
            let g = hex_channel(hex, 1..2, true)?;
            let b = hex_channel(hex, 2..3, true)?;
            let a = if hex.len() == 4 { hex_channel(hex, 3..4, true)? } else { 1.0 };
            Some([r, g, b, a])
        }
        6 | 8 => {
            let r = hex_channel(hex, 0..2, false)?;
            let g = hex_channel(hex, 2..4, false)?;
            let b = hex_channel(hex, 4..6, false)?;
            let a = if hex.len() == 8 { hex_channel(hex, 6..8, false)? } else { 1.0 };
            Some([r, g, b, a])
        }
        _ => None,
    }
}

fn parse_rgb_color(s: &str) -> Option<[f32; 4]> {
    let inner = s
        .trim_start_matches("rgba(")
        .trim_start_matches("rgb(")
        .trim_end_matches(')');
    let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();

    if parts.len() < 3 {
        return None;
    }

    let r: f32 = parts[0].parse().ok()?;
    let g: f32 = parts[1].parse().ok()?;
    let b: f32 = parts[2].parse().ok()?;
    let a = match parts.get(3) {
        Some(a) => a.parse().ok()?,
        None => 1.0,
    };

    Some([r / 255.0, g / 255.0, b / 255.0, a])
}
