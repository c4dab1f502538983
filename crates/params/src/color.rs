//! Conversion between normalized RGB triples and packed 24-bit color values.
//!
//! Color pickers work on `0xRRGGBB` integers while the shader consumes three
//! floats in `[0, 1]`. Each channel maps as `floor(component * 255)` on the way
//! out and `byte / 255` on the way back, so the 256 representable levels per
//! channel round-trip exactly.

/// Largest value a packed color can hold.
pub const MAX_PACKED: u32 = 0x00FF_FFFF;

fn component_to_level(component: f32) -> u32 {
    if !component.is_finite() {
        return 0;
    }
    let scaled = f64::from(component) * 255.0;
    // `byte / 255` rounded to f32 can land a hair below `byte`; only that exact value maps up.
    let nearest = scaled.round().clamp(0.0, 255.0) as u32;
    if level_to_component(nearest) == component {
        return nearest;
    }
    scaled.floor().clamp(0.0, 255.0) as u32
}

fn level_to_component(level: u32) -> f32 {
    (level & 0xFF) as f32 / 255.0
}

/// Packs a normalized RGB triple into `(r << 16) | (g << 8) | b`.
///
/// Components outside `[0, 1]` saturate to the nearest level instead of
/// bleeding into the neighbouring channel.
pub fn pack_rgb(rgb: [f32; 3]) -> u32 {
    let [r, g, b] = rgb.map(component_to_level);
    (r << 16) | (g << 8) | b
}

/// Splits a packed 24-bit value into normalized RGB components.
pub fn unpack_rgb(packed: u32) -> [f32; 3] {
    [
        level_to_component(packed >> 16),
        level_to_component(packed >> 8),
        level_to_component(packed),
    ]
}

/// Parses `#rrggbb`, `0xrrggbb`, or bare `rrggbb` into a packed color.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Formats a packed color as `#rrggbb`.
pub fn format_hex_color(packed: u32) -> String {
    format!("#{:06x}", packed & MAX_PACKED)
}
