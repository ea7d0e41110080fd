//! Hex color parsing and light/dark contrast classification.
//!
//! Widgets carry their own background and text colors which do not follow the
//! app theme. In dark mode a light custom background needs a dimming overlay
//! to stay readable, and editor swatches need a readable label color; both
//! decisions go through [`is_light`].

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Perceived brightness above which a color counts as light (0..=255 scale).
pub const LIGHT_BRIGHTNESS_THRESHOLD: f64 = 180.0;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional) into RGB.
///
/// Shorthand digits are doubled (`#abc` is `#aabbcc`). The alpha channel of
/// the eight-digit form is ignored. Returns `None` for anything else.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 | 8 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            if hex.len() == 8 {
                channel(6)?;
            }
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Perceived brightness `(299R + 587G + 114B) / 1000`.
pub fn brightness(r: u8, g: u8, b: u8) -> f64 {
    (f64::from(r) * 299.0 + f64::from(g) * 587.0 + f64::from(b) * 114.0) / 1000.0
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Whether `color` is visually light.
///
/// Unparseable colors are never light.
pub fn is_light(color: &str) -> bool {
    parse_hex(color)
        .map(|(r, g, b)| brightness(r, g, b) > LIGHT_BRIGHTNESS_THRESHOLD)
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
