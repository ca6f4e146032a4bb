//! 256-color palette resolution.
//!
//! Maps xterm color indexes to hex strings: 16 base entries, the 6×6×6
//! color cube, and the 24-step grayscale ramp. Individual indexes can be
//! overridden at construction; unlisted indexes keep the computed default.

use std::collections::HashMap;

/// The 16 base entries (8 standard + 8 bright), in the short uppercase form
/// classic terminal-to-HTML converters emit.
const BASE: [&str; 16] = [
    "#000", "#A00", "#0A0", "#A50", "#00A", "#A0A", "#0AA", "#AAA",
    "#555", "#F55", "#5F5", "#FF5", "#55F", "#F5F", "#5FF", "#FFF",
];

/// Index → hex-color table, computed once per converter and immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build the default table, then apply `overrides` verbatim.
    ///
    /// Override values are not validated: a non-hex string lands in the
    /// emitted `style` attribute exactly as given.
    #[must_use]
    pub fn new(overrides: &HashMap<u8, String>) -> Self {
        let mut colors: Vec<String> = Vec::with_capacity(256);
        colors.extend(BASE.iter().map(|s| (*s).to_string()));

        // 16–231: the 6×6×6 cube. A zero component stays 0; everything
        // else maps to 55 + 40·component.
        let channel = |c: u16| if c == 0 { 0 } else { 55 + 40 * c };
        for r in 0..6u16 {
            for g in 0..6u16 {
                for b in 0..6u16 {
                    colors.push(format!(
                        "#{:02x}{:02x}{:02x}",
                        channel(r),
                        channel(g),
                        channel(b)
                    ));
                }
            }
        }

        // 232–255: the grayscale ramp, luminance 8 + 10·step.
        for step in 0..24u16 {
            let l = 8 + 10 * step;
            colors.push(format!("#{l:02x}{l:02x}{l:02x}"));
        }

        for (&index, hex) in overrides {
            colors[usize::from(index)] = hex.clone();
        }

        Self { colors }
    }

    /// The hex color (with leading `#`) for a palette index.
    #[must_use]
    pub fn hex(&self, index: u8) -> &str {
        &self.colors[usize::from(index)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

/// Format direct 24-bit channel values as a hex color.
///
/// Channels are not clamped: a value above 255 produces more than two hex
/// digits. Broken terminal output renders best-effort rather than erroring
/// out.
#[must_use]
pub fn rgb_hex(channels: [u16; 3]) -> String {
    let [r, g, b] = channels;
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_entries_match_the_classic_palette() {
        let palette = Palette::default();
        assert_eq!(palette.hex(0), "#000");
        assert_eq!(palette.hex(1), "#A00");
        assert_eq!(palette.hex(7), "#AAA");
        assert_eq!(palette.hex(8), "#555");
        assert_eq!(palette.hex(12), "#55F");
        assert_eq!(palette.hex(15), "#FFF");
    }

    #[test]
    fn cube_corners() {
        let palette = Palette::default();
        // 16 = (0,0,0), 196 = pure red, 21 = pure blue, 231 = white.
        assert_eq!(palette.hex(16), "#000000");
        assert_eq!(palette.hex(196), "#ff0000");
        assert_eq!(palette.hex(21), "#0000ff");
        assert_eq!(palette.hex(231), "#ffffff");
    }

    #[test]
    fn cube_channel_formula() {
        let palette = Palette::default();
        // 110 = 16 + 36·2 + 6·3 + 4 → (135, 175, 215).
        assert_eq!(palette.hex(110), "#87afd7");
    }

    #[test]
    fn grayscale_ramp_endpoints() {
        let palette = Palette::default();
        assert_eq!(palette.hex(232), "#080808");
        assert_eq!(palette.hex(255), "#eeeeee");
    }

    #[test]
    fn override_is_index_local() {
        let mut overrides = HashMap::new();
        overrides.insert(1u8, "#00A".to_string());
        let palette = Palette::new(&overrides);
        assert_eq!(palette.hex(1), "#00A");
        // Neighbors keep their computed defaults.
        assert_eq!(palette.hex(0), "#000");
        assert_eq!(palette.hex(2), "#0A0");
        assert_eq!(palette.hex(196), "#ff0000");
    }

    #[test]
    fn override_value_is_not_validated() {
        let mut overrides = HashMap::new();
        overrides.insert(3u8, "tomato".to_string());
        let palette = Palette::new(&overrides);
        assert_eq!(palette.hex(3), "tomato");
    }

    #[test]
    fn rgb_hex_formats_two_digits_per_channel() {
        assert_eq!(rgb_hex([210, 60, 114]), "#d23c72");
        assert_eq!(rgb_hex([0, 0, 0]), "#000000");
    }

    #[test]
    fn rgb_hex_out_of_range_goes_wide() {
        // The documented limitation: no clamping, so 300 formats as three
        // hex digits.
        assert_eq!(rgb_hex([300, 0, 0]), "#12c0000");
    }
}
