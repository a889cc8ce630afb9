use eframe::egui::Color32;
use palette::Srgb;

use crate::error::{PlotError, PlotResult};

// ---------------------------------------------------------------------------
// Default colour cycle
// ---------------------------------------------------------------------------

/// matplotlib's default `tab10` property cycle.
const TAB10: [(&str, [u8; 3]); 10] = [
    ("blue", [0x1f, 0x77, 0xb4]),
    ("orange", [0xff, 0x7f, 0x0e]),
    ("green", [0x2c, 0xa0, 0x2c]),
    ("red", [0xd6, 0x27, 0x28]),
    ("purple", [0x94, 0x67, 0xbd]),
    ("brown", [0x8c, 0x56, 0x4b]),
    ("pink", [0xe3, 0x77, 0xc2]),
    ("gray", [0x7f, 0x7f, 0x7f]),
    ("olive", [0xbc, 0xbd, 0x22]),
    ("cyan", [0x17, 0xbe, 0xcf]),
];

/// Colour for the `i`-th series that has no explicit colour.
pub fn default_cycle(i: usize) -> Color32 {
    let [r, g, b] = TAB10[i % TAB10.len()].1;
    Color32::from_rgb(r, g, b)
}

// ---------------------------------------------------------------------------
// Colour parsing: user string → Color32
// ---------------------------------------------------------------------------

/// Parse a colour the way a matplotlib user would write it.
///
/// Accepted forms:
/// * single-letter codes `r g b c m y k w`
/// * `tab:` names of the default cycle (`tab:orange`)
/// * CSS / SVG names (`red`, `steelblue`, `darkgreen`)
/// * default-cycle references `C0` … `C9`
/// * hex `#rgb` / `#rrggbb` / `#rrggbbaa`
/// * a grey level as a number string between `0` and `1` (`"0.5"`)
pub fn parse_color(text: &str) -> PlotResult<Color32> {
    let name = text.trim().to_ascii_lowercase();

    if let Some(c) = short_code(&name) {
        return Ok(c);
    }

    if let Some(n) = name.strip_prefix('c').and_then(|n| n.parse::<usize>().ok()) {
        return Ok(default_cycle(n));
    }

    if let Some(tab) = name.strip_prefix("tab:") {
        let tab = if tab == "grey" { "gray" } else { tab };
        if let Some((_, [r, g, b])) = TAB10.iter().find(|(n, _)| *n == tab) {
            return Ok(Color32::from_rgb(*r, *g, *b));
        }
    }

    if let Some(rgb) = palette::named::from_str(&name) {
        return Ok(to_color32(rgb));
    }

    if name.starts_with('#') {
        if let Ok(rgb) = name.parse::<Srgb<u8>>() {
            return Ok(to_color32(rgb));
        }
        if name.len() == 9 && name.is_char_boundary(7) {
            let (rgb, alpha) = name.split_at(7);
            if let (Ok(rgb), Ok(a)) = (rgb.parse::<Srgb<u8>>(), u8::from_str_radix(alpha, 16)) {
                return Ok(Color32::from_rgba_unmultiplied(rgb.red, rgb.green, rgb.blue, a));
            }
        }
    }

    if let Ok(level) = name.parse::<f32>() {
        if (0.0..=1.0).contains(&level) {
            let v = (level * 255.0).round() as u8;
            return Ok(Color32::from_rgb(v, v, v));
        }
    }

    Err(PlotError::UnknownColor(text.to_string()))
}

fn short_code(name: &str) -> Option<Color32> {
    let rgb = match name {
        "r" => [255, 0, 0],
        "g" => [0, 128, 0],
        "b" => [0, 0, 255],
        "c" => [0, 191, 191],
        "m" => [191, 0, 191],
        "y" => [191, 191, 0],
        "k" => [0, 0, 0],
        "w" => [255, 255, 255],
        _ => return None,
    };
    Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
}

fn to_color32(rgb: Srgb<u8>) -> Color32 {
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_names_and_hex() {
        assert_eq!(parse_color("red").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_color(" Blue ").unwrap(), Color32::from_rgb(0, 0, 255));
        assert_eq!(
            parse_color("#1f77b4").unwrap(),
            Color32::from_rgb(0x1f, 0x77, 0xb4)
        );
    }

    #[test]
    fn matplotlib_shorthands() {
        assert_eq!(parse_color("k").unwrap(), Color32::from_rgb(0, 0, 0));
        assert_eq!(parse_color("tab:orange").unwrap(), default_cycle(1));
        assert_eq!(parse_color("0.5").unwrap(), Color32::from_rgb(128, 128, 128));
    }

    #[test]
    fn cycle_references_and_hex_alpha() {
        assert_eq!(parse_color("C0").unwrap(), default_cycle(0));
        assert_eq!(parse_color("C3").unwrap(), Color32::from_rgb(0xd6, 0x27, 0x28));
        assert_eq!(parse_color("C12").unwrap(), default_cycle(2));
        assert_eq!(
            parse_color("#ff000080").unwrap(),
            Color32::from_rgba_unmultiplied(255, 0, 0, 0x80)
        );
        assert_eq!(parse_color("cyan").unwrap(), Color32::from_rgb(0, 255, 255));
        assert!(parse_color("#ff0000zz").is_err());
    }

    #[test]
    fn unknown_colors_are_errors() {
        let err = parse_color("blurple").unwrap_err();
        assert_eq!(err.to_string(), "Unknown color 'blurple'");
        assert!(parse_color("1.5").is_err());
    }

    #[test]
    fn default_cycle_wraps() {
        assert_eq!(default_cycle(0), default_cycle(10));
        assert_ne!(default_cycle(0), default_cycle(1));
    }
}
