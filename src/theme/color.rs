//! Small hex/HSL color helpers used to derive theme colors

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    let (r, g, b) = match hex.len() {
        3 => (
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        ),
        6 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ),
        _ => return None,
    };
    Some(Rgb {
        r: r as f64 / 255.0,
        g: g as f64 / 255.0,
        b: b as f64 / 255.0,
    })
}

fn to_hex(rgb: Rgb) -> String {
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb.r),
        channel(rgb.g),
        channel(rgb.b)
    )
}

fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == rgb.r {
        (rgb.g - rgb.b) / d + if rgb.g < rgb.b { 6.0 } else { 0.0 }
    } else if max == rgb.g {
        (rgb.b - rgb.r) / d + 2.0
    } else {
        (rgb.r - rgb.g) / d + 4.0
    };
    Hsl { h: h / 6.0, s, l }
}

fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    if hsl.s == 0.0 {
        return Rgb {
            r: hsl.l,
            g: hsl.l,
            b: hsl.l,
        };
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if hsl.l < 0.5 {
        hsl.l * (1.0 + hsl.s)
    } else {
        hsl.l + hsl.s - hsl.l * hsl.s
    };
    let p = 2.0 * hsl.l - q;
    Rgb {
        r: hue_to_rgb(p, q, hsl.h + 1.0 / 3.0),
        g: hue_to_rgb(p, q, hsl.h),
        b: hue_to_rgb(p, q, hsl.h - 1.0 / 3.0),
    }
}

fn shift_lightness(color: &str, delta_pct: f64) -> String {
    match parse_hex(color) {
        Some(rgb) => {
            let mut hsl = rgb_to_hsl(rgb);
            hsl.l = (hsl.l + delta_pct / 100.0).clamp(0.0, 1.0);
            to_hex(hsl_to_rgb(hsl))
        }
        // Non-hex colors (named, rgba(), url()) are returned unchanged
        None => color.to_string(),
    }
}

/// Raise HSL lightness by `amount` percentage points
pub fn lighten(color: &str, amount: f64) -> String {
    shift_lightness(color, amount)
}

/// Lower HSL lightness by `amount` percentage points
pub fn darken(color: &str, amount: f64) -> String {
    shift_lightness(color, -amount)
}

/// Whether the string is a `#rgb` or `#rrggbb` color
pub fn is_hex_color(color: &str) -> bool {
    parse_hex(color).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_hex() {
        assert_eq!(parse_hex("#fff"), parse_hex("#ffffff"));
        assert!(parse_hex("#12345").is_none());
        assert!(parse_hex("red").is_none());
    }

    #[test]
    fn test_non_ascii_hex_is_rejected() {
        assert!(parse_hex("#é1").is_none());
        assert!(parse_hex("#aéaaa").is_none());
        assert!(!is_hex_color("#ééé"));
        assert!(!is_hex_color("#+ff"));
        assert_eq!(lighten("#aéaaa", 10.0), "#aéaaa");
        assert_eq!(darken("#é1", 10.0), "#é1");
    }

    #[test]
    fn test_round_trip_through_hsl() {
        for hex in ["#1783ff", "#00c9c9", "#f0884d", "#000000", "#ffffff"] {
            let rgb = parse_hex(hex).unwrap();
            assert_eq!(to_hex(hsl_to_rgb(rgb_to_hsl(rgb))), hex);
        }
    }

    #[test]
    fn test_lighten_and_darken() {
        assert_eq!(lighten("#000000", 50.0), "#808080");
        assert_eq!(darken("#ffffff", 100.0), "#000000");
        assert_eq!(lighten("#ffffff", 10.0), "#ffffff");
    }

    #[test]
    fn test_non_hex_passthrough() {
        assert_eq!(lighten("rgba(0,0,0,0.1)", 10.0), "rgba(0,0,0,0.1)");
        assert!(!is_hex_color("url(#g)"));
        assert!(is_hex_color("#abc"));
    }
}
