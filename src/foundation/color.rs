use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color with normalized `0..=1` channels.
///
/// Deserializes from a palette name (`"RED"`, case-insensitive), a hex string (`#RRGGBB` or
/// `#RRGGBBAA`), an `{r,g,b,a}` object, or a `[r,g,b]`/`[r,g,b,a]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Opaque white, the default entry color.
    pub const WHITE: Self = Self::hex_const(0xFFFFFF);
    /// Opaque black, the default background.
    pub const BLACK: Self = Self::hex_const(0x000000);
    /// Palette red.
    pub const RED: Self = Self::hex_const(0xFC6255);
    /// Palette green.
    pub const GREEN: Self = Self::hex_const(0x83C167);
    /// Palette blue.
    pub const BLUE: Self = Self::hex_const(0x58C4DD);
    /// Palette yellow.
    pub const YELLOW: Self = Self::hex_const(0xFFFF00);
    /// Palette orange.
    pub const ORANGE: Self = Self::hex_const(0xFF862F);
    /// Palette purple.
    pub const PURPLE: Self = Self::hex_const(0x9A72AC);
    /// Palette teal.
    pub const TEAL: Self = Self::hex_const(0x5CD0B3);
    /// Palette gold.
    pub const GOLD: Self = Self::hex_const(0xF0AC5F);
    /// Palette pink.
    pub const PINK: Self = Self::hex_const(0xD147BD);
    /// Palette grey.
    pub const GREY: Self = Self::hex_const(0x888888);

    /// Build a color from normalized channels.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    const fn hex_const(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as f64 / 255.0,
            g: ((rgb >> 8) & 0xFF) as f64 / 255.0,
            b: (rgb & 0xFF) as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Look up a palette color by name (case-insensitive, `GRAY` is accepted for `GREY`).
    pub fn named(name: &str) -> Option<Self> {
        let c = match name.trim().to_ascii_uppercase().as_str() {
            "WHITE" => Self::WHITE,
            "BLACK" => Self::BLACK,
            "RED" => Self::RED,
            "GREEN" => Self::GREEN,
            "BLUE" => Self::BLUE,
            "YELLOW" => Self::YELLOW,
            "ORANGE" => Self::ORANGE,
            "PURPLE" => Self::PURPLE,
            "TEAL" => Self::TEAL,
            "GOLD" => Self::GOLD,
            "PINK" => Self::PINK,
            "GREY" | "GRAY" => Self::GREY,
            _ => return None,
        };
        Some(c)
    }

    /// Parse a palette name or hex string.
    pub fn parse(s: &str) -> Result<Self, String> {
        if let Some(c) = Self::named(s) {
            return Ok(c);
        }
        parse_hex(s)
    }

    /// Return the same color with alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: (self.a * opacity).clamp(0.0, 1.0),
            ..self
        }
    }

    /// `#rrggbb` form used for SVG paint attributes (alpha is emitted separately).
    pub fn to_hex_rgb(self) -> String {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        format!(
            "#{:02x}{:02x}{:02x}",
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b)
        )
    }

    /// Straight-alpha RGBA8, used for clear colors and sink backgrounds.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// Channel-wise interpolation in straight-alpha space.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Color::parse(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::rgba(v[0], v[1], v[2], 1.0))
                } else if v.len() == 4 {
                    Ok(Self::rgba(v[0], v[1], v[2], v[3]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err(format!("unknown color \"{s}\""));
    }

    let (r, g, b, a) = match s.len() {
        6 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            (r, g, b, 255)
        }
        8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = hex_byte(&s[6..8])?;
            (r, g, b, a)
        }
        _ => {
            return Err(format!(
                "unknown color \"{s}\" (expected a palette name, #RRGGBB or #RRGGBBAA)"
            ));
        }
    };

    Ok(Color::rgba(
        (r as f64) / 255.0,
        (g as f64) / 255.0,
        (b as f64) / 255.0,
        (a as f64) / 255.0,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
