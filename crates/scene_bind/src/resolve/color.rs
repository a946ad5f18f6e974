//! Color resolution

use super::{resolve_f32_list, Value, ValueContext};
use crate::foundation::math::Color;
use crate::resource::ResourceValue;

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("lime", 0x00ff00),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("cyan", 0x00ffff),
    ("aqua", 0x00ffff),
    ("magenta", 0xff00ff),
    ("fuchsia", 0xff00ff),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("silver", 0xc0c0c0),
    ("maroon", 0x800000),
    ("olive", 0x808000),
    ("navy", 0x000080),
    ("purple", 0x800080),
    ("teal", 0x008080),
    ("orange", 0xffa500),
    ("pink", 0xffc0cb),
    ("brown", 0xa52a2a),
    ("gold", 0xffd700),
    ("skyblue", 0x87ceeb),
];

/// Resolve a color
///
/// Accepts colors, packed integers, color strings (see [`parse_color`]),
/// lists of three channels (`0..=1`, or `0..=255` when any channel exceeds
/// one) and color resource components.
pub fn resolve_color(
    raw: &Value,
    fallback: Option<Color>,
    required: bool,
    cx: &dyn ValueContext,
) -> Option<Color> {
    let resolved = match raw {
        Value::Color(color) => Some(*color),
        Value::Number(n) if n.is_finite() && *n >= 0.0 => Some(Color::from_hex(*n as u32)),
        Value::Text(text) => parse_color(text, cx),
        Value::List(items) => resolve_f32_list(items.get(..3).unwrap_or(items), 3).map(|rgb| {
            if rgb.iter().any(|c| *c > 1.0) {
                Color::new(rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0)
            } else {
                Color::new(rgb[0], rgb[1], rgb[2])
            }
        }),
        Value::Resource(id) => match cx.resource_value(*id) {
            Some(ResourceValue::Color(color)) => Some(color),
            Some(ResourceValue::Material(material)) => Some(material.color),
            _ => None,
        },
        _ => None,
    };
    resolved
        .or(fallback)
        .or_else(|| required.then_some(Color::WHITE))
}

/// Parse a color string
///
/// Forms: `#rrggbb`, `#rgb`, `0xrrggbb`, `rgb(r, g, b)` with 0–255 or
/// percentage channels, `hsl(h, s%, l%)`, `random`, and a small table of
/// named colors. Unknown strings return `None`.
pub fn parse_color(text: &str, cx: &dyn ValueContext) -> Option<Color> {
    let text = text.trim().to_ascii_lowercase();
    if text == "random" {
        return Some(Color::new(cx.random_unit(), cx.random_unit(), cx.random_unit()));
    }
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex_digits(hex);
    }
    if let Some(hex) = text.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok().map(Color::from_hex);
    }
    if let Some(args) = function_args(&text, "rgb") {
        return parse_rgb_args(&args);
    }
    if let Some(args) = function_args(&text, "hsl") {
        return parse_hsl_args(&args);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == text)
        .map(|(_, hex)| Color::from_hex(*hex))
}

fn parse_hex_digits(hex: &str) -> Option<Color> {
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(Color::from_hex),
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            u32::from_str_radix(&expanded, 16).ok().map(Color::from_hex)
        }
        _ => None,
    }
}

/// Arguments of `name(...)` or `namea(...)`, split on commas or whitespace
fn function_args(text: &str, name: &str) -> Option<Vec<String>> {
    let rest = text.strip_prefix(name)?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let inner = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn parse_channel(part: &str, scale: f32) -> Option<f32> {
    if let Some(percent) = part.strip_suffix('%') {
        percent.parse::<f32>().ok().map(|p| (p / 100.0).clamp(0.0, 1.0))
    } else {
        part.parse::<f32>().ok().map(|v| (v / scale).clamp(0.0, 1.0))
    }
}

fn parse_rgb_args(args: &[String]) -> Option<Color> {
    if args.len() < 3 {
        return None;
    }
    Some(Color::new(
        parse_channel(&args[0], 255.0)?,
        parse_channel(&args[1], 255.0)?,
        parse_channel(&args[2], 255.0)?,
    ))
}

fn parse_hsl_args(args: &[String]) -> Option<Color> {
    if args.len() < 3 {
        return None;
    }
    let hue = args[0].strip_suffix("deg").unwrap_or(&args[0]).parse::<f32>().ok()?;
    Some(Color::from_hsl(
        hue / 360.0,
        parse_channel(&args[1], 1.0)?,
        parse_channel(&args[2], 1.0)?,
    ))
}
