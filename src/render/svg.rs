use std::fmt::Write as _;

use crate::{
    eval::display::{DisplayList, Primitive, Shape, polyline_length},
    foundation::color::Color,
    foundation::core::Point,
};

/// Family list handed to `usvg`; the first installed one wins.
pub const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, sans-serif";

/// Write `list` as a self-contained SVG document sized to its canvas.
pub fn to_svg_document(list: &DisplayList) -> String {
    let (w, h) = (list.canvas.width, list.canvas.height);
    let mut out = String::with_capacity(256 + list.items.len() * 160);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" {}/>"#,
        fill_attrs(list.background, 1.0)
    );
    for p in &list.items {
        write_primitive(&mut out, p);
    }
    out.push_str("</svg>\n");
    out
}

fn write_primitive(out: &mut String, p: &Primitive) {
    match &p.shape {
        Shape::Text {
            center,
            text,
            font_size,
        } => {
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" text-anchor="middle" dominant-baseline="central" {}>{}</text>"#,
                num(center.x),
                num(center.y),
                num(*font_size),
                fill_attrs(p.color, p.opacity),
                escape_xml(text)
            );
        }
        Shape::Stroke {
            points,
            width,
            closed,
        } => {
            let tag = if *closed { "polygon" } else { "polyline" };
            let mut dash = String::new();
            if p.reveal < 1.0 {
                let len = polyline_length(points, *closed);
                let _ = write!(
                    dash,
                    r#" stroke-dasharray="{} {}" stroke-dashoffset="{}""#,
                    num(len),
                    num(len),
                    num(len * (1.0 - p.reveal.clamp(0.0, 1.0)))
                );
            }
            let alpha = (p.color.a * p.opacity).clamp(0.0, 1.0);
            let _ = writeln!(
                out,
                r#"<{tag} points="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"{dash}/>"#,
                points_attr(points),
                p.color.to_hex_rgb(),
                num(alpha),
                num(*width)
            );
        }
        Shape::Fill { points } => {
            let _ = writeln!(
                out,
                r#"<polygon points="{}" {}/>"#,
                points_attr(points),
                fill_attrs(p.color, p.opacity)
            );
        }
    }
}

fn fill_attrs(c: Color, opacity: f64) -> String {
    format!(
        r#"fill="{}" fill-opacity="{}""#,
        c.to_hex_rgb(),
        num((c.a * opacity).clamp(0.0, 1.0))
    )
}

fn points_attr(points: &[Point]) -> String {
    let mut s = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{},{}", num(p.x), num(p.y));
    }
    s
}

/// Fixed 3-decimal formatting without trailing zeros, so equal geometry prints equally.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
