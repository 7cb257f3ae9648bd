use xxhash_rust::xxh3::Xxh3;

use crate::{
    eval::display::{DisplayList, Primitive, Shape},
    foundation::color::Color,
    foundation::core::Point,
};

const XXH3_SEED: u64 = 0x5c3e_91d2_a7f0_4b18;

/// Stable per-frame fingerprint used by static-frame elision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Fingerprint a display list.
///
/// The frame index is not part of the input, so identical frames at different times collide on
/// purpose.
pub fn fingerprint_display_list(list: &DisplayList) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(list.canvas.width);
    h.write_u32(list.canvas.height);
    write_color(&mut h, list.background);
    h.write_u32(list.items.len() as u32);
    for p in &list.items {
        write_primitive(&mut h, p);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_color(h: &mut StableHasher, c: Color) {
    for v in [c.r, c.g, c.b, c.a] {
        h.write_f64(v);
    }
}

fn write_points(h: &mut StableHasher, points: &[Point]) {
    h.write_u32(points.len() as u32);
    for p in points {
        h.write_f64(p.x);
        h.write_f64(p.y);
    }
}

fn write_primitive(h: &mut StableHasher, p: &Primitive) {
    // Node ids only label primitives; they do not change pixels.
    h.write_u8(p.role as u8);
    h.write_u8(p.shape.kind_tag());
    match &p.shape {
        Shape::Text {
            center,
            text,
            font_size,
        } => {
            h.write_f64(center.x);
            h.write_f64(center.y);
            h.write_str(text);
            h.write_f64(*font_size);
        }
        Shape::Stroke {
            points,
            width,
            closed,
        } => {
            write_points(h, points);
            h.write_f64(*width);
            h.write_bool(*closed);
        }
        Shape::Fill { points } => write_points(h, points),
    }
    write_color(h, p.color);
    h.write_f64(p.opacity);
    h.write_f64(p.reveal);
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
