/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Linear interpolation that returns `a` at `t == 0` and `b` at `t == 1` exactly.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Locate normalized progress on a polyline of `segments` equal-length segments.
///
/// Returns the segment index and the fractional position inside it. Progress `1.0` lands on
/// the end of the last segment (`local_t == 1.0`) rather than past it.
pub(crate) fn bracket(progress: f64, segments: usize) -> (usize, f64) {
    if segments == 0 {
        return (0, 0.0);
    }
    let scaled = clamp01(progress) * segments as f64;
    let index = (scaled.floor() as usize).min(segments - 1);
    (index, scaled - index as f64)
}

/// SplitMix64; deterministic per seed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
