// All compositing happens in linear light so overlapping gradient zones
// don't produce muddy edges. powf per channel per pixel is too slow for a
// full-surface pass; these lookup tables replace it.

const LINEAR_STEPS: usize = 4096;

pub struct GammaLut {
    // sRGB byte -> linear intensity in [0,1]
    srgb_to_linear: [f32; 256],
    // linear [0,1] quantized to LINEAR_STEPS -> sRGB byte
    linear_to_srgb: Vec<u8>,
}

impl GammaLut {
    /// Build both tables once; the renderer holds a single instance.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            };
        }

        let mut l2s = vec![0u8; LINEAR_STEPS];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = i as f32 / (LINEAR_STEPS - 1) as f32;
            let s = if l <= 0.003_130_8 {
                12.92 * l
            } else {
                1.055 * l.powf(1.0 / 2.4) - 0.055
            };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * (LINEAR_STEPS - 1) as f32).round() as usize;
        self.linear_to_srgb[idx]
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_byte() {
        let lut = GammaLut::new();
        for v in 0..=255u8 {
            let l = lut.srgb_u8_to_linear(v);
            assert_eq!(lut.linear_to_srgb_u8(l), v, "byte {v} did not round-trip");
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let lut = GammaLut::new();
        assert_eq!(lut.srgb_u8_to_linear(0), 0.0);
        assert!((lut.srgb_u8_to_linear(255) - 1.0).abs() < 1e-6);
        assert_eq!(lut.linear_to_srgb_u8(0.0), 0);
        assert_eq!(lut.linear_to_srgb_u8(1.0), 255);
    }
}
