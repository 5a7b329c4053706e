//! Lattice value noise and fractal (fBm) summation
//!
//! Built on [`crate::math::hash`] rather than a gradient-noise crate so that
//! the generated terrain is a documented, bit-reproducible function of the seed.

use crate::math::hash::hash2_unit;

/// Per-octave seed offset so octaves sample decorrelated lattices
const OCTAVE_SEED_STEP: u32 = 0x632b_e5ab;

#[inline]
fn smoothstep01(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smoothed value noise at `(x, z)` in lattice units, range `[0, 1)`
pub fn value_noise(x: f32, z: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let z0 = z.floor();
    let ix = x0 as i32;
    let iz = z0 as i32;

    let sx = smoothstep01(x - x0);
    let sz = smoothstep01(z - z0);

    let v00 = hash2_unit(ix, iz, seed);
    let v10 = hash2_unit(ix.wrapping_add(1), iz, seed);
    let v01 = hash2_unit(ix, iz.wrapping_add(1), seed);
    let v11 = hash2_unit(ix.wrapping_add(1), iz.wrapping_add(1), seed);

    lerp(lerp(v00, v10, sx), lerp(v01, v11, sx), sz)
}

/// Fractal Brownian motion over [`value_noise`]
#[derive(Clone, Debug)]
pub struct Fbm {
    pub seed: u32,
    pub octaves: u32,
    /// Base frequency in lattice cells per world unit
    pub frequency: f32,
    /// Frequency multiplier between octaves
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves
    pub gain: f32,
}

impl Fbm {
    /// Sample the normalized fractal sum at a world position, range `[0, 1)`
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let mut sum = 0.0;
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;

        for octave in 0..self.octaves {
            let seed = self.seed.wrapping_add(octave.wrapping_mul(OCTAVE_SEED_STEP));
            sum += amplitude * value_noise(x * frequency, z * frequency, seed);
            total += amplitude;
            amplitude *= self.gain;
            frequency *= self.lacunarity;
        }

        if total > 0.0 { sum / total } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::hash::hash2_unit;

    fn fbm(seed: u32) -> Fbm {
        Fbm { seed, octaves: 5, frequency: 1.0 / 90.0, lacunarity: 2.0, gain: 0.5 }
    }

    #[test]
    fn test_value_noise_hits_lattice_values() {
        for (x, z) in [(0, 0), (3, -2), (-7, 11)] {
            let v = value_noise(x as f32, z as f32, 5);
            assert_eq!(v, hash2_unit(x, z, 5));
        }
    }

    #[test]
    fn test_value_noise_range() {
        for i in 0..200 {
            let x = i as f32 * 0.37 - 30.0;
            let z = i as f32 * 0.53 - 40.0;
            let v = value_noise(x, z, 17);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fbm_range_and_determinism() {
        let a = fbm(12345);
        let b = fbm(12345);
        for i in 0..100 {
            let x = i as f32 * 3.1;
            let z = i as f32 * 1.7;
            let va = a.sample(x, z);
            assert!((0.0..1.0).contains(&va));
            assert_eq!(va.to_bits(), b.sample(x, z).to_bits());
        }
    }

    #[test]
    fn test_fbm_zero_octaves() {
        let f = Fbm { octaves: 0, ..fbm(1) };
        assert_eq!(f.sample(10.0, 10.0), 0.0);
    }
}
