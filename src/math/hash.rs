//! Deterministic integer hashing for lattice noise and feature placement
//!
//! Every bit operation here is part of the terrain reproducibility contract:
//! a given `(x, z, seed)` must hash to the same value on every platform and
//! in every build. Do not swap this for `std::hash` (SipHash keys and
//! `DefaultHasher` output are not stable across Rust releases).
//!
//! Layout: the seed is spread with the golden-ratio constant, each lattice
//! coordinate is folded in with a Murmur3 block step (multiply, rotate,
//! `h * 5 + 0xe6546b64`), and the result passes through the Murmur3 `fmix32`
//! finalizer. All arithmetic is wrapping `u32`; negative coordinates are
//! reinterpreted as their two's-complement bit pattern.

const SEED_SPREAD: u32 = 0x9e37_79b9;
const MIX_X: u32 = 0x85eb_ca6b;
const MIX_Z: u32 = 0xc2b2_ae35;
const BLOCK_ADD: u32 = 0xe654_6b64;

/// Murmur3 32-bit finalizer
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(MIX_X);
    h ^= h >> 13;
    h = h.wrapping_mul(MIX_Z);
    h ^= h >> 16;
    h
}

/// Hash a 2D lattice coordinate together with a seed
#[inline]
pub fn hash2(x: i32, z: i32, seed: u32) -> u32 {
    let mut h = seed.wrapping_mul(SEED_SPREAD);

    h ^= (x as u32).wrapping_mul(MIX_X);
    h = h.rotate_left(13);
    h = h.wrapping_mul(5).wrapping_add(BLOCK_ADD);

    h ^= (z as u32).wrapping_mul(MIX_Z);
    h = h.rotate_left(17);
    h = h.wrapping_mul(5).wrapping_add(BLOCK_ADD);

    fmix32(h)
}

/// Hash a lattice coordinate to a float in `[0, 1)`
///
/// Uses the top 24 bits so the result is exactly representable in `f32`.
#[inline]
pub fn hash2_unit(x: i32, z: i32, seed: u32) -> f32 {
    (hash2(x, z, seed) >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_values() {
        // Changing any of these breaks replay of previously generated terrain
        assert_eq!(hash2(0, 0, 0), 2_038_543_037);
        assert_eq!(hash2(1, 0, 0), 2_809_774_193);
        assert_eq!(hash2(0, 1, 0), 3_794_372_058);
        assert_eq!(hash2(-1, -1, 42), 601_997_291);
        assert_eq!(hash2(12, -7, 1234), 1_237_844_347);
    }

    #[test]
    fn test_unit_range() {
        for x in -20..20 {
            for z in -20..20 {
                let v = hash2_unit(x, z, 99);
                assert!((0.0..1.0).contains(&v), "out of range at ({}, {}): {}", x, z, v);
            }
        }
    }

    #[test]
    fn test_seed_changes_output() {
        let differs = (0..16).filter(|&x| hash2(x, 3, 1) != hash2(x, 3, 2)).count();
        assert_eq!(differs, 16);
    }

    #[test]
    fn test_axis_asymmetry() {
        // (x, z) and (z, x) must not collide, or the terrain would mirror along the diagonal
        assert_ne!(hash2(3, 8, 7), hash2(8, 3, 7));
    }
}
