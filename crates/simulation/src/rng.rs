//! Injectable randomness for the simulation.
//!
//! Every random decision in the engine (spawn-count rounding, spawn column,
//! diagonal tie-break, particle color jitter) goes through [`SimRng`], so a
//! driver can wire a real entropy source while tests pass a seeded or fixed
//! sequence.

/// Random source consumed by the engine.
pub trait SimRng {
    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool;

    /// Uniform f32 in [0.0, 1.0).
    fn unit_f32(&mut self) -> f32;

    /// Uniform integer in `[lo, hi]`. Returns `lo` when `hi < lo`.
    fn pick_inclusive(&mut self, lo: i32, hi: i32) -> i32;

    /// True with the given probability.
    fn chance(&mut self, probability: f32) -> bool {
        self.unit_f32() < probability
    }

    /// Uniform f32 in `[lo, hi)`.
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit_f32()
    }
}

impl<T: ?Sized + rand::Rng> SimRng for T {
    fn coin_flip(&mut self) -> bool {
        rand::Rng::gen(self)
    }

    fn unit_f32(&mut self) -> f32 {
        rand::Rng::gen(self)
    }

    fn pick_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        rand::Rng::gen_range(self, lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn coin_flip_produces_both_sides() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);
        let flips: Vec<bool> = (0..100).map(|_| rng.coin_flip()).collect();
        assert!(flips.iter().any(|&f| f));
        assert!(flips.iter().any(|&f| !f));
    }

    #[test]
    fn unit_f32_stays_in_range() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);
        for _ in 0..1000 {
            let v = rng.unit_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn chance_extremes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for _ in 0..100 {
            assert!(rng.chance(1.0));
            assert!(!rng.chance(0.0));
        }
    }

    #[test]
    fn pick_inclusive_covers_both_ends() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);
        let picks: Vec<i32> = (0..500).map(|_| rng.pick_inclusive(3, 5)).collect();
        assert!(picks.iter().all(|p| (3..=5).contains(p)));
        assert!(picks.contains(&3));
        assert!(picks.contains(&5));
    }

    #[test]
    fn pick_inclusive_degenerate_range_returns_lo() {
        let mut rng = StepRng::new(0, 1);
        assert_eq!(rng.pick_inclusive(4, 4), 4);
        assert_eq!(rng.pick_inclusive(4, 2), 4);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xoshiro256StarStar::seed_from_u64(42);
        let mut b = Xoshiro256StarStar::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(a.coin_flip(), b.coin_flip());
            assert_eq!(a.unit_f32().to_bits(), b.unit_f32().to_bits());
        }
    }
}
