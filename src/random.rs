//! Weighted draws for the seeding strategies.
use ndarray::{ArrayBase, Data, Ix1};
use ndarray_rand::rand::distributions::{Distribution, WeightedError, WeightedIndex};
use ndarray_rand::rand::Rng;

use crate::Float;

/// Draws an index with probability proportional to its weight.
///
/// Returns `None` if every weight is zero or if a weight is negative or not finite. Indices
/// with a zero weight are never returned.
pub(crate) fn weighted_index<F: Float>(
    weights: &ArrayBase<impl Data<Elem = F>, Ix1>,
    rng: &mut impl Rng,
) -> Option<usize> {
    if weights.iter().any(|w| !w.is_finite()) {
        return None;
    }
    match WeightedIndex::new(weights.iter()) {
        Ok(distribution) => Some(distribution.sample(rng)),
        Err(WeightedError::AllWeightsZero) => None,
        Err(err) => {
            log::warn!("cannot draw from seeding weights: {}", err);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_rand::rand::{Error, RngCore, SeedableRng};
    use rand_isaac::Isaac64Rng;
    use std::collections::VecDeque;

    /// Replays a fixed sequence of 64 bit words, for tests which need exact control over
    /// seeding. Build the words with [`index`] and [`unit`].
    #[derive(Clone, Debug, Default)]
    pub(crate) struct Scripted {
        words: VecDeque<u64>,
    }

    impl Scripted {
        pub(crate) fn new(words: &[u64]) -> Self {
            Scripted {
                words: words.iter().copied().collect(),
            }
        }
    }

    /// Word which makes `gen_range(0..upper)` return `idx`
    pub(crate) fn index(idx: usize, upper: usize) -> u64 {
        assert!(idx < upper);
        let upper = upper as u128;
        ((((idx as u128) << 64) + upper - 1) / upper) as u64
    }

    /// Word which makes a uniform `f64` draw in `[0, 1)` return `unit`
    pub(crate) fn unit(unit: f64) -> u64 {
        assert!((0.0..1.0).contains(&unit));
        ((unit * (1u64 << 52) as f64) as u64) << 12
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.words.pop_front().expect("script ran out of words")
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn scripted_words_replay_indices_and_units() {
        let mut rng = Scripted::new(&[index(3, 4), index(0, 4), unit(0.5), unit(0.02)]);
        assert_eq!(rng.gen_range(0..4usize), 3);
        assert_eq!(rng.gen_range(0..4usize), 0);
        assert_eq!(rng.gen::<f64>(), 0.5);
        assert!((rng.gen::<f64>() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn weighted_index_follows_cumulative_weights() {
        let weights = array![0., 1., 12., 14.25];
        let mut rng = Scripted::new(&[unit(0.0), unit(0.02), unit(0.5), unit(0.999)]);
        assert_eq!(weighted_index(&weights, &mut rng), Some(1));
        assert_eq!(weighted_index(&weights, &mut rng), Some(1));
        assert_eq!(weighted_index(&weights, &mut rng), Some(3));
        assert_eq!(weighted_index(&weights, &mut rng), Some(3));
    }

    #[test]
    fn weighted_index_rejects_degenerate_weights() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        assert_eq!(weighted_index(&array![0., 0., 0.], &mut rng), None);
        assert_eq!(weighted_index(&array![1., f64::INFINITY], &mut rng), None);
        assert_eq!(weighted_index(&array![1., f64::NAN], &mut rng), None);
        assert_eq!(weighted_index(&array![1., -1.], &mut rng), None);
    }

    #[test]
    fn weighted_index_never_returns_zero_weights() {
        let mut rng = Isaac64Rng::seed_from_u64(7);
        let weights = array![0., 3., 0., 1., 0.];
        for _ in 0..200 {
            let idx = weighted_index(&weights, &mut rng).unwrap();
            assert!(idx == 1 || idx == 3);
        }
    }
}
