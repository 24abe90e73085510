use rand_core::RngCore;

/// A uniform-sampling seam the engine draws all randomness through.
///
/// Blanket-implemented for anything that implements [`RngCore`], so
/// callers can plug in any RNG; this crate's own tests pin a seed with
/// `rand::rngs::StdRng::seed_from_u64` for reproducibility.
pub trait UniformSource {
    /// A uniform sample in `0..bound`. `bound` must be non-zero.
    fn sample_uniform(&mut self, bound: usize) -> usize;
}

impl<R: RngCore + ?Sized> UniformSource for R {
    fn sample_uniform(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "sample_uniform bound must be non-zero");
        (self.next_u32() as u64 * bound as u64 >> 32) as usize
    }
}

/// The Knuth shuffle, based on the original [Fisher-Yates method](https://en.wikipedia.org/wiki/Fisher%E2%80%93Yates_shuffle).
pub(crate) fn shuffle_slice<T>(list: &mut [T], rng: &mut impl UniformSource) {
    if list.is_empty() {
        return;
    }
    let mut current_index = list.len() - 1;
    while current_index > 0 {
        let random_index = rng.sample_uniform(current_index + 1);
        list.swap(current_index, random_index);
        current_index -= 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shuffle_empty_is_noop() {
        let mut list: Vec<u8> = vec![];
        shuffle_slice(&mut list, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn shuffle_single_is_noop() {
        let mut list = vec![7u8];
        shuffle_slice(&mut list, &mut StdRng::seed_from_u64(0));
        assert_eq!(list, vec![7]);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_fixed_seed() {
        let mut a: Vec<u8> = vec![0, 1, 2, 3, 4];
        let mut b = a.clone();
        shuffle_slice(&mut a, &mut StdRng::seed_from_u64(42));
        shuffle_slice(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut list: Vec<u8> = (0..10).collect();
        let original = list.clone();
        shuffle_slice(&mut list, &mut StdRng::seed_from_u64(7));
        let mut sorted = list.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);
    }
}
