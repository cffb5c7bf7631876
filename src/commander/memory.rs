//! Sighting memory: where hostile units were last seen
//!
//! A plain FIFO of positions. `sample` drops a random-length prefix so that
//! successive attack targets drift toward newer sightings without always
//! picking the same spot, and `decimate` keeps only the newest tenth.

use rand::Rng;
use std::collections::VecDeque;

use crate::core::types::Vec2;

#[derive(Debug, Clone, Default)]
pub struct SightingMemory {
    entries: VecDeque<Vec2>,
}

impl SightingMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sighting (first-visibility events only)
    pub fn record(&mut self, position: Vec2) {
        self.entries.push_back(position);
    }

    /// Draw an attack target
    ///
    /// Empty memory yields `None`. A single entry is returned and kept.
    /// Otherwise a uniform index is drawn, every entry before it is
    /// discarded, and the new front is returned (and kept).
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Vec2> {
        match self.entries.len() {
            0 => None,
            1 => self.entries.front().copied(),
            len => {
                let index = rng.gen_range(0..len);
                self.entries.drain(..index);
                self.entries.front().copied()
            }
        }
    }

    /// Remove the oldest `floor(0.9 * len)` entries
    pub fn decimate(&mut self) -> usize {
        let remove = self.entries.len() * 9 / 10;
        self.entries.drain(..remove);
        remove
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn filled(n: usize) -> SightingMemory {
        let mut memory = SightingMemory::new();
        for i in 0..n {
            memory.record(Vec2::new(i as f32, 0.0));
        }
        memory
    }

    #[test]
    fn test_sample_empty_is_none() {
        let mut memory = SightingMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(memory.sample(&mut rng).is_none());
    }

    #[test]
    fn test_sample_single_entry_is_kept() {
        let mut memory = filled(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(memory.sample(&mut rng), Some(Vec2::new(0.0, 0.0)));
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.sample(&mut rng), Some(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_sample_drops_prefix_and_keeps_front() {
        let mut memory = filled(10);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let picked = memory.sample(&mut rng).expect("non-empty memory");

        // The picked entry is now the front, older ones are gone
        assert_eq!(memory.iter().next(), Some(&picked));
        assert_eq!(memory.len(), 10 - picked.x as usize);
    }

    #[test]
    fn test_sample_is_reproducible_with_seed() {
        let mut a = filled(20);
        let mut b = filled(20);
        let mut rng_a = ChaCha8Rng::seed_from_u64(5);
        let mut rng_b = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..5 {
            assert_eq!(a.sample(&mut rng_a), b.sample(&mut rng_b));
        }
    }

    #[test]
    fn test_decimate_keeps_newest_tenth() {
        let mut memory = filled(25);
        assert_eq!(memory.decimate(), 22);
        let kept: Vec<f32> = memory.iter().map(|p| p.x).collect();
        assert_eq!(kept, vec![22.0, 23.0, 24.0]);
    }

    #[test]
    fn test_decimate_small_queue_keeps_everything() {
        let mut memory = filled(1);
        assert_eq!(memory.decimate(), 0);
        assert_eq!(memory.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_decimate_leaves_most_recent(n in 0usize..500) {
            let mut memory = filled(n);
            memory.decimate();
            let removed = (n as f64 * 0.9).floor() as usize;
            prop_assert_eq!(memory.len(), n - removed);
            for (offset, p) in memory.iter().enumerate() {
                prop_assert_eq!(p.x as usize, removed + offset);
            }
        }

        #[test]
        fn prop_sample_returns_front(n in 1usize..200, seed in any::<u64>()) {
            let mut memory = filled(n);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let picked = memory.sample(&mut rng);
            prop_assert_eq!(picked, memory.iter().next().copied());
            prop_assert!(!memory.is_empty());
        }
    }
}
