use rand::Rng;

/// Fisher-Yates, in place. Every permutation is equally likely given a
/// uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashMap;

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut items = vec!["a", "b", "c", "d"];
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_shuffle_short_slices() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        let mut one = vec![1];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![1]);
    }

    #[test]
    fn test_every_position_is_reachable() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut first_counts: HashMap<u8, usize> = HashMap::new();
        for _ in 0..4000 {
            let mut items = [0u8, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            *first_counts.entry(items[0]).or_default() += 1;
        }
        assert_eq!(first_counts.len(), 4);
        for count in first_counts.values() {
            // Expect ~1000 each
            assert!(*count > 800 && *count < 1200, "skewed: {first_counts:?}");
        }
    }
}
