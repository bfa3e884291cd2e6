// Seeded train/test split.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `items` with a fixed seed and hold out `test_fraction` of them.
///
/// The test set size is `ceil(n * test_fraction)`. A fraction of 0.0 gives an
/// empty test set. The same seed and input always produce the same split.
pub fn train_test_split<T: Clone>(
    items: &[T],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>)> {
    if !(0.0..1.0).contains(&test_fraction) {
        anyhow::bail!("test fraction must be in [0, 1), got {test_fraction}");
    }

    let n = items.len();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test >= n && n > 0 {
        anyhow::bail!(
            "test fraction {test_fraction} leaves no training data out of {n} examples"
        );
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..n_test].iter().map(|&i| items[i].clone()).collect();
    let train = indices[n_test..].iter().map(|&i| items[i].clone()).collect();
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let items: Vec<u32> = (0..10).collect();
        let (train, test) = train_test_split(&items, 0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn test_test_size_rounds_up() {
        let items: Vec<u32> = (0..11).collect();
        let (train, test) = train_test_split(&items, 0.2, 42).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn test_split_is_a_partition() {
        let items: Vec<u32> = (0..50).collect();
        let (train, test) = train_test_split(&items, 0.3, 7).unwrap();
        let mut all: Vec<u32> = train.into_iter().chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, items);
    }

    #[test]
    fn test_same_seed_same_split() {
        let items: Vec<u32> = (0..30).collect();
        let a = train_test_split(&items, 0.2, 42).unwrap();
        let b = train_test_split(&items, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_fraction_keeps_everything() {
        let items = vec!["a", "b"];
        let (train, test) = train_test_split(&items, 0.0, 1).unwrap();
        assert_eq!(train.len(), 2);
        assert!(test.is_empty());
    }

    #[test]
    fn test_fraction_out_of_range_fails() {
        let items = vec![1, 2, 3];
        assert!(train_test_split(&items, 1.0, 1).is_err());
        assert!(train_test_split(&items, -0.1, 1).is_err());
    }
}
