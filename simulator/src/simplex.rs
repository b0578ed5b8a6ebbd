use rand::Rng;

/// Uniform draw from the (k-1)-simplex, as a random partition of the unit interval into `k` parts.
/// It sorts k-1 uniform cut points together with 0 and 1, then takes the gaps.
pub fn sample_simplex<R: Rng>(rng: &mut R, k: usize) -> Vec<f64> {
    assert!(k > 0, "simplex of zero parts");
    let mut cuts: Vec<f64> = std::iter::once(0f64)
        .chain((1..k).map(|_| rng.gen::<f64>()))
        .chain(std::iter::once(1f64))
        .collect();
    cuts.sort_by(|x, y| x.total_cmp(y));
    cuts.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    #[test]
    fn single_part() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(sample_simplex(&mut rng, 1), vec![1f64]);
    }
    #[test]
    fn sums_to_one() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4230);
        for k in 1..20 {
            for _ in 0..200 {
                let draw = sample_simplex(&mut rng, k);
                assert_eq!(draw.len(), k);
                assert!(draw.iter().all(|&x| x >= 0f64), "{:?}", draw);
                let sum: f64 = draw.iter().sum();
                assert!((sum - 1f64).abs() < 1e-9, "{}", sum);
            }
        }
    }
    #[test]
    fn mean_is_uniform() {
        // Each coordinate of a uniform draw from the simplex has mean 1/k.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(24);
        let (k, n) = (4, 20_000);
        let mut sums = vec![0f64; k];
        for _ in 0..n {
            for (s, x) in sums.iter_mut().zip(sample_simplex(&mut rng, k)) {
                *s += x;
            }
        }
        for s in sums {
            assert!((s / n as f64 - 0.25).abs() < 0.01, "{}", s / n as f64);
        }
    }
    #[test]
    #[should_panic]
    fn zero_parts() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        sample_simplex(&mut rng, 0);
    }
}
