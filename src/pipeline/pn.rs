use rand::Rng;

/// Generate `length` independent, uniformly random chips in {+1, -1}.
///
/// The caller owns the randomness; the returned sequence must travel with the
/// stego audio because nothing can regenerate it.
pub fn generate_pn<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Vec<i8> {
    (0..length)
        .map(|_| if rng.gen::<bool>() { 1 } else { -1 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pn_is_bipolar() {
        let mut rng = StdRng::seed_from_u64(7);
        let pn = generate_pn(1000, &mut rng);
        assert_eq!(pn.len(), 1000);
        assert!(pn.iter().all(|&c| c == 1 || c == -1));
    }

    #[test]
    fn test_pn_is_roughly_balanced() {
        let mut rng = StdRng::seed_from_u64(42);
        let pn = generate_pn(10_000, &mut rng);
        let sum: i64 = pn.iter().map(|&c| c as i64).sum();
        assert!(sum.abs() < 500, "PN sum {} too far from zero", sum);
    }

    #[test]
    fn test_pn_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_pn(0, &mut rng).is_empty());
    }

    #[test]
    fn test_independent_draws_differ() {
        let mut rng = rand::thread_rng();
        let a = generate_pn(256, &mut rng);
        let b = generate_pn(256, &mut rng);
        assert_ne!(a, b);
    }
}
