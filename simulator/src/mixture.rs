//! Mixture matrices: which clones, in which proportion, are present in each sample.
use crate::error::{Result, SimError};
use crate::simplex::sample_simplex;
use definitions::MixtureMatrix;
use rand::seq::SliceRandom;
use rand::Rng;

/// Each leaf clone should be observed in at least this many samples.
pub const LEAF_SAMPLE_NUM: usize = 2;

/// Generate a `samples` x `clones` mixture matrix.
/// Each sample mixes a uniformly chosen number, between `min_num` and `max_num` inclusive, of distinct clones.
/// `max_num` larger than `clones` is capped at `clones`.
pub fn generate_mixture<R: Rng>(
    rng: &mut R,
    clones: usize,
    samples: usize,
    min_num: usize,
    max_num: usize,
) -> MixtureMatrix {
    let max_num = max_num.min(clones);
    assert!(min_num <= max_num, "mixing {}..={} of {} clones", min_num, max_num, clones);
    let mut mixture = MixtureMatrix::zeros(samples, clones);
    for i in 0..samples {
        let num_mix = rng.gen_range(min_num..=max_num);
        // One more part than needed is drawn and the last one is left unused,
        // so the row sum is strictly below one in general.
        let draw = sample_simplex(rng, num_mix + 1);
        let mut indices: Vec<usize> = (0..clones).collect();
        indices.shuffle(rng);
        let row = mixture.row_mut(i);
        for (&clone, &weight) in indices.iter().zip(draw.iter()).take(num_mix) {
            row[clone] = weight;
        }
    }
    mixture
}

/// Return true if every leaf has a positive weight in at least `min_samples` samples.
pub fn covers_leaves(mixture: &MixtureMatrix, leaves: &[usize], min_samples: usize) -> bool {
    leaves.iter().all(|&leaf| {
        let observed = mixture.iter_rows().filter(|row| 0f64 < row[leaf]).count();
        min_samples <= observed
    })
}

/// The necessary condition for [generate_mixture_with_leaves] to ever succeed:
/// the total number of mixing slots, `max_num * samples`, should be enough to place every leaf [LEAF_SAMPLE_NUM] times.
/// It is not sufficient.
pub fn is_leaf_coverage_feasible(samples: usize, max_num: usize, leaf_num: usize) -> bool {
    LEAF_SAMPLE_NUM * leaf_num <= max_num * samples
}

/// Generate a mixture matrix in which every leaf appears in at least [LEAF_SAMPLE_NUM] samples,
/// by rejection sampling over [generate_mixture].
/// With `max_retries = None` the loop never gives up, and it would not halt on an infeasible configuration.
pub fn generate_mixture_with_leaves<R: Rng>(
    rng: &mut R,
    clones: usize,
    samples: usize,
    min_num: usize,
    max_num: usize,
    leaves: &[usize],
    max_retries: Option<u64>,
) -> Result<MixtureMatrix> {
    if max_num.min(clones) < min_num {
        let message = format!("mixing {}..={} of {} clones", min_num, max_num, clones);
        return Err(SimError::InvalidConfig(message));
    }
    let mut attempts = 0;
    loop {
        let mixture = generate_mixture(rng, clones, samples, min_num, max_num);
        attempts += 1;
        if covers_leaves(&mixture, leaves, LEAF_SAMPLE_NUM) {
            debug!("MIXTURE\t{}\tAttempts", attempts);
            return Ok(mixture);
        }
        trace!("MIXTURE\t{}\tRejected", attempts);
        if max_retries.map_or(false, |max| max <= attempts) {
            return Err(SimError::RetryBudgetExceeded {
                what: "leaf-covering mixture",
                attempts,
            });
        }
    }
}
