use crate::error::Result;
use definitions::{CountMatrix, FrequencyMatrix, GenotypeMatrix, MixtureMatrix, ReadCounts};
use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson};

/// F = 0.5 U B. A heterozygous mutation is carried by one of the two copies, hence the 0.5.
pub fn frequencies(mixture: &MixtureMatrix, genotypes: &GenotypeMatrix) -> FrequencyMatrix {
    assert_eq!(mixture.cols(), genotypes.rows());
    let (samples, mutations) = (mixture.rows(), genotypes.cols());
    let mut freqs = FrequencyMatrix::zeros(samples, mutations);
    for (i, weights) in mixture.iter_rows().enumerate() {
        let row = freqs.row_mut(i);
        for (&w, genotype) in weights.iter().zip(genotypes.iter_rows()) {
            for (f, &b) in row.iter_mut().zip(genotype) {
                *f += w * b as f64;
            }
        }
        row.iter_mut().for_each(|f| *f *= 0.5);
    }
    freqs
}

/// Simulate noisy read counts. The depth of each cell follows Poisson(`coverage`),
/// and the variant count follows Binomial(depth, F).
/// All the depths are drawn before any variant count.
pub fn sample_reads<R: Rng>(
    rng: &mut R,
    coverage: u64,
    mixture: &MixtureMatrix,
    genotypes: &GenotypeMatrix,
) -> Result<ReadCounts> {
    let freqs = frequencies(mixture, genotypes);
    let (samples, mutations) = freqs.shape();
    let poisson = Poisson::new(coverage as f64)?;
    let depths: Vec<u64> = (0..samples * mutations)
        .map(|_| poisson.sample(rng) as u64)
        .collect();
    let mut reference = CountMatrix::zeros(samples, mutations);
    let mut variant = CountMatrix::zeros(samples, mutations);
    for i in 0..samples {
        for j in 0..mutations {
            let depth = depths[i * mutations + j];
            let freq = freqs[(i, j)].clamp(0f64, 1f64);
            let var = Binomial::new(depth, freq)?.sample(rng);
            variant[(i, j)] = var;
            reference[(i, j)] = depth - var;
        }
    }
    Ok(ReadCounts {
        reference,
        variant,
    })
}

/// Noiseless read counts: the depth is exactly `coverage` and the variant count is round(coverage x F).
pub fn sample_perfect_reads(
    coverage: u64,
    mixture: &MixtureMatrix,
    genotypes: &GenotypeMatrix,
) -> ReadCounts {
    let freqs = frequencies(mixture, genotypes);
    let variant = freqs.map(|&f| (coverage as f64 * f).round() as u64);
    let reference = variant.map(|&v| coverage.saturating_sub(v));
    ReadCounts { reference, variant }
}
