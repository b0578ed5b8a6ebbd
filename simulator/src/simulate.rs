//! Simulate datasets -- trees, mixtures, and read counts, draw by draw.
use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::mixture::{self, LEAF_SAMPLE_NUM};
use crate::{output, reads, tree};
use definitions::{CloneTree, GenotypeMatrix, MixtureMatrix, SimulatedDraw};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::path::PathBuf;

/// Plain dataset: one mutation per clone, and mixtures without any constraint.
pub fn make_sim<R: Rng>(
    rng: &mut R,
    config: &SimulationConfig,
) -> (MixtureMatrix, GenotypeMatrix, CloneTree) {
    let num = config.mutations;
    let (genotypes, tree) = tree::generate_genotypes(rng, num);
    let (min, max) = (config.min_mix, config.max_mix);
    let mixture = mixture::generate_mixture(rng, num, config.samples, min, max);
    (mixture, genotypes, tree)
}

/// Dataset where every leaf clone is sampled.
/// First, clustered trees are drawn until the number of leaves passes [mixture::is_leaf_coverage_feasible].
/// Then, the mixture is drawn until every leaf appears in at least two samples.
/// Both loops are capped by `config.max_retries`.
pub fn make_sim_all_leaves<R: Rng>(
    rng: &mut R,
    config: &SimulationConfig,
) -> Result<(MixtureMatrix, GenotypeMatrix, CloneTree)> {
    let (samples, max_num) = (config.samples, config.max_mix);
    // Any tree has at least one leaf.
    if samples < LEAF_SAMPLE_NUM || !mixture::is_leaf_coverage_feasible(samples, max_num, 1) {
        let message = format!(
            "a leaf can not appear in {} of {} samples mixing at most {} clones",
            LEAF_SAMPLE_NUM, samples, max_num
        );
        return Err(SimError::InfeasibleConstraint(message));
    }
    let mut attempts = 0;
    let (genotypes, tree) = loop {
        let (genotypes, tree) =
            tree::generate_genotypes_with_cluster(rng, config.mutations, config.clones);
        attempts += 1;
        let leaf_num = tree.leaves().len();
        if mixture::is_leaf_coverage_feasible(samples, max_num, leaf_num) {
            break (genotypes, tree);
        }
        trace!("TREE\t{}\t{}\tTooManyLeaves", attempts, leaf_num);
        if config.max_retries.map_or(false, |max| max <= attempts) {
            let message = format!(
                "no tree with at most {} leaves in {} attempts",
                max_num * samples / LEAF_SAMPLE_NUM,
                attempts
            );
            return Err(SimError::InfeasibleConstraint(message));
        }
    };
    let leaves = tree.leaves();
    debug!("TREE\t{}\t{}\tLeaves", attempts, leaves.len());
    let mixture = mixture::generate_mixture_with_leaves(
        rng,
        config.clones,
        samples,
        config.min_mix,
        max_num,
        &leaves,
        config.max_retries,
    )?;
    Ok((mixture, genotypes, tree))
}

/// Simulate the `index`-th draw. `config` should be validated beforehand.
pub fn simulate_draw<R: Rng>(
    rng: &mut R,
    index: usize,
    config: &SimulationConfig,
) -> Result<SimulatedDraw> {
    let (mixture, genotypes, tree) = match config.require_leaves {
        true => make_sim_all_leaves(rng, config)?,
        false => make_sim(rng, config),
    };
    let frequencies = reads::frequencies(&mixture, &genotypes);
    let reads = match config.perfect {
        true => reads::sample_perfect_reads(config.coverage, &mixture, &genotypes),
        false => reads::sample_reads(rng, config.coverage, &mixture, &genotypes)?,
    };
    debug!(
        "DRAW\t{}\t{}\t{}\t{}",
        index,
        mixture.rows(),
        genotypes.rows(),
        genotypes.cols()
    );
    Ok(SimulatedDraw {
        index,
        leaves: tree.leaves(),
        tree,
        genotypes,
        mixture,
        frequencies,
        reads,
    })
}

/// The random stream of the `index`-th draw when the draws are independent:
/// the generator seeded by `seed`, jumped `index` times.
pub fn draw_stream(seed: u64, index: usize) -> Xoshiro256PlusPlus {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    for _ in 0..index {
        rng.jump();
    }
    rng
}

/// Simulate all the draws and write them into `config.out_dir`. Return the paths written.
/// By default, all the draws consume one random stream one after another.
/// With `independent_streams`, each draw has its own stream (see [draw_stream]) and the draws run on the rayon thread pool.
pub fn run(config: &SimulationConfig) -> Result<Vec<PathBuf>> {
    let config = config.clone().validate()?;
    config.log_params();
    std::fs::create_dir_all(&config.out_dir)?;
    let out_dir = &config.out_dir;
    let written: Vec<Vec<PathBuf>> = if config.independent_streams {
        (0..config.draws)
            .into_par_iter()
            .map(|index| {
                let mut rng = draw_stream(config.seed, index);
                let draw = simulate_draw(&mut rng, index, &config)?;
                output::persist_draw(out_dir, &draw, config.dump_json)
            })
            .collect::<Result<_>>()?
    } else {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        (0..config.draws)
            .map(|index| {
                let draw = simulate_draw(&mut rng, index, &config)?;
                output::persist_draw(out_dir, &draw, config.dump_json)
            })
            .collect::<Result<_>>()?
    };
    let written: Vec<_> = written.into_iter().flatten().collect();
    info!("WROTE\t{}\tFiles", written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::is_ancestry_matrix;
    use std::path::Path;
    fn nonzero(row: &[f64]) -> usize {
        row.iter().filter(|&&x| 0f64 < x).count()
    }
    #[test]
    fn small_plain_scenario() {
        let config = SimulationConfig {
            mutations: 5,
            clones: 5,
            samples: 3,
            min_mix: 1,
            max_mix: 2,
            seed: 11,
            require_leaves: false,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        let (u, b, tree) = make_sim(&mut rng, &config);
        assert!(is_ancestry_matrix(&b, &tree));
        let root = b.row(tree.root());
        assert_eq!(root.iter().filter(|&&x| x == 1).count(), 1);
        assert_eq!(u.shape(), (3, 5));
        assert!(u.iter_rows().all(|row| (1..=2).contains(&nonzero(row))));
    }
    #[test]
    fn small_leaf_scenario() {
        let config = SimulationConfig {
            mutations: 5,
            clones: 5,
            samples: 3,
            min_mix: 1,
            max_mix: 2,
            seed: 11,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        for _ in 0..10 {
            let (u, b, tree) = make_sim_all_leaves(&mut rng, &config).unwrap();
            assert!(is_ancestry_matrix(&b, &tree));
            assert!(u.iter_rows().all(|row| (1..=2).contains(&nonzero(row))));
            let leaves = tree.leaves();
            assert!(leaves.len() * 2 <= 6);
            assert!(mixture::covers_leaves(&u, &leaves, LEAF_SAMPLE_NUM));
        }
    }
    #[test]
    fn infeasible_up_front() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let config = SimulationConfig {
            samples: 1,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let result = make_sim_all_leaves(&mut rng, &config);
        assert!(matches!(result, Err(SimError::InfeasibleConstraint(_))));
    }
    #[test]
    fn infeasible_after_retries() {
        // Only a chain, one out of 9! recursive trees, has a single leaf.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let config = SimulationConfig {
            mutations: 10,
            clones: 10,
            samples: 2,
            min_mix: 1,
            max_mix: 1,
            max_retries: Some(50),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let result = make_sim_all_leaves(&mut rng, &config);
        assert!(matches!(result, Err(SimError::InfeasibleConstraint(_))));
    }
    #[test]
    fn default_leaf_coverage_gives_up() {
        // Twenty clones mixed four at a time in four samples rarely observe every leaf twice.
        let dir = tempfile::tempdir().unwrap();
        let config = SimulationConfig {
            out_dir: dir.path().to_path_buf(),
            max_retries: Some(200),
            ..Default::default()
        };
        let result = run(&config);
        assert!(matches!(
            result,
            Err(SimError::RetryBudgetExceeded { .. }) | Err(SimError::InfeasibleConstraint(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
    #[test]
    fn perfect_draw() {
        let config = SimulationConfig {
            mutations: 12,
            clones: 4,
            coverage: 60,
            perfect: true,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        let draw = simulate_draw(&mut rng, 0, &config).unwrap();
        assert_eq!((draw.samples(), draw.clones(), draw.mutations()), (4, 4, 12));
        for i in 0..4 {
            for j in 0..12 {
                assert_eq!(draw.reads.depth(i, j), 60);
                let answer = (60f64 * draw.frequencies[(i, j)]).round() as u64;
                assert_eq!(draw.reads.variant[(i, j)], answer);
            }
        }
    }
    #[test]
    fn streams_differ() {
        let mut first = draw_stream(47, 0);
        let mut second = draw_stream(47, 1);
        assert_ne!(first.gen::<u64>(), second.gen::<u64>());
        let mut again = draw_stream(47, 1);
        let mut second = draw_stream(47, 1);
        assert_eq!(again.gen::<u64>(), second.gen::<u64>());
    }
    fn read_all(paths: &[PathBuf]) -> Vec<(String, Vec<u8>)> {
        paths
            .iter()
            .map(|p| {
                let name = p.file_name().unwrap().to_str().unwrap().to_string();
                (name, std::fs::read(p).unwrap())
            })
            .collect()
    }
    fn run_in(dir: &Path, independent_streams: bool) -> Vec<(String, Vec<u8>)> {
        let config = SimulationConfig {
            mutations: 10,
            clones: 6,
            samples: 4,
            draws: 3,
            seed: 2024,
            out_dir: dir.to_path_buf(),
            dump_json: true,
            independent_streams,
            ..Default::default()
        };
        read_all(&run(&config).unwrap())
    }
    #[test]
    fn byte_identical_outputs() {
        let (first, second) = (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap());
        let first = run_in(first.path(), false);
        let second = run_in(second.path(), false);
        assert_eq!(first.len(), 9);
        assert_eq!(first, second);
        assert_eq!(first[0].0, "sim_0.true");
        assert_eq!(first[1].0, "sim_0.input");
    }
    #[test]
    fn byte_identical_outputs_on_independent_streams() {
        let (first, second) = (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap());
        let first = run_in(first.path(), true);
        let second = run_in(second.path(), true);
        assert_eq!(first.len(), 9);
        assert_eq!(first, second);
    }
    #[test]
    fn independent_draw_matches_its_stream() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimulationConfig {
            mutations: 10,
            clones: 6,
            draws: 2,
            seed: 5,
            out_dir: dir.path().to_path_buf(),
            independent_streams: true,
            ..Default::default()
        };
        run(&config).unwrap();
        let config = config.validate().unwrap();
        let mut rng = draw_stream(5, 1);
        let draw = simulate_draw(&mut rng, 1, &config).unwrap();
        let mut wtr = vec![];
        output::write_read_counts(&mut wtr, &draw.reads).unwrap();
        let written = std::fs::read(dir.path().join("sim_1.input")).unwrap();
        assert_eq!(written, wtr);
    }
}
