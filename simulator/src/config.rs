use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cap on the rejection-sampling loops.
pub const DEFAULT_MAX_RETRIES: u64 = 1_000_000;

/// The configuration of a simulation run.
/// This is the comprehensive list of the parameters a user can set; it can be read from a TOML profile,
/// where omitted keys take their default values.
///
/// The defaults (20 mutations, 20 clones, 4 samples mixing up to 4 clones) are tight for the leaf-covering mode:
/// a 20-clone tree usually has far more leaves than 16 mixing slots can observe twice,
/// so a default run typically ends with [SimError::RetryBudgetExceeded] (or [SimError::InfeasibleConstraint])
/// once `max_retries` attempts are spent. Use fewer clones, more samples, or `require_leaves = false`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// The number of mutations.
    pub mutations: usize,
    /// The number of clones. Clamped to the number of mutations.
    pub clones: usize,
    /// The (mean) depth of each sample at each mutation.
    pub coverage: u64,
    pub samples: usize,
    /// The minimum number of clones mixed in a sample.
    pub min_mix: usize,
    /// The maximum number of clones mixed in a sample. Clamped to the number of clones.
    pub max_mix: usize,
    /// The number of datasets to draw.
    pub draws: usize,
    pub seed: u64,
    /// If true, the read counts are noiseless.
    pub perfect: bool,
    /// The directory to write results to.
    pub out_dir: PathBuf,
    /// Cap on the attempts of each rejection-sampling loop. `None` means retrying forever.
    pub max_retries: Option<u64>,
    /// If true, the tree is clustered and every leaf clone is observed in at least two samples.
    /// Otherwise, one mutation per clone and unconstrained mixtures.
    pub require_leaves: bool,
    /// If true, dump each draw as JSON as well.
    pub dump_json: bool,
    /// If true, each draw gets its own random stream, and the draws run in parallel.
    pub independent_streams: bool,
    pub threads: usize,
}

impl std::default::Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mutations: 20,
            clones: 20,
            coverage: 100,
            samples: 4,
            min_mix: 1,
            max_mix: 4,
            draws: 1,
            seed: 47,
            perfect: false,
            out_dir: PathBuf::from("./"),
            max_retries: Some(DEFAULT_MAX_RETRIES),
            require_leaves: true,
            dump_json: false,
            independent_streams: false,
            threads: 1,
        }
    }
}

impl SimulationConfig {
    /// The number of clones actually used in the trees.
    pub fn clone_num(&self) -> usize {
        match self.require_leaves {
            true => self.clones,
            false => self.mutations,
        }
    }
    /// Check the parameters. Too many clones, or too many clones to mix, are clamped with a warning.
    /// Other impossible values are rejected.
    pub fn validate(mut self) -> Result<Self> {
        if self.mutations == 0 {
            return Err(SimError::InvalidConfig("no mutations".to_string()));
        }
        if self.clones == 0 {
            return Err(SimError::InvalidConfig("no clones".to_string()));
        }
        if self.samples == 0 {
            return Err(SimError::InvalidConfig("no samples".to_string()));
        }
        if self.coverage == 0 {
            return Err(SimError::InvalidConfig("coverage should be positive".to_string()));
        }
        if self.mutations < self.clones {
            warn!(
                "CONFIG\t{} clones on {} mutations. Use {} clones.",
                self.clones, self.mutations, self.mutations
            );
            self.clones = self.mutations;
        }
        let clones = self.clone_num();
        if clones < self.max_mix {
            warn!(
                "CONFIG\tMixing up to {} out of {} clones. Mix up to {}.",
                self.max_mix, clones, clones
            );
            self.max_mix = clones;
        }
        if self.max_mix < self.min_mix {
            let message = format!("min_mix {} > max_mix {}", self.min_mix, self.max_mix);
            return Err(SimError::InvalidConfig(message));
        }
        if self.max_mix == 0 {
            return Err(SimError::InvalidConfig("max_mix should be positive".to_string()));
        }
        if self.max_retries == Some(0) {
            return Err(SimError::InvalidConfig("max_retries should be positive".to_string()));
        }
        if self.threads == 0 {
            self.threads = 1;
        }
        Ok(self)
    }
    /// Echo the parameters to the log.
    pub fn log_params(&self) {
        info!("NUM MUT\t{}", self.mutations);
        info!("NUM CLONES\t{}", self.clone_num());
        info!("COV\t{}", self.coverage);
        info!("SAMPLES\t{}", self.samples);
        info!("MIN\t{}", self.min_mix);
        info!("MAX\t{}", self.max_mix);
        info!("OUT_DIR\t{}", self.out_dir.display());
        info!("DRAWS\t{}", self.draws);
        info!("RAND SEED\t{}", self.seed);
        info!("PERFECT DATA\t{}", self.perfect);
        match self.max_retries {
            Some(max) => info!("MAX RETRIES\t{}", max),
            None => info!("MAX RETRIES\tunbounded"),
        }
    }
}
