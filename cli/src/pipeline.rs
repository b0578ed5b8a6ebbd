//! Pipelines -- run a whole simulation from a TOML profile.
//!
//! The profile holds the keys of [SimulationConfig], plus `verbose`.
//! For example,
//! ```toml
//! verbose = 1
//! mutations = 50
//! clones = 8
//! samples = 6
//! out_dir = "./sims"
//! draws = 10
//! ```
//! TOML has no null, so `no_retry_limit = true` stands for `--no-retry-limit`, overriding `max_retries`.
use serde::{Deserialize, Serialize};
use simulator::{SimError, SimulationConfig};
use std::path::{Path, PathBuf};

/// The configuration of the pipeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub verbose: usize,
    /// If true, the rejection-sampling loops retry forever.
    #[serde(default)]
    pub no_retry_limit: bool,
    #[serde(flatten)]
    pub simulation: SimulationConfig,
}

impl PipelineConfig {
    pub fn from_toml(file: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(file)
    }
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = std::fs::read_to_string(path)?;
        Self::from_toml(&file)
            .map_err(|why| std::io::Error::new(std::io::ErrorKind::InvalidData, why))
    }
    /// The simulation to run, with `no_retry_limit` applied.
    pub fn simulation_config(&self) -> SimulationConfig {
        let mut simulation = self.simulation.clone();
        if self.no_retry_limit {
            simulation.max_retries = None;
        }
        simulation
    }
}

pub fn run_pipeline(config: &PipelineConfig) -> Result<Vec<PathBuf>, SimError> {
    let simulation = config.simulation_config();
    if simulation.independent_streams {
        set_threads(simulation.threads);
    }
    simulator::run(&simulation)
}

pub fn set_threads(threads: usize) {
    debug!("Set Threads\t{}", threads);
    if let Err(why) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build_global()
    {
        debug!("{:?} The global pool has already been built.", why);
    }
}
