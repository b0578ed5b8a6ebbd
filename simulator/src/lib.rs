//! Simulator -- synthesizes tumor phylogeny datasets for testing clonal deconvolution.
//!
//! A draw consists of a random clone tree with its genotype matrix B, a mixture matrix U of the clones in each sample,
//! and read counts sampled around the variant allele frequencies F = 0.5 U B.
pub mod collapse;
pub mod config;
pub mod error;
pub mod mixture;
pub mod output;
pub mod reads;
pub mod simplex;
pub mod simulate;
pub mod tree;
#[macro_use]
extern crate log;

pub use config::SimulationConfig;
pub use error::{Result, SimError};
pub use simulate::{run, simulate_draw};
