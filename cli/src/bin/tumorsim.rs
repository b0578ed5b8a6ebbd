use simulator::config::DEFAULT_MAX_RETRIES;
use simulator::SimulationConfig;
use std::path::PathBuf;
use tumorsim_cli::pipeline::{self, PipelineConfig};
#[macro_use]
extern crate log;

fn main() -> std::io::Result<()> {
    let matches = tumorsim_cli::sim_commands::sim_parser().get_matches();
    let (config, verbose) = match matches.subcommand() {
        Some(("pipeline", sub_m)) => {
            let path: &String = sub_m.get_one("profile").unwrap();
            let config = PipelineConfig::load(path)?;
            let verbose = config.verbose.max(sub_m.get_count("verbose") as usize);
            (config, verbose)
        }
        Some(("simulate", sub_m)) => {
            let simulation = simulation_config(sub_m);
            let verbose = sub_m.get_count("verbose") as usize;
            let no_retry_limit = simulation.max_retries.is_none();
            let config = PipelineConfig {
                verbose,
                no_retry_limit,
                simulation,
            };
            (config, verbose)
        }
        _ => unreachable!(),
    };
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("START\tSimulation");
    match pipeline::run_pipeline(&config) {
        Ok(written) => {
            debug!("END\tSimulation\t{}", written.len());
            Ok(())
        }
        Err(why) => {
            error!("{}", why);
            std::process::exit(1);
        }
    }
}

fn simulation_config(matches: &clap::ArgMatches) -> SimulationConfig {
    let max_retries = match matches.get_flag("no_retry_limit") {
        true => None,
        false => matches
            .get_one::<u64>("max_retries")
            .copied()
            .or(Some(DEFAULT_MAX_RETRIES)),
    };
    let out_dir: &String = matches.get_one("out_dir").unwrap();
    SimulationConfig {
        mutations: *matches.get_one("mutations").unwrap(),
        clones: *matches.get_one("clones").unwrap(),
        coverage: *matches.get_one("coverage").unwrap(),
        samples: *matches.get_one("samples").unwrap(),
        min_mix: *matches.get_one("min").unwrap(),
        max_mix: *matches.get_one("max").unwrap(),
        draws: *matches.get_one("draws").unwrap(),
        seed: *matches.get_one("seed").unwrap(),
        perfect: matches.get_flag("perfect"),
        out_dir: PathBuf::from(out_dir),
        max_retries,
        require_leaves: !matches.get_flag("plain"),
        dump_json: matches.get_flag("json"),
        independent_streams: matches.get_flag("independent_streams"),
        threads: *matches.get_one("threads").unwrap(),
    }
}
