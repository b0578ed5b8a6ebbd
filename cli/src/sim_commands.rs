use clap::{value_parser, Arg, ArgAction, Command};
fn verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Debug mode")
}

fn subcommand_simulate() -> Command {
    Command::new("simulate")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Simulate tumor phylogeny datasets: clone trees, mixtures, and read counts.")
        .after_help(
            "Every leaf clone should be observed in at least two samples unless --plain is given. \
             With the default 20 clones and 4 samples mixing up to 4 clones this rarely happens, \
             so the run usually fails once --max-retries attempts are spent. \
             Use fewer clones (-n), more samples (-s), a larger --max, or --plain.",
        )
        .arg(verbose())
        .arg(
            Arg::new("mutations")
                .short('m')
                .long("num_mut")
                .value_name("NUM_MUT")
                .value_parser(value_parser!(usize))
                .default_value("20")
                .help("Number of mutations"),
        )
        .arg(
            Arg::new("clones")
                .short('n')
                .long("num_clone")
                .value_name("NUM_CLONE")
                .value_parser(value_parser!(usize))
                .default_value("20")
                .help("Number of clones. Clamped to the number of mutations."),
        )
        .arg(
            Arg::new("coverage")
                .short('c')
                .long("cov")
                .value_name("COV")
                .value_parser(value_parser!(u64))
                .default_value("100")
                .help("Mean depth at each mutation in each sample"),
        )
        .arg(
            Arg::new("samples")
                .short('s')
                .long("samples")
                .value_parser(value_parser!(usize))
                .default_value("4")
                .help("Number of samples"),
        )
        .arg(
            Arg::new("min")
                .long("min")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Minimum number of clones in a sample"),
        )
        .arg(
            Arg::new("max")
                .long("max")
                .value_parser(value_parser!(usize))
                .default_value("4")
                .help("Maximum number of clones in a sample"),
        )
        .arg(
            Arg::new("out_dir")
                .short('o')
                .long("out_dir")
                .value_name("OUT_DIR")
                .default_value("./")
                .help("Output directory"),
        )
        .arg(
            Arg::new("draws")
                .short('d')
                .long("draws")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Number of datasets to draw"),
        )
        .arg(
            Arg::new("seed")
                .short('r')
                .long("seed")
                .value_parser(value_parser!(u64))
                .default_value("47"),
        )
        .arg(
            Arg::new("perfect")
                .short('p')
                .long("perfect")
                .action(ArgAction::SetTrue)
                .help("Noiseless read counts"),
        )
        .arg(
            Arg::new("max_retries")
                .long("max-retries")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("1000000")
                .help("Cap on the attempts of each rejection-sampling loop"),
        )
        .arg(
            Arg::new("no_retry_limit")
                .long("no-retry-limit")
                .action(ArgAction::SetTrue)
                .conflicts_with("max_retries")
                .help("Retry forever. The run may never end on tight parameters."),
        )
        .arg(
            Arg::new("plain")
                .long("plain")
                .action(ArgAction::SetTrue)
                .help("One mutation per clone, and no constraint on the leaves."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Dump each draw as JSON as well."),
        )
        .arg(
            Arg::new("independent_streams")
                .long("independent-streams")
                .action(ArgAction::SetTrue)
                .help("Give each draw its own random stream and run the draws in parallel."),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("number of threads"),
        )
}

fn subcommand_pipeline() -> Command {
    Command::new("pipeline")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Run simulation based on the given TOML file.")
        .arg(verbose())
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .required(true)
                .help("TOML configuration file. Omitted keys take the default values."),
        )
}

pub fn sim_parser() -> Command {
    Command::new("tumorsim")
        .version("0.1")
        .author("Bansho Masutani <ban-m@g.ecc.u-tokyo.ac.jp>")
        .about("Synthetic datasets for tumor phylogeny deconvolution")
        .arg_required_else_help(true)
        .subcommand(subcommand_simulate())
        .subcommand(subcommand_pipeline())
}
