use repoprobe::cli::{handle_deps, handle_detect, CliArgs, Commands};
use repoprobe::config::ProbeConfig;
use repoprobe::util::logging::{init_logging, parse_level, LoggingConfig};
use repoprobe::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = ProbeConfig::default();
    init_logging_from_args(&args, &config);

    debug!("repoprobe v{} starting", VERSION);

    if let Err(err) = config.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(2);
    }

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args, &config).await,
        Commands::Deps(deps_args) => handle_deps(deps_args, &config).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &ProbeConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig::with_level(level));
}
