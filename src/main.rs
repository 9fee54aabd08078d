use clap::Parser;
use log::trace;

use sphereproj::cli::{normalize_args, Args};
use sphereproj::facade;

fn main() -> anyhow::Result<()> {
    let args = Args::parse_from(normalize_args(std::env::args()));

    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level.to_string()))
        .format_timestamp_millis()
        .init();

    trace!("command-line args: {args:?}");

    match facade::run(&args) {
        Ok(path) => {
            println!("wrote {}", path.display());
            Ok(())
        }
        Err(err) => {
            let err = anyhow::Error::new(err);
            facade::log_error_chain(&err);
            Err(err)
        }
    }
}
