//! Command-line entry point: `orbitcap --ply <PATH> [--config <PATH>]`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orbitcap::{capture_orbit, CaptureOptions, CaptureSummary, Result};

/// Render color and depth views of a Gaussian splat scene along a fixed orbit.
#[derive(Parser, Debug)]
#[command(name = "orbitcap", version, about)]
struct Cli {
    /// Gaussian splat scene in PLY format
    #[arg(long)]
    ply: PathBuf,

    /// JSON file overriding the default capture options
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<CaptureSummary> {
    let options = match &cli.config {
        Some(path) => CaptureOptions::from_json_file(path)?,
        None => CaptureOptions::default(),
    };
    capture_orbit(&cli.ply, options)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) => {
            log::info!("capture complete: {} images", summary.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ply_is_the_only_required_input() {
        let cli = Cli::try_parse_from(["orbitcap", "--ply", "scene.ply"]).expect("parse");
        assert_eq!(cli.ply, PathBuf::from("scene.ply"));
        assert!(cli.config.is_none());

        assert!(Cli::try_parse_from(["orbitcap"]).is_err());
        assert!(Cli::try_parse_from(["orbitcap", "--ply", "a.ply", "--width", "8"]).is_err());
    }

    #[test]
    fn test_config_is_optional_override() {
        let cli = Cli::try_parse_from(["orbitcap", "--ply", "a.ply", "--config", "opts.json"])
            .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("opts.json")));
    }
}
