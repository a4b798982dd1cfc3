// arbox_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// arbox: boxes falling onto a tracked marker.
///
/// This struct defines the command-line arguments accepted by the `arbox`
/// binary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/marker_boxes.toml")]
    pub scenario: PathBuf,

    /// Run without a window: no rendering or physics, scripted tracking only.
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Seed for spawn positions, overriding the scenario's seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["arbox"]);
        assert_eq!(
            cli.scenario,
            PathBuf::from("assets/scenarios/marker_boxes.toml")
        );
        assert!(!cli.headless);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from(["arbox", "-s", "demo.toml", "--headless", "--seed", "9"]);
        assert_eq!(cli.scenario, PathBuf::from("demo.toml"));
        assert!(cli.headless);
        assert_eq!(cli.seed, Some(9));
    }
}
