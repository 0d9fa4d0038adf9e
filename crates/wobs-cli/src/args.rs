//! Command line flags

use clap::Parser;
use wobs_sinks::SinkSelection;

pub const API_KEY_ENV: &str = "WEATHERBIT_API_KEY";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "observer")]
#[command(about = "Report about weather")]
pub struct Args {
    /// Weatherbit API key
    #[arg(long = "api-key", env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Get targets from the target list file instead of the current city
    #[arg(long = "input-file", default_value_t = false)]
    pub input_file: bool,

    /// Append reports to a timestamped markdown document
    #[arg(long = "output-file", default_value_t = false)]
    pub output_file: bool,

    /// Send reports to telegram; implies --recurring
    #[arg(long, default_value_t = false)]
    pub telegram: bool,

    /// Keep running and report at the configured local hours
    #[arg(long, default_value_t = false)]
    pub recurring: bool,

    /// Log progress and timing of every target
    #[arg(short = 'v', long = "verbosity", default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Non-empty API key, if one was given
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn sink_selection(&self) -> SinkSelection {
        SinkSelection::select(self.output_file, self.telegram)
    }

    pub fn recurring(&self) -> bool {
        self.recurring || self.telegram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("observer").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--api-key", "k"]);
        assert_eq!(args.api_key(), Some("k"));
        assert!(!args.input_file);
        assert_eq!(args.sink_selection(), SinkSelection::Interactive);
        assert!(!args.recurring());
        assert!(!args.verbose);
    }

    #[test]
    fn test_file_wins_over_telegram() {
        let args = parse(&["--api-key", "k", "--output-file", "--telegram", "-v"]);
        assert_eq!(args.sink_selection(), SinkSelection::File);
        assert!(args.recurring());
        assert!(args.verbose);
    }

    #[test]
    fn test_telegram_implies_recurring() {
        let args = parse(&["--api-key", "k", "--telegram", "--input-file"]);
        assert_eq!(args.sink_selection(), SinkSelection::Messaging);
        assert!(args.recurring());
        assert!(args.input_file);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let args = Args {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(args.api_key(), None);
        assert_eq!(Args::default().api_key(), None);
    }
}
