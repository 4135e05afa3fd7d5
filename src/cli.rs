//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use gpc_harvester::config::{DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT_DIR};

/// Harvest clinical practice guideline PDFs from the IMSS catalog.
///
/// Crawls every listing page, keeps the GER guideline documents, and
/// downloads each one exactly once into the output directory. Re-running
/// skips files that are already on disk.
#[derive(Parser, Debug)]
#[command(name = "gpc-harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Catalog root URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory downloaded PDFs are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Maximum download attempts per file (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_retries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["gpc-harvester"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(args.max_retries, 3); // DEFAULT_MAX_ATTEMPTS
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["gpc-harvester", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["gpc-harvester", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_output_and_base_url_overrides() {
        let args = Args::try_parse_from([
            "gpc-harvester",
            "--output",
            "/tmp/guias",
            "--base-url",
            "https://example.com/catalog",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("/tmp/guias"));
        assert_eq!(args.base_url, "https://example.com/catalog");
    }

    #[test]
    fn test_cli_max_retries_range_is_enforced() {
        let result = Args::try_parse_from(["gpc-harvester", "-r", "0"]);
        assert!(result.is_err());

        let result = Args::try_parse_from(["gpc-harvester", "-r", "11"]);
        assert!(result.is_err());

        let args = Args::try_parse_from(["gpc-harvester", "-r", "5"]).unwrap();
        assert_eq!(args.max_retries, 5);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["gpc-harvester", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
