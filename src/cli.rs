use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "combined_files.md";

pub struct Config {
    pub output_path: PathBuf,
    pub directory: PathBuf,
    pub include_all: bool,
    pub recursive: bool,
    pub ignore_gitignore: bool,
    pub verbosity: u8,
    /// The running program's own file, never offered as a candidate.
    pub self_path: Option<PathBuf>,
}

impl Config {
    /// A batch configuration scanning `directory` non-recursively.
    pub fn new(directory: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            directory: directory.into(),
            include_all: true,
            recursive: false,
            ignore_gitignore: false,
            verbosity: 0,
            self_path: None,
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Self {
        let output_path = matches
            .get_one::<String>("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let directory = matches
            .get_one::<String>("directory")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            output_path,
            directory,
            include_all: matches.get_flag("all"),
            recursive: matches.get_flag("recursive"),
            ignore_gitignore: matches.get_flag("ignore-gitignore"),
            verbosity: matches.get_count("verbose"),
            self_path: std::env::current_exe().ok(),
        }
    }
}

pub fn command() -> Command {
    Command::new("code2md")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Matias Hiltunen")
        .about("Combine files into a single Markdown document")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file name")
                .default_value(DEFAULT_OUTPUT)
                .num_args(1),
        )
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .help("Include all files without confirmation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively process subdirectories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .value_name("DIR")
                .help("Source directory to process")
                .default_value(".")
                .num_args(1),
        )
        .arg(
            Arg::new("ignore-gitignore")
                .long("ignore-gitignore")
                .help("Ignore .gitignore file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

/// Parses the process arguments; clap prints usage and exits on bad input.
pub fn parse_args() -> Config {
    Config::from_matches(&command().get_matches())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() -> anyhow::Result<()> {
        let matches = command().try_get_matches_from(["code2md"])?;
        let config = Config::from_matches(&matches);

        assert_eq!(config.output_path, PathBuf::from("combined_files.md"));
        assert_eq!(config.directory, PathBuf::from("."));
        assert!(!config.include_all);
        assert!(!config.recursive);
        assert!(!config.ignore_gitignore);
        assert_eq!(config.verbosity, 0);
        Ok(())
    }

    #[test]
    fn parses_every_flag() -> anyhow::Result<()> {
        let matches = command().try_get_matches_from([
            "code2md",
            "-o",
            "out.md",
            "-a",
            "-r",
            "-d",
            "src",
            "--ignore-gitignore",
            "-vv",
        ])?;
        let config = Config::from_matches(&matches);

        assert_eq!(config.output_path, PathBuf::from("out.md"));
        assert_eq!(config.directory, PathBuf::from("src"));
        assert!(config.include_all);
        assert!(config.recursive);
        assert!(config.ignore_gitignore);
        assert_eq!(config.verbosity, 2);
        Ok(())
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(command().try_get_matches_from(["code2md", "--bogus"]).is_err());
    }
}
