//! Command-line interface definitions and parsing.

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::text::CodePage;
use clap::Parser;
use log::LevelFilter;

/// lnkshare - Resolve the network share behind Windows shortcut files
#[derive(Parser, Debug)]
#[command(name = "lnkshare", version)]
#[command(about = "lnkshare - Resolve the network share behind Windows shortcut (.lnk) files")]
#[command(long_about = "Decodes MS Shell Link (.lnk) files and reports the UNC share they point to:
• Shell link header, target IDList, LinkInfo and StringData
• VolumeID and CommonNetworkRelativeLink with Unicode and code page strings
• Human-readable, JSON or JSON Lines output

Each input is decoded independently; a broken file is reported without stopping the others.")]
pub struct Args {
    /// One or more .lnk files
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Output file (use "-" for stdout, default: stdout)
    #[arg(long)]
    pub output: Option<String>,

    /// Code page for strings stored without Unicode (WHATWG label, e.g. "windows-1252", "shift_jis")
    #[arg(long, default_value = "windows-1252")]
    pub codepage: String,

    /// Only report links that point to a network share
    #[arg(long)]
    pub network_only: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parsed and validated CLI configuration
#[derive(Debug)]
pub struct Config {
    pub inputs: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<String>,
    pub codepage: CodePage,
    pub network_only: bool,
    pub log_level: LevelFilter,
}

impl Config {
    /// Parse and validate CLI arguments into a configuration
    pub fn from_args(args: Args) -> Result<Self> {
        if args.inputs.is_empty() {
            return Err(Error::InvalidInput("at least one .lnk file is required".to_string()));
        }

        let codepage = CodePage::from_label(&args.codepage)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown code page '{}'", args.codepage)))?;

        let log_level = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        Ok(Config {
            inputs: args.inputs,
            format: args.format,
            output: args.output,
            codepage,
            network_only: args.network_only,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(argv).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Config::from_args(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["lnkshare", "a.lnk"]).unwrap();
        assert_eq!(config.inputs, vec!["a.lnk".to_string()]);
        assert_eq!(config.format, OutputFormat::Human);
        assert_eq!(config.codepage.name(), "windows-1252");
        assert!(!config.network_only);
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_all_options() {
        let config = parse(&[
            "lnkshare",
            "--format",
            "jsonl",
            "--codepage",
            "koi8-r",
            "--network-only",
            "--output",
            "out.jsonl",
            "-vv",
            "a.lnk",
            "b.lnk",
        ])
        .unwrap();
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert_eq!(config.codepage.name(), "koi8-r");
        assert!(config.network_only);
        assert_eq!(config.output.as_deref(), Some("out.jsonl"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_codepage() {
        let err = parse(&["lnkshare", "--codepage", "klingon", "a.lnk"]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_inputs_required() {
        assert!(parse(&["lnkshare"]).is_err());
    }
}
