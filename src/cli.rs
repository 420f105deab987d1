//! Command-line interface definition for mailcraft
//!
//! Provides argument parsing and validation for the email generator.

use crate::component::CaseMode;
use crate::error::{MailcraftError, Result};
use crate::payload::TEMPLATE_NAMES;
use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::path::PathBuf;

/// Email address permutation generator for penetration testing
///
/// Expand name lists, letter/digit ranges and literals into candidate
/// email addresses for a target domain.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mailcraft",
    author = "m0h1nd4",
    version,
    about = "Email address permutation generator for penetration testing",
    long_about = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                              MAILCRAFT v1.0.0                                ║
║                     Email Address Permutation Generator                      ║
║                          For Penetration Testing                             ║
╚══════════════════════════════════════════════════════════════════════════════╝

Build candidate email addresses from a payload: a pattern of [...] tokens
expanded into every combination of their values.

TOKENS:
    [ABC]          - Letters a-z
    [ABC:2]        - Two-letter combinations (aa, ab, ..., zz)
    [123]          - Digits 0-9
    [123:2]        - Two-digit combinations (00, 01, ..., 99)
    [123:1-2]      - One and two digits (0-9 then 00-99)
    ['literal']    - Any quoted string, taken as-is (also ["."])
    [.]            - A single punctuation character (. - _ + ...)
    [name]         - Entries from the names file (-n)
    [lastname]     - Entries from the lastnames file (-l)
    [year]         - Current year

TEMPLATES:
    firstlast      - [name][lastname]
    first.last     - [name]["."][lastname]
    abc.last       - [ABC][lastname]
    f.last         - [ABC:1][lastname]

EXAMPLES:
    # Every initial + lastname
    mailcraft -l lastnames.txt -d company.com -p '[ABC][lastname]'

    # first.last from two lists
    mailcraft -n names.txt -l lastnames.txt -d company.com -t first.last

    # Letter/digit usernames exported as CSV
    mailcraft -d system.com -p '[ABC:2][123:3]' -o users.csv

    # Masked, capped output
    mailcraft -l clients.txt -d test.com -p '[lastname]' --mask --max-results 100

    # Preview before writing
    mailcraft -n names.txt -d company.com -p '[name][123:2]' --dry-run

OUTPUT FORMATS (by extension):
    .txt (default) - One address per line
    .csv           - One address per row (--csv-delimiter, --csv-header)
    .json          - {"emails": [...]}
"#,
    after_help = "For more information, visit: https://github.com/m0h1nd4/mailcraft"
)]
pub struct Args {
    /// File with names, one per line
    #[arg(short, long, value_name = "FILE")]
    pub names: Option<PathBuf>,

    /// File with lastnames, one per line
    #[arg(short, long, value_name = "FILE")]
    pub lastnames: Option<PathBuf>,

    /// Target domain (e.g. company.com)
    #[arg(short, long, required = true, value_name = "DOMAIN")]
    pub domain: String,

    /// Payload made of tokens, e.g. "[ABC][123][lastname]"
    #[arg(short, long, value_name = "PAYLOAD")]
    pub payload: Option<String>,

    /// Predefined template (alternative to --payload)
    #[arg(short, long, value_name = "TEMPLATE", value_parser = PossibleValuesParser::new(TEMPLATE_NAMES))]
    pub template: Option<String>,

    /// Output file (.txt, .csv or .json; default: emails_<timestamp>.txt)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Case normalization for names and lastnames
    #[arg(long, value_enum, value_name = "MODE")]
    pub case: Option<CaseMode>,

    /// CSV delimiter (single character)
    #[arg(long, value_name = "CHAR", default_value = ",")]
    pub csv_delimiter: String,

    /// Header for the CSV column
    #[arg(long, value_name = "TEXT")]
    pub csv_header: Option<String>,

    /// Maximum number of emails to generate
    #[arg(long, value_name = "NUM")]
    pub max_results: Option<u64>,

    /// Replace each local-part with a short SHA-256 hash
    #[arg(long, default_value_t = false)]
    pub mask: bool,

    /// Keep duplicate emails (removed by default)
    #[arg(long, default_value_t = false)]
    pub allow_duplicates: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Dry run - preview the first 5 emails without writing files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl Args {
    /// The payload to parse: `--payload` or `--template`, exactly one of them
    pub fn payload_source(&self) -> Result<String> {
        match (&self.payload, &self.template) {
            (Some(_), Some(_)) => Err(MailcraftError::ConflictingPayloadSource),
            (Some(payload), None) => Ok(payload.clone()),
            (None, Some(template)) => Ok(template.clone()),
            (None, None) => Err(MailcraftError::MissingPayloadSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("mailcraft").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_payload_source() {
        let args = parse(&["-d", "test.com", "-p", "[ABC]"]);
        assert_eq!(args.payload_source().unwrap(), "[ABC]");

        let args = parse(&["-d", "test.com", "-t", "first.last"]);
        assert_eq!(args.payload_source().unwrap(), "first.last");
    }

    #[test]
    fn test_payload_and_template_conflict() {
        let args = parse(&["-d", "test.com", "-p", "[ABC]", "-t", "f.last"]);
        assert!(matches!(
            args.payload_source(),
            Err(MailcraftError::ConflictingPayloadSource)
        ));

        let args = parse(&["-d", "test.com"]);
        assert!(matches!(
            args.payload_source(),
            Err(MailcraftError::MissingPayloadSource)
        ));
    }

    #[test]
    fn test_unknown_template_rejected() {
        let result = Args::try_parse_from(["mailcraft", "-d", "test.com", "-t", "last.first"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_case_values() {
        let args = parse(&["-d", "x.com", "-p", "[name]", "--case", "capitalize"]);
        assert_eq!(args.case, Some(CaseMode::Capitalize));

        let result = Args::try_parse_from(["mailcraft", "-d", "x.com", "--case", "preserve"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-d", "test.com", "-p", "[ABC]"]);

        assert_eq!(args.csv_delimiter, ",");
        assert_eq!(args.max_results, None);
        assert!(!args.mask);
        assert!(!args.allow_duplicates);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_domain_required() {
        assert!(Args::try_parse_from(["mailcraft", "-p", "[ABC]"]).is_err());
    }
}
