//! Core processing engine
//!
//! Runs one generation end-to-end: validate the domain, parse the payload,
//! load the lists it needs, then stream addresses into the exporter (or the
//! dry-run preview). Every fatal check happens before the first address is
//! produced, so a bad payload never leaves a partial output file behind.

use crate::cli::Args;
use crate::component::{materialize, CaseMode, Sources};
use crate::domain::validate_domain;
use crate::email::Assembler;
use crate::encoding::read_list;
use crate::error::Result;
use crate::generator::{Combinations, GenerationPolicy, GenerationStats};
use crate::output::{default_output_path, export, CsvOptions, ExportReport};
use crate::payload::{parse, Templates, Token};
use crate::progress::{
    create_generation_progress, format_number, print_bullet, print_header, print_info,
    print_success, print_summary, print_warning,
};

use bytesize::ByteSize;
use colored::*;
use indicatif::ProgressIterator;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Number of addresses shown by `--dry-run`
pub const DRY_RUN_PREVIEW: usize = 5;

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Payload string or template name
    pub payload: String,
    pub domain: String,
    pub names: Option<PathBuf>,
    pub lastnames: Option<PathBuf>,
    /// Output file; a timestamped `.txt` in the current directory when unset
    pub output: Option<PathBuf>,
    pub case: CaseMode,
    pub csv: CsvOptions,
    pub policy: GenerationPolicy,
    pub mask: bool,
    pub dry_run: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            payload: args.payload_source()?,
            domain: args.domain.clone(),
            names: args.names.clone(),
            lastnames: args.lastnames.clone(),
            output: args.output.clone(),
            case: args.case.unwrap_or_default(),
            csv: CsvOptions {
                delimiter: CsvOptions::parse_delimiter(&args.csv_delimiter)?,
                header: args.csv_header.clone(),
            },
            policy: GenerationPolicy {
                max_results: args.max_results,
                allow_duplicates: args.allow_duplicates,
                ..GenerationPolicy::default()
            },
            mask: args.mask,
            dry_run: args.dry_run,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }

    /// Minimal configuration for library use: quiet, no export path
    pub fn new(payload: &str, domain: &str) -> Self {
        Self {
            payload: payload.to_string(),
            domain: domain.to_string(),
            names: None,
            lastnames: None,
            output: None,
            case: CaseMode::Preserve,
            csv: CsvOptions::default(),
            policy: GenerationPolicy::default(),
            mask: false,
            dry_run: false,
            quiet: true,
            verbose: false,
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Registrable domain the addresses were built with
    pub domain: String,
    pub stats: GenerationStats,
    /// `None` for dry runs and for runs that produced nothing
    pub export: Option<ExportReport>,
    /// First addresses, filled only by dry runs
    pub preview: Vec<String>,
    pub elapsed: Duration,
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    templates: Templates,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            templates: Templates::builtin(),
        }
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    /// Run one generation
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();

        let domain = validate_domain(&self.config.domain)?;
        let tokens = parse(&self.config.payload, &self.templates)?;
        let sources = self.load_sources(&tokens)?;
        let components = materialize(&tokens, &sources)?;

        let mut combos = Combinations::new(components, self.config.policy);

        if !self.config.quiet {
            print_header("Generating...");
            print_info(&format!("Domain:       {}", domain));
            print_info(&format!(
                "Tokens:       {}",
                tokens.iter().map(Token::to_string).collect::<String>()
            ));
            match combos.candidate_space() {
                Some(space) => print_info(&format!("Combinations: {}", format_number(space))),
                None => print_warning("Combinations: more than 2^64, use --max-results"),
            }
        }

        let mut report = RunReport {
            domain,
            stats: GenerationStats::default(),
            export: None,
            preview: Vec::new(),
            elapsed: Duration::ZERO,
        };

        if self.config.dry_run {
            report.preview = Assembler::new(combos.by_ref(), &report.domain, self.config.mask)
                .take(DRY_RUN_PREVIEW)
                .collect();
            self.print_preview(&report.preview);
        } else {
            report.export = self.export(&mut combos, &report.domain)?;
        }

        report.stats = combos.stats();
        report.elapsed = start.elapsed();

        log::debug!("Dedup set: {}", ByteSize(combos.dedup_memory() as u64));

        log::info!(
            "Generated {} addresses ({} duplicates, {} too long) in {:?}",
            report.stats.total_generated,
            report.stats.duplicates,
            report.stats.invalid_emails,
            report.elapsed
        );

        if !self.config.quiet && !self.config.dry_run {
            print_summary(&report.stats, report.elapsed, report.export.as_ref());
        }

        Ok(report)
    }

    /// Read the name and lastname lists; each is required only if the payload uses it
    fn load_sources(&self, tokens: &[Token]) -> Result<Sources> {
        let mut sources = Sources::new().with_case(self.config.case);

        if let Some(ref path) = self.config.names {
            let required = tokens.contains(&Token::Name);
            sources = sources.with_names(self.read(path, required)?);
        }
        if let Some(ref path) = self.config.lastnames {
            let required = tokens.contains(&Token::Lastname);
            sources = sources.with_lastnames(self.read(path, required)?);
        }

        Ok(sources)
    }

    fn read(&self, path: &Path, required: bool) -> Result<Vec<String>> {
        let entries = read_list(path, required)?;
        if self.config.verbose && !self.config.quiet {
            print_info(&format!("Loaded {} entries from {:?}", entries.len(), path));
        }
        Ok(entries)
    }

    fn export(&self, combos: &mut Combinations, domain: &str) -> Result<Option<ExportReport>> {
        let path = self.config.output.clone().unwrap_or_else(default_output_path);

        let pb = create_generation_progress(combos.expected_len(), self.config.quiet);
        let emails = Assembler::new(combos.by_ref(), domain, self.config.mask)
            .progress_with(pb.clone());

        let report = export(emails, &path, &self.config.csv)?;
        pb.finish_with_message("Complete".green().to_string());

        if !self.config.quiet {
            match report {
                Some(ref report) => print_success(&format!(
                    "Output written to: {:?}",
                    std::fs::canonicalize(&report.path).unwrap_or_else(|_| report.path.clone())
                )),
                None => print_warning("No emails were generated, nothing written"),
            }
        } else if report.is_none() {
            log::warn!("No emails were generated, nothing written");
        }

        Ok(report)
    }

    fn print_preview(&self, preview: &[String]) {
        if self.config.quiet {
            for email in preview {
                println!("{}", email);
            }
            return;
        }

        print_header(&format!("DRY RUN - first {} emails, nothing written", DRY_RUN_PREVIEW));
        if preview.is_empty() {
            print_warning("No emails would be generated");
        }
        for email in preview {
            print_bullet(email);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MailcraftError;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn list_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_dry_run_preview() {
        let lastnames = list_file(&["Smith"]);
        let mut config = ProcessorConfig::new("[ABC][lastname]", "test.com");
        config.lastnames = Some(lastnames.path().to_path_buf());
        config.dry_run = true;

        let report = Processor::new(config).run().unwrap();

        assert_eq!(
            report.preview,
            vec![
                "aSmith@test.com",
                "bSmith@test.com",
                "cSmith@test.com",
                "dSmith@test.com",
                "eSmith@test.com",
            ]
        );
        assert!(report.export.is_none());
        assert_eq!(report.stats.total_generated, 5);
    }

    #[test]
    fn test_export_first_last() {
        let dir = TempDir::new().unwrap();
        let names = list_file(&["Juan"]);
        let lastnames = list_file(&["Perez"]);
        let output = dir.path().join("out.txt");

        let mut config = ProcessorConfig::new("first.last", "https://www.Empresa.com/");
        config.names = Some(names.path().to_path_buf());
        config.lastnames = Some(lastnames.path().to_path_buf());
        config.output = Some(output.clone());

        let report = Processor::new(config).run().unwrap();

        assert_eq!(report.domain, "empresa.com");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "Juan.Perez@empresa.com");
        assert_eq!(report.export.unwrap().records_written, 1);
    }

    #[test]
    fn test_required_list_missing() {
        let dir = TempDir::new().unwrap();
        let mut config = ProcessorConfig::new("[name]", "test.com");
        config.names = Some(dir.path().join("nope.txt"));

        assert!(matches!(
            Processor::new(config).run(),
            Err(MailcraftError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_unused_list_may_be_missing() {
        let dir = TempDir::new().unwrap();
        let mut config = ProcessorConfig::new("[123]", "test.com");
        config.names = Some(dir.path().join("nope.txt"));
        config.dry_run = true;

        let report = Processor::new(config).run().unwrap();
        assert_eq!(report.preview[0], "0@test.com");
    }

    #[test]
    fn test_token_without_source() {
        let config = ProcessorConfig::new("[lastname]", "test.com");

        assert!(matches!(
            Processor::new(config).run(),
            Err(MailcraftError::MissingSource { token: "lastname", .. })
        ));
    }

    #[test]
    fn test_invalid_domain_checked_first() {
        let config = ProcessorConfig::new("[xyz]", "not-a-domain");

        assert!(matches!(
            Processor::new(config).run(),
            Err(MailcraftError::InvalidDomain(_))
        ));
    }
}
