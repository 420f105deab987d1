//! Mailcraft - Email address permutation generator for penetration testing
//!
//! Main entry point for the command-line application.

use clap::error::ErrorKind;
use clap::Parser;
use std::process;

use mailcraft::cli::Args;
use mailcraft::processor::{Processor, ProcessorConfig};
use mailcraft::progress::{print_banner, print_error, print_header, print_info};

fn main() {
    // Parse command-line arguments; usage errors exit 1 like every other failure
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    // Create processor configuration (validates payload source and CSV delimiter)
    let config = ProcessorConfig::from_args(&args)?;

    // Show configuration
    if !args.quiet && args.verbose {
        print_config(&config);
    }

    // Create and run processor
    let processor = Processor::new(config);
    processor.run()?;

    Ok(())
}

/// Print configuration summary
fn print_config(config: &ProcessorConfig) {
    print_header("Configuration");

    print_info(&format!("Payload:      {}", config.payload));
    print_info(&format!("Domain:       {}", config.domain));

    if let Some(ref names) = config.names {
        print_info(&format!("Names:        {:?}", names));
    }
    if let Some(ref lastnames) = config.lastnames {
        print_info(&format!("Lastnames:    {:?}", lastnames));
    }
    if let Some(ref output) = config.output {
        print_info(&format!("Output:       {:?}", output));
    }
    if let Some(max) = config.policy.max_results {
        print_info(&format!("Max results:  {}", max));
    }

    print_info(&format!("Case:         {:?}", config.case));
    print_info(&format!("Dedup:        {}", !config.policy.allow_duplicates));
    print_info(&format!("Mask:         {}", config.mask));
    print_info(&format!("Dry run:      {}", config.dry_run));
}
