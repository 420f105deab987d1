//! # Mailcraft
//!
//! Email address permutation generator for penetration testing.
//!
//! ## Features
//!
//! - **Payload language**: `[name]`, `[lastname]`, `[ABC:n]`, `[123:lo-hi]`, `['literal']`, `[year]`
//! - **Lazy generation**: the Cartesian product is walked on demand, never stored
//! - **Deduplication**: duplicates are dropped (or kept and counted)
//! - **Validity filter**: local-parts over 64 characters are discarded
//! - **Masking**: replace local-parts with a truncated SHA-256
//! - **Export**: `.txt`, `.csv` and `.json`, streamed to disk
//!
//! ## Usage
//!
//! ```bash
//! # Every initial + lastname
//! mailcraft -l lastnames.txt -d company.com -p '[ABC][lastname]'
//!
//! # first.last template
//! mailcraft -n names.txt -l lastnames.txt -d company.com -t first.last
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mailcraft::component::{materialize, Sources};
//! use mailcraft::email::Assembler;
//! use mailcraft::generator::{Combinations, GenerationPolicy};
//! use mailcraft::payload::{parse, Templates};
//!
//! let tokens = parse("first.last", &Templates::builtin()).unwrap();
//! let sources = Sources::new()
//!     .with_names(vec!["Juan".to_string()])
//!     .with_lastnames(vec!["Pérez".to_string()]);
//! let components = materialize(&tokens, &sources).unwrap();
//!
//! let combos = Combinations::new(components, GenerationPolicy::default());
//! let emails: Vec<String> = Assembler::new(combos, "test.com", false).collect();
//!
//! assert_eq!(emails, vec!["Juan.Perez@test.com"]);
//! ```

pub mod cli;
pub mod component;
pub mod dedup;
pub mod domain;
pub mod email;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod generator;
pub mod output;
pub mod payload;
pub mod processor;
pub mod progress;

pub use cli::Args;
pub use error::{MailcraftError, Result};
pub use processor::{Processor, ProcessorConfig, RunReport};
