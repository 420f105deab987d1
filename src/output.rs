//! Output management module
//!
//! Streams generated addresses to a `.txt`, `.csv` or `.json` file. Nothing is
//! collected in memory: each address is written as it is pulled from the
//! generator.

use crate::error::{MailcraftError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::iter::Peekable;
use std::path::{Path, PathBuf};

/// Default buffer size for file writing (1MB)
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Export format, chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One address per line
    Text,
    /// One address per row, single column
    Csv,
    /// `{"emails": [...]}`
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// CSV-specific settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub header: Option<String>,
}

impl CsvOptions {
    /// Parse a user supplied delimiter; it must be exactly one ASCII character
    pub fn parse_delimiter(delimiter: &str) -> Result<u8> {
        match delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(MailcraftError::InvalidCsvDelimiter(delimiter.to_string())),
        }
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header: None,
        }
    }
}

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub records_written: u64,
    pub bytes_written: u64,
}

/// Buffered text writer that joins records with `\n`
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(path: PathBuf, buffer_size: usize) -> Result<Self> {
        let file = open_truncate(&path)?;

        Ok(Self {
            writer: BufWriter::with_capacity(buffer_size, file),
            path,
            lines_written: 0,
            bytes_written: 0,
        })
    }

    /// Write a record, preceded by a newline unless it is the first
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        if self.lines_written > 0 {
            self.write_raw("\n")?;
        }
        self.write_raw(line)?;
        self.lines_written += 1;
        Ok(())
    }

    fn write_raw(&mut self, data: &str) -> Result<()> {
        self.writer
            .write_all(data.as_bytes())
            .map_err(|e| MailcraftError::write(&self.path, e))?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| MailcraftError::write(&self.path, e))
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get number of lines written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Get bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

fn open_truncate(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| MailcraftError::write(path, e))
}

/// Write every address from `emails` to `path`.
///
/// Returns `None` without touching the filesystem when there is nothing to write.
pub fn export<I>(emails: I, path: &Path, csv: &CsvOptions) -> Result<Option<ExportReport>>
where
    I: Iterator<Item = String>,
{
    let mut emails = emails.peekable();
    if emails.peek().is_none() {
        return Ok(None);
    }

    let format = OutputFormat::from_path(path);
    let records_written = match format {
        OutputFormat::Text => write_text(&mut emails, path)?,
        OutputFormat::Csv => write_csv(&mut emails, path, csv)?,
        OutputFormat::Json => write_json(&mut emails, path)?,
    };

    let bytes_written = std::fs::metadata(path)
        .map_err(|e| MailcraftError::read(path, e))?
        .len();

    log::info!("Wrote {} addresses to {}", records_written, path.display());

    Ok(Some(ExportReport {
        path: path.to_path_buf(),
        format,
        records_written,
        bytes_written,
    }))
}

fn write_text<I>(emails: &mut Peekable<I>, path: &Path) -> Result<u64>
where
    I: Iterator<Item = String>,
{
    let mut writer = OutputWriter::new(path.to_path_buf(), DEFAULT_BUFFER_SIZE)?;
    for email in emails {
        writer.write_line(&email)?;
    }
    writer.flush()?;
    Ok(writer.lines_written())
}

fn write_csv<I>(emails: &mut Peekable<I>, path: &Path, options: &CsvOptions) -> Result<u64>
where
    I: Iterator<Item = String>,
{
    let file = open_truncate(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file));

    if let Some(ref header) = options.header {
        writer.write_record([header])?;
    }

    let mut written = 0;
    for email in emails {
        writer.write_record([&email])?;
        written += 1;
    }

    writer.flush().map_err(|e| MailcraftError::write(path, e))?;
    Ok(written)
}

fn write_json<I>(emails: &mut Peekable<I>, path: &Path) -> Result<u64>
where
    I: Iterator<Item = String>,
{
    let file = open_truncate(path)?;
    let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
    let io_err = |e| MailcraftError::write(path, e);

    writer.write_all(b"{\"emails\":[").map_err(io_err)?;
    let mut written = 0;
    for email in emails {
        if written > 0 {
            writer.write_all(b",").map_err(io_err)?;
        }
        serde_json::to_writer(&mut writer, &email)?;
        written += 1;
    }
    writer.write_all(b"]}").map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    Ok(written)
}

/// `emails_<timestamp>.txt` in the current directory
pub fn default_output_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("emails_{}.txt", timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn emails(items: &[&str]) -> std::vec::IntoIter<String> {
        items
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("OUT.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.txt")), OutputFormat::Text);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Text);
    }

    #[test]
    fn test_output_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");

        let mut writer = OutputWriter::new(path.clone(), 1024).unwrap();
        writer.write_line("hello").unwrap();
        writer.write_line("world").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.bytes_written(), 11);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello\nworld");
    }

    #[test]
    fn test_export_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("emails.txt");

        let report = export(emails(&["a@x.com", "b@x.com"]), &path, &CsvOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(report.records_written, 2);
        assert_eq!(report.format, OutputFormat::Text);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a@x.com\nb@x.com");
        assert_eq!(report.bytes_written, 15);
    }

    #[test]
    fn test_export_csv_with_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("emails.csv");
        let options = CsvOptions {
            delimiter: b';',
            header: Some("Correo".to_string()),
        };

        export(emails(&["a@x.com", "b@x.com"]), &path, &options).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Correo\r\na@x.com\r\nb@x.com\r\n");
    }

    #[test]
    fn test_export_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("emails.json");

        export(emails(&["a@x.com", "\"q\"@x.com"]), &path, &CsvOptions::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, serde_json::json!({ "emails": ["a@x.com", "\"q\"@x.com"] }));
    }

    #[test]
    fn test_export_nothing_writes_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("emails.txt");

        let report = export(emails(&[]), &path, &CsvOptions::default()).unwrap();

        assert!(report.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("emails.txt");

        assert!(matches!(
            export(emails(&["a@x.com"]), &path, &CsvOptions::default()),
            Err(MailcraftError::Write { .. })
        ));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(CsvOptions::parse_delimiter(";").unwrap(), b';');
        assert_eq!(CsvOptions::parse_delimiter("\t").unwrap(), b'\t');
        assert!(CsvOptions::parse_delimiter(";;").is_err());
        assert!(CsvOptions::parse_delimiter("").is_err());
        assert!(CsvOptions::parse_delimiter("é").is_err());
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path();
        let name = path.to_str().unwrap();

        assert!(name.starts_with("emails_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "emails_20240101-120000.txt".len());
    }
}
