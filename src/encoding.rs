//! Input list reading with encoding detection
//!
//! Name and lastname files are expected to be UTF-8, but lists exported from
//! spreadsheets are often Latin-1 or UTF-16. The encoding is sniffed from the
//! first 64KB and every line is transcoded to UTF-8 before normalization.

use crate::error::{MailcraftError, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
    /// Byte length of the BOM to skip, if any
    pub bom_len: usize,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            encoding: encoding_rs::UTF_8,
            bom_len: 0,
        }
    }
}

/// Bytes sampled from the head of a file for detection
const SAMPLE_SIZE: usize = 64 * 1024;

/// Detect the encoding of a byte sample.
///
/// `truncated` is set when the sample stops short of the end of the file, in
/// which case an incomplete UTF-8 sequence at the very end is tolerated.
pub fn detect_encoding(sample: &[u8], truncated: bool) -> EncodingInfo {
    if sample.is_empty() {
        return EncodingInfo::default();
    }

    // Check for BOM first
    if let Some((encoding, bom_len)) = Encoding::for_bom(sample) {
        return EncodingInfo {
            name: encoding.name(),
            encoding,
            bom_len,
        };
    }

    // A sample cut mid-character is still UTF-8
    match std::str::from_utf8(sample) {
        Ok(_) => return EncodingInfo::default(),
        Err(e) if truncated && e.error_len().is_none() => return EncodingInfo::default(),
        Err(_) => {}
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let encoding = detector.guess(None, true);

    EncodingInfo {
        name: encoding.name(),
        encoding,
        bom_len: 0,
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_file_encoding(path: &Path) -> Result<EncodingInfo> {
    let file = File::open(path).map_err(|e| MailcraftError::read(path, e))?;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64 + 1)
        .read_to_end(&mut sample)
        .map_err(|e| MailcraftError::read(path, e))?;

    let truncated = sample.len() > SAMPLE_SIZE;
    sample.truncate(SAMPLE_SIZE);

    Ok(detect_encoding(&sample, truncated))
}

/// A line iterator that transcodes each line to UTF-8
pub struct EncodedLineIterator {
    reader: BufReader<File>,
    encoding: &'static Encoding,
    line_buffer: Vec<u8>,
}

impl EncodedLineIterator {
    /// Create a new line iterator for a file with automatic encoding detection
    pub fn new(path: &Path) -> Result<Self> {
        let info = detect_file_encoding(path)?;
        let file = File::open(path).map_err(|e| MailcraftError::read(path, e))?;
        let mut reader = BufReader::with_capacity(SAMPLE_SIZE, file);

        if info.bom_len > 0 {
            let mut bom = vec![0u8; info.bom_len];
            reader
                .read_exact(&mut bom)
                .map_err(|e| MailcraftError::read(path, e))?;
        }

        if info.encoding != encoding_rs::UTF_8 {
            log::debug!("{} detected as {}", path.display(), info.name);
        }

        Ok(Self {
            reader,
            encoding: info.encoding,
            line_buffer: Vec::with_capacity(256),
        })
    }

    /// UTF-16 keeps a NUL byte next to every `\n`, so split on the code unit
    fn read_utf16_line(&mut self) -> std::io::Result<usize> {
        let big_endian = self.encoding == encoding_rs::UTF_16BE;
        let mut unit = [0u8; 2];
        let mut read = 0;

        loop {
            match self.reader.read_exact(&mut unit) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(read),
                Err(e) => return Err(e),
            }
            read += 2;
            let is_newline = if big_endian { unit == [0, b'\n'] } else { unit == [b'\n', 0] };
            if is_newline {
                return Ok(read);
            }
            self.line_buffer.extend_from_slice(&unit);
        }
    }
}

impl Iterator for EncodedLineIterator {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();

        let utf16 = self.encoding == encoding_rs::UTF_16LE || self.encoding == encoding_rs::UTF_16BE;
        let read = if utf16 {
            self.read_utf16_line()
        } else {
            self.reader.read_until(b'\n', &mut self.line_buffer)
        };

        match read {
            Ok(0) => None, // EOF
            Ok(_) => {
                let (decoded, had_errors) = self
                    .encoding
                    .decode_without_bom_handling(&self.line_buffer);
                if had_errors {
                    log::warn!("Encoding errors in line, using lossy conversion");
                }
                Some(Ok(decoded.trim_end_matches(['\n', '\r']).to_string()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read a one-entry-per-line list, skipping blank lines.
///
/// A missing file is an empty list unless `required`, and a required file
/// without entries is an error.
pub fn read_list(path: &Path, required: bool) -> Result<Vec<String>> {
    if !path.is_file() {
        if required {
            return Err(MailcraftError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        log::warn!("Input file not found, treating as empty: {}", path.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for line in EncodedLineIterator::new(path)? {
        let line = line.map_err(|e| MailcraftError::read(path, e))?;
        let line = line.trim();
        if !line.is_empty() {
            entries.push(line.to_string());
        }
    }

    if entries.is_empty() && required {
        return Err(MailcraftError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    log::debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
