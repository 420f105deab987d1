//! Component materialization
//!
//! Turns each parsed [`Token`] into the ordered list of strings it contributes
//! to a local-part. Letter and digit ranges are computed on demand from an
//! index instead of being stored, so `[ABC:5]` costs a few bytes rather than
//! twelve million strings.

use crate::error::{MailcraftError, Result};
use crate::payload::Token;
use chrono::Datelike;
use clap::ValueEnum;
use std::ops::RangeInclusive;
use unicode_normalization::UnicodeNormalization;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// Case transform applied to name and lastname entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CaseMode {
    /// Keep the source casing
    #[default]
    #[value(skip)]
    Preserve,
    /// juanperez
    Lower,
    /// JUANPEREZ
    Upper,
    /// Juanperez
    Capitalize,
}

/// Strip diacritics, drop anything non-ASCII, then apply the case transform
pub fn normalize_text(text: &str, case: CaseMode) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();

    match case {
        CaseMode::Preserve => ascii,
        CaseMode::Lower => ascii.to_lowercase(),
        CaseMode::Upper => ascii.to_uppercase(),
        CaseMode::Capitalize => {
            let mut chars = ascii.chars();
            let Some(first) = chars.next() else {
                return ascii;
            };
            let mut capitalized = first.to_uppercase().to_string();
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
    }
}

/// The ordered candidate strings of one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// All lowercase strings of `width` letters, `aa..zz` order
    Letters { width: u32, len: u64 },
    /// All digit strings for each width in ascending order, `0..9` then `00..99`
    Digits { widths: RangeInclusive<u32>, len: u64 },
    /// An explicit list (names, lastnames, literals, year)
    Values(Vec<String>),
}

impl Component {
    /// `None` when the number of combinations does not fit in a `u64`
    pub fn letters(width: u32) -> Option<Self> {
        let len = (LETTERS.len() as u64).checked_pow(width)?;
        Some(Self::Letters { width, len })
    }

    pub fn digits(widths: RangeInclusive<u32>) -> Option<Self> {
        let mut len: u64 = 0;
        for width in widths.clone() {
            len = len.checked_add((DIGITS.len() as u64).checked_pow(width)?)?;
        }
        Some(Self::Digits { widths, len })
    }

    pub fn single(value: impl Into<String>) -> Self {
        Self::Values(vec![value.into()])
    }

    /// Number of strings in this component
    pub fn len(&self) -> u64 {
        match self {
            Self::Letters { len, .. } | Self::Digits { len, .. } => *len,
            Self::Values(values) => values.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the `index`-th string to `buf`. `index` must be below [`Component::len`].
    pub fn write_nth(&self, index: u64, buf: &mut String) {
        match self {
            Self::Letters { width, .. } => push_fixed_width(buf, index, *width, LETTERS),
            Self::Digits { widths, .. } => {
                let mut index = index;
                for width in widths.clone() {
                    let block = (DIGITS.len() as u64).pow(width);
                    if index < block {
                        push_fixed_width(buf, index, width, DIGITS);
                        return;
                    }
                    index -= block;
                }
            }
            Self::Values(values) => buf.push_str(&values[index as usize]),
        }
    }

    pub fn nth(&self, index: u64) -> Option<String> {
        if index >= self.len() {
            return None;
        }
        let mut buf = String::new();
        self.write_nth(index, &mut buf);
        Some(buf)
    }

    /// Iterate over every string in order
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.len()).filter_map(move |i| self.nth(i))
    }
}

/// Write `index` in base `alphabet.len()`, zero-padded to `width` symbols
fn push_fixed_width(buf: &mut String, mut index: u64, width: u32, alphabet: &[u8]) {
    if width == 0 {
        return;
    }

    let base = alphabet.len() as u64;
    let mut divisor = base.pow(width - 1);

    loop {
        buf.push(alphabet[(index / divisor) as usize] as char);
        index %= divisor;
        if divisor == 1 {
            break;
        }
        divisor /= base;
    }
}

/// External inputs a payload may draw from
#[derive(Debug, Clone)]
pub struct Sources {
    names: Option<Vec<String>>,
    lastnames: Option<Vec<String>>,
    case: CaseMode,
    year: i32,
}

impl Sources {
    pub fn new() -> Self {
        Self {
            names: None,
            lastnames: None,
            case: CaseMode::Preserve,
            year: chrono::Local::now().year(),
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn with_lastnames(mut self, lastnames: Vec<String>) -> Self {
        self.lastnames = Some(lastnames);
        self
    }

    pub fn with_case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    /// Override the value of `[year]`
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    fn list(&self, token: &Token) -> Option<&[String]> {
        match token {
            Token::Name => self.names.as_deref(),
            Token::Lastname => self.lastnames.as_deref(),
            _ => None,
        }
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that every list token has a non-empty source
pub fn validate_sources(tokens: &[Token], sources: &Sources) -> Result<()> {
    for token in tokens.iter().filter(|t| t.is_list()) {
        let (name, flag) = match token {
            Token::Name => ("name", "-n/--names"),
            _ => ("lastname", "-l/--lastnames"),
        };

        match sources.list(token) {
            None => return Err(MailcraftError::MissingSource { token: name, flag }),
            Some([]) => return Err(MailcraftError::EmptySource { token: name }),
            Some(_) => {}
        }
    }
    Ok(())
}

/// Produce one component per token, in payload order
pub fn materialize(tokens: &[Token], sources: &Sources) -> Result<Vec<Component>> {
    validate_sources(tokens, sources)?;

    tokens
        .iter()
        .map(|token| -> Result<Component> {
            let too_many = || {
                let label = token.to_string();
                MailcraftError::invalid_parameter(
                    label.trim_start_matches('[').trim_end_matches(']'),
                    "too many combinations",
                )
            };

            let component = match token {
                Token::Alpha { width } => Component::letters(*width).ok_or_else(too_many)?,
                Token::Digits { widths } => {
                    Component::digits(widths.clone()).ok_or_else(too_many)?
                }
                Token::Name | Token::Lastname => Component::Values(
                    sources
                        .list(token)
                        .unwrap_or_default()
                        .iter()
                        .map(|entry| normalize_text(entry, sources.case))
                        .collect(),
                ),
                Token::Literal(text) => Component::single(text.clone()),
                Token::Year => Component::single(format!("{:04}", sources.year)),
            };

            log::debug!("{} -> {} values", token, component.len());
            Ok(component)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_letters_two_wide() {
        let component = Component::letters(2).unwrap();
        let values: Vec<String> = component.iter().collect();

        assert_eq!(values.len(), 676);
        assert_eq!(values[0], "aa");
        assert_eq!(values[1], "ab");
        assert_eq!(values[25], "az");
        assert_eq!(values[26], "ba");
        assert_eq!(values[675], "zz");
    }

    #[test]
    fn test_digits_one_to_two() {
        let component = Component::digits(1..=2).unwrap();
        let values: Vec<String> = component.iter().collect();

        assert_eq!(values.len(), 110);
        assert_eq!(&values[..10], &strings(&["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]));
        assert_eq!(values[10], "00");
        assert_eq!(values[11], "01");
        assert_eq!(values[109], "99");
    }

    #[test]
    fn test_digits_fixed_width() {
        let component = Component::digits(3..=3).unwrap();
        assert_eq!(component.len(), 1000);
        assert_eq!(component.nth(7).unwrap(), "007");
        assert_eq!(component.nth(999).unwrap(), "999");
        assert_eq!(component.nth(1000), None);
    }

    #[test]
    fn test_zero_width_is_one_empty_string() {
        let letters = Component::letters(0).unwrap();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters.nth(0).unwrap(), "");

        let digits = Component::digits(0..=1).unwrap();
        assert_eq!(digits.len(), 11);
        assert_eq!(digits.nth(0).unwrap(), "");
        assert_eq!(digits.nth(1).unwrap(), "0");
        assert_eq!(digits.nth(10).unwrap(), "9");
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(Component::letters(13).is_some());
        assert!(Component::letters(14).is_none());
        assert!(Component::digits(1..=20).is_none());
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("José", CaseMode::Preserve), "Jose");
        assert_eq!(normalize_text("Muñoz", CaseMode::Lower), "munoz");
        assert_eq!(normalize_text("çelik", CaseMode::Upper), "CELIK");
        assert_eq!(normalize_text("mARÍA", CaseMode::Capitalize), "Maria");
        assert_eq!(normalize_text("北京", CaseMode::Preserve), "");
    }

    #[test]
    fn test_materialize_names_keeps_positions() {
        let tokens = vec![Token::Name];
        let sources = Sources::new().with_names(strings(&["Ana", "北京", "Luis"]));

        let components = materialize(&tokens, &sources).unwrap();
        assert_eq!(
            components,
            vec![Component::Values(strings(&["Ana", "", "Luis"]))]
        );
    }

    #[test]
    fn test_materialize_missing_source() {
        let tokens = vec![Token::Alpha { width: 1 }, Token::Lastname];
        let sources = Sources::new().with_names(strings(&["Ana"]));

        match materialize(&tokens, &sources) {
            Err(MailcraftError::MissingSource { token, .. }) => assert_eq!(token, "lastname"),
            other => panic!("expected missing source, got {:?}", other),
        }
    }

    #[test]
    fn test_materialize_empty_source() {
        let tokens = vec![Token::Name];
        let sources = Sources::new().with_names(Vec::new());

        assert!(matches!(
            materialize(&tokens, &sources),
            Err(MailcraftError::EmptySource { token: "name" })
        ));
    }

    #[test]
    fn test_materialize_overflow() {
        let tokens = vec![Token::Alpha { width: 20 }];

        match materialize(&tokens, &Sources::new()) {
            Err(MailcraftError::InvalidParameter { token, .. }) => assert_eq!(token, "ABC:20"),
            other => panic!("expected invalid parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_materialize_fixed_tokens() {
        let tokens = vec![Token::Literal(".".to_string()), Token::Year];
        let sources = Sources::new().with_year(2024);

        let components = materialize(&tokens, &sources).unwrap();
        assert_eq!(
            components,
            vec![Component::single("."), Component::single("2024")]
        );
    }
}
