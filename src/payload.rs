//! Payload parsing module
//!
//! A payload is a pattern such as `[name]["."][lastname]` or `[ABC:2][123:1-2]`.
//! Only the bracketed segments are meaningful; each one becomes a [`Token`]
//! and their left-to-right order is the order of the generated local-part.

use crate::error::{MailcraftError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Names of the built-in templates, in help-text order
pub const TEMPLATE_NAMES: [&str; 4] = ["firstlast", "first.last", "abc.last", "f.last"];

/// One parsed `[...]` unit of a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `[ABC]` / `[ABC:n]` - every lowercase string of exactly `width` letters
    Alpha { width: u32 },
    /// `[123]` / `[123:n]` / `[123:lo-hi]` - every digit string for each width in the range
    Digits { widths: RangeInclusive<u32> },
    /// `[name]` - entries from the names list
    Name,
    /// `[lastname]` - entries from the lastnames list
    Lastname,
    /// `['text']`, `["text"]` or a single punctuation character
    Literal(String),
    /// `[year]` - the current four-digit year
    Year,
}

impl Token {
    /// Whether this token draws its values from an external list
    pub fn is_list(&self) -> bool {
        matches!(self, Token::Name | Token::Lastname)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Alpha { width } => write!(f, "[ABC:{}]", width),
            Token::Digits { widths } if widths.start() == widths.end() => {
                write!(f, "[123:{}]", widths.start())
            }
            Token::Digits { widths } => write!(f, "[123:{}-{}]", widths.start(), widths.end()),
            Token::Name => f.write_str("[name]"),
            Token::Lastname => f.write_str("[lastname]"),
            Token::Literal(text) => write!(f, "['{}']", text),
            Token::Year => f.write_str("[year]"),
        }
    }
}

/// Named shortcuts that expand to a payload before tokenization
#[derive(Debug, Clone)]
pub struct Templates {
    entries: HashMap<String, String>,
}

impl Templates {
    /// The four templates shipped with the tool
    pub fn builtin() -> Self {
        let entries = [
            ("firstlast", "[name][lastname]"),
            ("first.last", "[name][\".\"][lastname]"),
            ("abc.last", "[ABC][lastname]"),
            ("f.last", "[ABC:1][lastname]"),
        ]
        .into_iter()
        .map(|(name, payload)| (name.to_string(), payload.to_string()))
        .collect();

        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register (or replace) a template
    pub fn insert(&mut self, name: &str, payload: &str) {
        self.entries.insert(name.to_string(), payload.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Expand `payload` if it is exactly a template name, otherwise return it unchanged
    pub fn resolve<'a>(&'a self, payload: &'a str) -> &'a str {
        self.get(payload).unwrap_or(payload)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

fn bracket_regex() -> &'static Regex {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    BRACKETS.get_or_init(|| Regex::new(r"\[(.*?)\]").expect("bracket pattern is valid"))
}

/// Parse a payload (or template name) into its ordered tokens
pub fn parse(payload: &str, templates: &Templates) -> Result<Vec<Token>> {
    let expanded = templates.resolve(payload);

    let tokens = bracket_regex()
        .captures_iter(expanded)
        .map(|caps| parse_token(&caps[1]))
        .collect::<Result<Vec<_>>>()?;

    if tokens.is_empty() {
        return Err(MailcraftError::EmptyPayload(expanded.to_string()));
    }

    log::debug!("Parsed {} tokens from payload {}", tokens.len(), expanded);
    Ok(tokens)
}

/// Recognize the content of a single bracket
pub fn parse_token(content: &str) -> Result<Token> {
    if content.starts_with("ABC") {
        let width = match content.split_once(':') {
            Some((_, param)) => parse_width(content, param)?,
            None => 1,
        };
        return Ok(Token::Alpha { width });
    }

    if content.starts_with("123") {
        let widths = match content.split_once(':') {
            Some((_, param)) => parse_width_range(content, param)?,
            None => 1..=1,
        };
        return Ok(Token::Digits { widths });
    }

    match content {
        "name" => return Ok(Token::Name),
        "lastname" => return Ok(Token::Lastname),
        _ => {}
    }

    if let Some(literal) = strip_quotes(content) {
        return Ok(Token::Literal(literal.to_string()));
    }

    let mut chars = content.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if !c.is_alphanumeric() {
            return Ok(Token::Literal(c.to_string()));
        }
    }

    if content == "year" {
        return Ok(Token::Year);
    }

    Err(MailcraftError::UnknownToken(content.to_string()))
}

/// Content wrapped in one matching pair of `'` or `"`
fn strip_quotes(content: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|quote| {
        content
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

fn parse_width(token: &str, param: &str) -> Result<u32> {
    let width: u32 = param.trim().parse().map_err(|_| {
        MailcraftError::invalid_parameter(token, format!("'{}' is not a positive integer", param))
    })?;

    if width == 0 {
        return Err(MailcraftError::invalid_parameter(token, "width must be at least 1"));
    }

    Ok(width)
}

fn parse_width_range(token: &str, param: &str) -> Result<RangeInclusive<u32>> {
    let Some((low, high)) = param.split_once('-') else {
        let width = parse_width(token, param)?;
        return Ok(width..=width);
    };

    let low = parse_width(token, low)?;
    let high = parse_width(token, high)?;

    if low > high {
        return Err(MailcraftError::invalid_parameter(
            token,
            format!("range start ({}) must be <= end ({})", low, high),
        ));
    }

    Ok(low..=high)
}
