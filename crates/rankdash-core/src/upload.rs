//! Keyword drafts and the CSV upload format.
//!
//! A draft is one keyword as entered by hand or read from one CSV row. Uploads
//! are parsed and validated here before anything is sent to the remote API, so
//! a bad file is rejected with the line number of the first bad row.

use std::mem::take;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Country, Intent};
use crate::CoreError;

/// Column headers, in order, that an upload file must start with.
pub const CSV_COLUMNS: [&str; 7] = [
    "Keyword",
    "Target URL",
    "Search Country",
    "Volume",
    "Difficulty",
    "CPC",
    "Intent",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("upload file is empty")]
    Empty,

    #[error("unexpected header: expected \"{expected}\", found \"{found}\"")]
    Header { expected: String, found: String },

    #[error("upload file has a header but no keyword rows")]
    NoRows,

    #[error("line {line}: {reason}")]
    Row { line: usize, reason: String },
}

/// A keyword that has not been stored by the remote API yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDraft {
    pub keyword: String,
    pub target_url: String,
    #[serde(default)]
    pub search_country: Country,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub cpc: Option<f64>,
    #[serde(default)]
    pub intent: Option<Intent>,
}

impl KeywordDraft {
    /// Check field ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidKeyword`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.keyword.trim().is_empty() {
            return Err(CoreError::InvalidKeyword(
                "keyword must be non-empty".to_string(),
            ));
        }
        if self.target_url.trim().is_empty() {
            return Err(CoreError::InvalidKeyword(format!(
                "keyword '{}' has an empty target URL",
                self.keyword
            )));
        }
        if let Some(d) = self.difficulty {
            if !(0.0..=100.0).contains(&d) {
                return Err(CoreError::InvalidKeyword(format!(
                    "keyword '{}' has difficulty {d}; must be between 0 and 100",
                    self.keyword
                )));
            }
        }
        if let Some(cpc) = self.cpc {
            if !cpc.is_finite() || cpc < 0.0 {
                return Err(CoreError::InvalidKeyword(format!(
                    "keyword '{}' has CPC {cpc}; must be a non-negative amount",
                    self.keyword
                )));
            }
        }
        Ok(())
    }

    fn from_fields(fields: &[String]) -> Result<Self, CoreError> {
        if fields.len() > CSV_COLUMNS.len() {
            return Err(CoreError::InvalidKeyword(format!(
                "expected at most {} columns, found {}",
                CSV_COLUMNS.len(),
                fields.len()
            )));
        }

        let field = |idx: usize| fields.get(idx).map_or("", |s| s.trim());
        let optional = |idx: usize| Some(field(idx)).filter(|s| !s.is_empty());

        let search_country = match optional(2) {
            Some(code) => code.parse::<Country>()?,
            None => Country::default(),
        };
        let volume = optional(3)
            .map(|v| parse_number::<u64>(v, "volume"))
            .transpose()?;
        let difficulty = optional(4)
            .map(|v| parse_number::<f64>(v, "difficulty"))
            .transpose()?;
        let cpc = optional(5)
            .map(|v| parse_number::<f64>(v, "CPC"))
            .transpose()?;
        let intent = optional(6).map(str::parse::<Intent>).transpose()?;

        let draft = Self {
            keyword: field(0).to_string(),
            target_url: field(1).to_string(),
            search_country,
            volume,
            difficulty,
            cpc,
            intent,
        };
        draft.validate()?;
        Ok(draft)
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, CoreError> {
    raw.parse::<T>()
        .map_err(|_| CoreError::InvalidKeyword(format!("{name} '{raw}' is not a valid number")))
}

/// Parse and validate an upload file.
///
/// The first non-blank row must be the header in [`CSV_COLUMNS`] (compared
/// case-insensitively). Blank lines are skipped.
///
/// # Errors
///
/// Returns a [`CsvError`]; row errors carry the 1-based line the row starts on.
pub fn parse_keyword_csv(text: &str) -> Result<Vec<KeywordDraft>, CsvError> {
    let mut rows = parse_rows(text)?.into_iter();
    let (_, header) = rows.next().ok_or(CsvError::Empty)?;

    let found: Vec<&str> = header.iter().map(|h| h.trim()).collect();
    let matches = found.len() == CSV_COLUMNS.len()
        && found
            .iter()
            .zip(CSV_COLUMNS)
            .all(|(f, e)| f.eq_ignore_ascii_case(e));
    if !matches {
        return Err(CsvError::Header {
            expected: CSV_COLUMNS.join(","),
            found: found.join(","),
        });
    }

    let drafts = rows
        .map(|(line, fields)| {
            KeywordDraft::from_fields(&fields).map_err(|e| CsvError::Row {
                line,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if drafts.is_empty() {
        return Err(CsvError::NoRows);
    }
    Ok(drafts)
}

/// Split CSV text into rows, each tagged with the line it starts on.
///
/// Handles quoted fields, `""` escapes and CRLF. Rows consisting of a single
/// empty field (blank lines) are dropped. A quote still open at end of input
/// is reported against the line its row starts on.
fn parse_rows(text: &str) -> Result<Vec<(usize, Vec<String>)>, CsvError> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = text.chars().peekable();

    let mut flush = |row: &mut Vec<String>, start: usize| {
        if !(row.len() == 1 && row[0].trim().is_empty()) {
            rows.push((start, take(row)));
        } else {
            row.clear();
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                flush(&mut row, row_start);
                line += 1;
                row_start = line;
            }
            '\n' => {
                line += 1;
                field.push(ch);
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(CsvError::Row {
            line: row_start,
            reason: "unterminated quoted field".to_string(),
        });
    }

    row.push(field);
    flush(&mut row, row_start);
    Ok(rows)
}
