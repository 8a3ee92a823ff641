//! Delimited text tables with a fixed header and column layout.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util::{Error, Result};

/// Field separator of a text source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Any run of whitespace separates fields.
    #[default]
    Whitespace,
    /// A single literal character; consecutive separators yield empty fields.
    Char(char),
}

/// A whole text source held in memory.
///
/// Column indices are never auto-detected: a reordered file parses into wrong
/// values rather than an error.
#[derive(Clone, Debug)]
pub struct TextTable {
    text: String,
    delimiter: Delimiter,
    header_lines: usize,
}

impl TextTable {
    /// Read `path` fully into memory.
    pub fn open(path: impl AsRef<Path>, delimiter: Delimiter, header_lines: usize) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => Error::NotText(path.to_path_buf()),
            _ => Error::open(e, path),
        })?;
        debug!("Read {} bytes from {}", text.len(), path.display());
        Ok(Self::from_text(text, delimiter, header_lines))
    }

    /// Wrap text that is already in memory.
    pub fn from_text(text: impl Into<String>, delimiter: Delimiter, header_lines: usize) -> Self {
        Self { text: text.into(), delimiter, header_lines }
    }

    /// Upper bound on the number of rows [`rows`](Self::rows) yields.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Every line after the header. A blank line is a row with no fields.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        let delimiter = self.delimiter;
        self.text
            .lines()
            .enumerate()
            .skip(self.header_lines)
            .map(move |(i, line)| Row::split(i + 1, line, delimiter))
    }

    /// Parse every data row as `R`.
    pub fn parse<'a, R: SourceRow + 'a>(
        &'a self,
        columns: &'a [usize],
    ) -> impl Iterator<Item = Result<R>> + 'a {
        self.rows().map(move |row| R::from_row(&row, columns))
    }
}

/// One split line of a text source.
#[derive(Clone, Debug)]
pub struct Row<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn split(line: usize, text: &'a str, delimiter: Delimiter) -> Self {
        let fields = match delimiter {
            Delimiter::Whitespace => text.split_whitespace().collect(),
            Delimiter::Char(c) => text.split(c).collect(),
        };
        Self { line, fields }
    }

    /// 1-based line number in the source file.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `index`, or a format error if the row is too short.
    pub fn field(&self, index: usize) -> Result<&'a str> {
        self.fields.get(index).copied().ok_or(Error::MissingColumn {
            line: self.line,
            index,
            found: self.fields.len(),
        })
    }

    /// Field at `index` parsed as a number.
    pub fn number(&self, index: usize) -> Result<f64> {
        let raw = self.field(index)?;
        raw.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
            line: self.line,
            column: index,
            value: raw.to_string(),
        })
    }
}

/// A format-specific row that can be read from a [`Row`].
///
/// `columns` is the format's column map; it holds at least
/// [`COLUMNS`](Self::COLUMNS) entries once the configuration is validated.
pub trait SourceRow: Sized {
    /// Minimum column map length.
    const COLUMNS: usize;

    fn from_row(row: &Row<'_>, columns: &[usize]) -> Result<Self>;
}
