use thiserror::Error;

/// A column index beyond the end of the tokenized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Missing column {0}")]
pub struct MissingColumn(pub usize);

/// Trimmed tokens of one delimited line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    pub fn split(line: &'a str, delimiter: char) -> Self {
        Self {
            tokens: line.split(delimiter).map(str::trim).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens with content.
    pub fn filled(&self) -> usize {
        self.tokens.iter().filter(|token| !token.is_empty()).count()
    }

    /// Every token is empty (e.g. `",,,"`).
    pub fn is_blank(&self) -> bool {
        self.filled() == 0
    }

    /// First token, empty when the line has none.
    pub fn first(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    pub fn column(&self, index: usize) -> Result<&'a str, MissingColumn> {
        self.get(index).ok_or(MissingColumn(index))
    }

    /// Token `offset` places from the end (`from_end(1)` is the last).
    pub fn from_end(&self, offset: usize) -> Result<&'a str, MissingColumn> {
        self.tokens
            .len()
            .checked_sub(offset)
            .and_then(|index| self.get(index))
            .ok_or(MissingColumn(offset))
    }

    /// Tokens from `start` up to `trailing` tokens before the end.
    pub fn between(&self, start: usize, trailing: usize) -> &[&'a str] {
        let end = self.tokens.len().saturating_sub(trailing);
        self.tokens.get(start..end).unwrap_or_default()
    }
}
