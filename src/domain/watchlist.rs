//! Watch-list parsing.
//!
//! The instrument universe is injected through configuration rather than
//! baked in, so the engine and its tests never depend on a fixed ticker
//! set.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    pub codes: Vec<String>,
}

impl Watchlist {
    pub fn count(&self) -> usize {
        self.codes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchlistError {
    #[error("empty watch list")]
    Empty,

    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

/// Parse a comma-separated code list. Codes are kept verbatim apart from
/// surrounding whitespace; duplicates and empty tokens are rejected.
pub fn parse_codes(input: &str) -> Result<Watchlist, WatchlistError> {
    if input.trim().is_empty() {
        return Err(WatchlistError::Empty);
    }

    let mut codes: Vec<String> = Vec::new();
    for token in input.split(',') {
        let code = token.trim();
        if code.is_empty() {
            return Err(WatchlistError::EmptyToken);
        }
        if codes.iter().any(|c| c == code) {
            return Err(WatchlistError::DuplicateCode(code.to_string()));
        }
        codes.push(code.to_string());
    }

    Ok(Watchlist { codes })
}
