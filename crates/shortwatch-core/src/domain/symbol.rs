use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Length bounds applied when canonicalizing a ticker.
///
/// The default 1..=5 window is policy, not a market fact: real exchanges list
/// longer and punctuated symbols, but the screeners this tool targets only
/// deal in short alphabetic US equity tickers. Callers with a wider universe
/// can relax the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolPolicy {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for SymbolPolicy {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 5,
        }
    }
}

/// Canonical ticker symbol: trimmed, uppercased, wholly ASCII-alphabetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and canonicalize under the default [`SymbolPolicy`].
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::parse_with(input, SymbolPolicy::default())
    }

    /// Parse and canonicalize under an explicit policy.
    pub fn parse_with(input: &str, policy: SymbolPolicy) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let canonical = trimmed.to_ascii_uppercase();

        for (index, ch) in canonical.chars().enumerate() {
            if !ch.is_ascii_alphabetic() {
                return Err(ValidationError::SymbolNotAlphabetic { ch, index });
            }
        }

        let len = canonical.len();
        if len < policy.min_len || len > policy.max_len {
            return Err(ValidationError::SymbolLengthOutOfRange {
                len,
                min: policy.min_len,
                max: policy.max_len,
            });
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_canonicalizes_symbol() {
        let parsed = Symbol::parse("  tsla ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "TSLA");
    }

    #[test]
    fn already_canonical_input_is_unchanged() {
        let parsed = Symbol::parse("TSLA").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "TSLA");
    }

    #[test]
    fn rejects_digits() {
        let err = Symbol::parse("T3SLA").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolNotAlphabetic { ch: '3', index: 1 }));
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(matches!(
            Symbol::parse(""),
            Err(ValidationError::EmptySymbol)
        ));
        assert!(matches!(
            Symbol::parse("   "),
            Err(ValidationError::EmptySymbol)
        ));
    }

    #[test]
    fn rejects_over_long_symbol() {
        let err = Symbol::parse("TOOLONG").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::SymbolLengthOutOfRange { len: 7, min: 1, max: 5 }
        ));
    }

    #[test]
    fn custom_policy_widens_the_window() {
        let policy = SymbolPolicy {
            min_len: 1,
            max_len: 8,
        };
        let parsed = Symbol::parse_with("toolong", policy).expect("policy allows 7 chars");
        assert_eq!(parsed.as_str(), "TOOLONG");
    }
}
