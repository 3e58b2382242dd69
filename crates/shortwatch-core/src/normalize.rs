//! Raw candidate canonicalization.

use std::collections::HashSet;

use crate::{Symbol, SymbolPolicy};

/// Canonicalize raw candidates into unique symbols.
///
/// Each candidate is trimmed, uppercased, and kept only if wholly alphabetic
/// within the policy's length window. Duplicates collapse to the position of
/// first occurrence; acquisition order often mirrors the ranking source, so
/// it is worth preserving. Never fails; all-rejected input yields an empty
/// sequence for the caller to treat as "no usable symbols".
pub fn normalize_candidates<I, S>(raw: I, policy: SymbolPolicy) -> Vec<Symbol>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();

    for candidate in raw {
        let Ok(symbol) = Symbol::parse_with(candidate.as_ref(), policy) else {
            continue;
        };
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    symbols
}
