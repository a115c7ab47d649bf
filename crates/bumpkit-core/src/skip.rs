//! Collect-or-skip folds
//!
//! Best-effort loops (tag listings, commit logs, workspace discovery) keep
//! going past bad input. Instead of only logging, they return what they
//! dropped so callers and tests can inspect it.

use serde::{Deserialize, Serialize};

/// An input that was dropped, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    /// The offending input, verbatim
    pub input: String,
    /// Human-readable reason
    pub reason: String,
}

impl Skipped {
    /// Create a new skip record
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.input, self.reason)
    }
}

/// Items that parsed, plus the inputs that did not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collected<T> {
    /// Successfully produced items, in input order
    pub items: Vec<T>,
    /// Dropped inputs, in input order
    pub skipped: Vec<Skipped>,
}

impl<T> Collected<T> {
    /// Fold `inputs` through `f`, keeping `Ok` values and recording `Err`
    /// reasons against the input they came from.
    pub fn fold<I, S, F>(inputs: I, mut f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> std::result::Result<T, String>,
    {
        let mut collected = Self::default();
        for input in inputs {
            let input = input.as_ref();
            match f(input) {
                Ok(item) => collected.items.push(item),
                Err(reason) => collected.skipped.push(Skipped::new(input, reason)),
            }
        }
        collected
    }

    /// Whether nothing was dropped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}
